//! # Block Hash Discovery Task
//!
//! Asks a peer which block hashes follow a locator and collects the
//! announced hashes. Discovery is best-effort: the peer may know fewer
//! blocks than hoped, so going idle resolves the task as completed with
//! whatever was collected rather than as a failure.

use crate::domain::TaskError;
use crate::messages::{
    GetBlocksMessage, InboundMessage, InventoryItem, InventoryType, OutboundMessage,
};
use crate::ports::TimeSource;
use crate::tasks::{PeerTask, TaskContext};
use spv_types::Hash;
use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

/// Collects block hashes announced in response to a locator.
pub struct GetBlockHashesTask {
    context: TaskContext,
    locator_hashes: Vec<Hash>,
    expected_min_count: usize,
    collected: Vec<Hash>,
    allowed_idle: Duration,
}

impl GetBlockHashesTask {
    /// Creates a discovery task.
    ///
    /// `expected_min_count` is the number of hashes that ends discovery
    /// early; fewer may still be delivered via the timeout path.
    pub fn new(
        locator_hashes: Vec<Hash>,
        expected_min_count: usize,
        clock: Arc<dyn TimeSource>,
        allowed_idle: Duration,
    ) -> Self {
        Self {
            context: TaskContext::new(clock),
            locator_hashes,
            expected_min_count,
            collected: Vec::new(),
            allowed_idle,
        }
    }

    /// Hashes collected so far, in announcement order.
    pub fn collected(&self) -> &[Hash] {
        &self.collected
    }

    fn is_known(&self, hash: &Hash) -> bool {
        self.locator_hashes.contains(hash) || self.collected.contains(hash)
    }

    fn process_inventory(&mut self, items: &[InventoryItem]) -> bool {
        let mut new_hashes: Vec<Hash> = Vec::new();
        for item in items {
            if item.object_type == InventoryType::Block
                && !self.is_known(&item.hash)
                && !new_hashes.contains(&item.hash)
            {
                new_hashes.push(item.hash);
            }
        }

        if new_hashes.is_empty() {
            return false;
        }

        self.context.reset_timer();
        self.collected.extend(new_hashes);

        if self.collected.len() >= self.expected_min_count {
            tracing::debug!("Hash discovery reached target: {} collected", self.collected.len());
            self.context.notify_completed(self);
        }

        true
    }
}

impl PeerTask for GetBlockHashesTask {
    fn context(&self) -> &TaskContext {
        &self.context
    }

    fn context_mut(&mut self) -> &mut TaskContext {
        &mut self.context
    }

    fn start(&mut self) {
        self.context
            .send(OutboundMessage::GetBlocks(GetBlocksMessage {
                locator_hashes: self.locator_hashes.clone(),
            }));
        self.context.reset_timer();
    }

    fn handle(&mut self, message: &InboundMessage) -> Result<bool, TaskError> {
        match message {
            InboundMessage::Inventory(items) => Ok(self.process_inventory(items)),
            _ => Ok(false),
        }
    }

    fn check_timeout(&mut self) {
        if self.context.idle_exceeded(self.allowed_idle) {
            // Whatever arrived is the result.
            self.context.notify_completed(self);
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn equal_to(&self, other: &dyn PeerTask) -> bool {
        match other.as_any().downcast_ref::<Self>() {
            Some(other) => {
                self.locator_hashes == other.locator_hashes
                    && self.expected_min_count == other.expected_min_count
            }
            None => false,
        }
    }
}
