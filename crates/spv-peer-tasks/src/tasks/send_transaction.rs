//! # Send Transaction Task
//!
//! Broadcasts one transaction the polite way: announce the hash, wait for
//! the peer to ask for it, then send the body. A peer that never asks
//! within the idle window is treated as having rejected the broadcast.

use crate::domain::TaskError;
use crate::messages::{
    InboundMessage, InventoryItem, InventoryType, OutboundMessage, TransactionMessage,
};
use crate::ports::TimeSource;
use crate::tasks::{PeerTask, TaskContext};
use spv_types::Transaction;
use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

/// Announces a transaction and serves it on request.
pub struct SendTransactionTask {
    context: TaskContext,
    transaction: Transaction,
    allowed_idle: Duration,
}

impl SendTransactionTask {
    /// Creates a broadcast task for `transaction`.
    pub fn new(
        transaction: Transaction,
        clock: Arc<dyn TimeSource>,
        allowed_idle: Duration,
    ) -> Self {
        Self {
            context: TaskContext::new(clock),
            transaction,
            allowed_idle,
        }
    }

    fn process_getdata(&mut self, items: &[InventoryItem]) -> bool {
        let wants_it = items.iter().any(|item| {
            item.object_type == InventoryType::Transaction && item.hash == self.transaction.hash
        });
        if !wants_it {
            return false;
        }

        self.context.reset_timer();
        self.context
            .send(OutboundMessage::Transaction(TransactionMessage::new(
                self.transaction.clone(),
            )));
        self.context.notify_completed(self);

        true
    }
}

impl PeerTask for SendTransactionTask {
    fn context(&self) -> &TaskContext {
        &self.context
    }

    fn context_mut(&mut self) -> &mut TaskContext {
        &mut self.context
    }

    fn start(&mut self) {
        self.context.send(OutboundMessage::Inventory(vec![
            InventoryItem::transaction(self.transaction.hash),
        ]));
        self.context.reset_timer();
    }

    fn handle(&mut self, message: &InboundMessage) -> Result<bool, TaskError> {
        match message {
            InboundMessage::GetData(items) => Ok(self.process_getdata(items)),
            _ => Ok(false),
        }
    }

    fn check_timeout(&mut self) {
        if self.context.idle_exceeded(self.allowed_idle) {
            tracing::warn!("Peer never requested announced transaction");
            self.context
                .notify_failed(self, TaskError::Timeout(self.allowed_idle));
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn equal_to(&self, other: &dyn PeerTask) -> bool {
        match other.as_any().downcast_ref::<Self>() {
            Some(other) => self.transaction.hash == other.transaction.hash,
            None => false,
        }
    }
}
