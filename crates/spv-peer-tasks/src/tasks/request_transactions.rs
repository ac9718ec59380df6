//! # Request Transactions Task
//!
//! Fetches a batch of announced transactions by hash. Bodies may arrive in
//! any order; the task completes when the last outstanding hash is matched
//! and fails on idle while anything is still missing.

use crate::domain::TaskError;
use crate::messages::{InboundMessage, InventoryItem, OutboundMessage};
use crate::ports::TimeSource;
use crate::tasks::{PeerTask, TaskContext};
use spv_types::{Hash, Transaction};
use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

/// Requests transaction bodies and collects them as they arrive.
pub struct RequestTransactionsTask {
    context: TaskContext,
    hashes: Vec<Hash>,
    transactions: Vec<Transaction>,
    allowed_idle: Duration,
}

impl RequestTransactionsTask {
    /// Creates a fetch task for `hashes`.
    pub fn new(hashes: Vec<Hash>, clock: Arc<dyn TimeSource>, allowed_idle: Duration) -> Self {
        Self {
            context: TaskContext::new(clock),
            hashes,
            transactions: Vec::new(),
            allowed_idle,
        }
    }

    /// Bodies collected so far, in arrival order.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    fn process_transaction(&mut self, transaction: &Transaction) -> bool {
        let Some(index) = self.hashes.iter().position(|hash| *hash == transaction.hash) else {
            return false;
        };

        self.context.reset_timer();
        self.hashes.remove(index);
        self.transactions.push(transaction.clone());

        if self.hashes.is_empty() {
            self.context.notify_completed(self);
        }

        true
    }
}

impl PeerTask for RequestTransactionsTask {
    fn context(&self) -> &TaskContext {
        &self.context
    }

    fn context_mut(&mut self) -> &mut TaskContext {
        &mut self.context
    }

    fn start(&mut self) {
        let items: Vec<InventoryItem> = self
            .hashes
            .iter()
            .map(|hash| InventoryItem::transaction(*hash))
            .collect();

        self.context.send(OutboundMessage::GetData(items));
        self.context.reset_timer();
    }

    fn handle(&mut self, message: &InboundMessage) -> Result<bool, TaskError> {
        match message {
            InboundMessage::Transaction(tx_message) => {
                Ok(self.process_transaction(&tx_message.transaction))
            }
            _ => Ok(false),
        }
    }

    fn check_timeout(&mut self) {
        if !self.context.idle_exceeded(self.allowed_idle) {
            return;
        }

        if self.hashes.is_empty() {
            self.context.notify_completed(self);
        } else {
            tracing::warn!("Transaction fetch stalled: {} missing", self.hashes.len());
            self.context
                .notify_failed(self, TaskError::Timeout(self.allowed_idle));
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn equal_to(&self, other: &dyn PeerTask) -> bool {
        match other.as_any().downcast_ref::<Self>() {
            Some(other) => self.hashes == other.hashes,
            None => false,
        }
    }
}
