//! # Merkle Blocks Task
//!
//! Requests a batch of filtered blocks and reassembles each one from its
//! proof plus the separately delivered matched transactions. Blocks
//! complete in whatever order the peer finishes them, not request order;
//! the task tracks per-block progress and reports once the whole batch is
//! delivered downstream.

use crate::adapters::SystemTimeSource;
use crate::config::PeerTaskConfig;
use crate::domain::{BlockHash, MerkleBlock, TaskError};
use crate::messages::{InboundMessage, InventoryItem, MerkleBlockMessage, OutboundMessage};
use crate::ports::{MerkleBlockHandler, MerkleBlockValidator, TimeSource};
use crate::tasks::{PeerTask, TaskContext};
use spv_types::Transaction;
use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

/// Per-block lifecycle: requested (in `block_hashes`), pending proof bodies
/// (in `pending_blocks`), finalized (removed from both). The task as a
/// whole completes when the outstanding list drains.
pub struct MerkleBlocksTask {
    context: TaskContext,
    block_hashes: Vec<BlockHash>,
    pending_blocks: Vec<MerkleBlock>,
    validator: Arc<dyn MerkleBlockValidator>,
    handler: Arc<dyn MerkleBlockHandler>,
    allowed_idle: Duration,
}

impl MerkleBlocksTask {
    /// Creates a task for `block_hashes` with an explicit clock and idle
    /// window.
    pub fn new(
        block_hashes: Vec<BlockHash>,
        validator: Arc<dyn MerkleBlockValidator>,
        handler: Arc<dyn MerkleBlockHandler>,
        clock: Arc<dyn TimeSource>,
        allowed_idle: Duration,
    ) -> Self {
        Self {
            context: TaskContext::new(clock),
            block_hashes,
            pending_blocks: Vec::new(),
            validator,
            handler,
            allowed_idle,
        }
    }

    /// Creates a task on the system clock with the default idle window.
    pub fn with_defaults(
        block_hashes: Vec<BlockHash>,
        validator: Arc<dyn MerkleBlockValidator>,
        handler: Arc<dyn MerkleBlockHandler>,
    ) -> Self {
        Self::new(
            block_hashes,
            validator,
            handler,
            Arc::new(SystemTimeSource::new()),
            PeerTaskConfig::default().allowed_idle(),
        )
    }

    /// Blocks still awaiting finalization, in request order.
    pub fn outstanding(&self) -> &[BlockHash] {
        &self.block_hashes
    }

    fn process_merkle_block(&mut self, message: &MerkleBlockMessage) -> Result<bool, TaskError> {
        let mut block = self.validator.validate(message)?;

        let height = match self
            .block_hashes
            .iter()
            .find(|requested| requested.header_hash == block.header_hash)
        {
            Some(requested) => requested.known_height(),
            None => return Ok(false),
        };

        self.context.reset_timer();
        block.height = height;

        if block.complete() {
            self.finalize(block);
        } else {
            self.pending_blocks.push(block);
        }

        Ok(true)
    }

    fn process_transaction(&mut self, transaction: &Transaction) -> bool {
        let Some(index) = self
            .pending_blocks
            .iter()
            .position(|block| block.commits_to(&transaction.hash))
        else {
            return false;
        };

        self.context.reset_timer();
        self.pending_blocks[index].collect(transaction.clone());

        if self.pending_blocks[index].complete() {
            let block = self.pending_blocks.remove(index);
            self.finalize(block);
        }

        true
    }

    /// Hands a reassembled block downstream.
    ///
    /// The block's hash leaves the outstanding list before delivery, so the
    /// delegate observes post-removal state from either outcome callback. A
    /// handler rejection is terminal: failure is reported and the
    /// completion check is skipped, keeping terminal notifications to one
    /// per cause.
    fn finalize(&mut self, block: MerkleBlock) {
        self.block_hashes
            .retain(|requested| requested.header_hash != block.header_hash);

        tracing::debug!(
            "Delivering reassembled block: height={:?}, transactions={}, remaining={}",
            block.height,
            block.transactions.len(),
            self.block_hashes.len()
        );

        if let Err(error) = self.handler.handle(block) {
            tracing::warn!("Downstream rejected reassembled block: {}", error);
            self.context.notify_failed(self, TaskError::BlockRejected(error));
            return;
        }

        if self.block_hashes.is_empty() {
            self.context.notify_completed(self);
        }
    }
}

impl PeerTask for MerkleBlocksTask {
    fn context(&self) -> &TaskContext {
        &self.context
    }

    fn context_mut(&mut self) -> &mut TaskContext {
        &mut self.context
    }

    fn start(&mut self) {
        let items: Vec<InventoryItem> = self
            .block_hashes
            .iter()
            .map(|block_hash| InventoryItem::filtered_block(block_hash.header_hash))
            .collect();

        tracing::debug!("Requesting {} filtered blocks", items.len());
        self.context.send(OutboundMessage::GetData(items));
        self.context.reset_timer();
    }

    fn handle(&mut self, message: &InboundMessage) -> Result<bool, TaskError> {
        match message {
            InboundMessage::MerkleBlock(merkle_block) => self.process_merkle_block(merkle_block),
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

        if self.block_hashes.is_empty() {
            self.context.notify_completed(self);
        } else {
            tracing::warn!(
                "Filtered block request stalled: {} outstanding",
                self.block_hashes.len()
            );
            self.context
                .notify_failed(self, TaskError::Timeout(self.allowed_idle));
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn equal_to(&self, other: &dyn PeerTask) -> bool {
        match other.as_any().downcast_ref::<Self>() {
            Some(other) => self.block_hashes == other.block_hashes,
            None => false,
        }
    }
}
