//! # Peer Tasks
//!
//! One task per outstanding request on a peer connection. The connection
//! owns a queue of tasks, starts the front one, offers every decoded
//! inbound message to it (claimed or not), and polls timeouts on a timer
//! tick. Tasks never block and never spawn; all progress is driven by the
//! owner calling in.
//!
//! The task family is closed: [`MerkleBlocksTask`], [`GetBlockHashesTask`],
//! [`SendTransactionTask`], and [`RequestTransactionsTask`]. Equality
//! between `dyn PeerTask` values is variant-local by downcast; tasks of
//! different variants never compare equal, so a connection can dedupe its
//! queue with plain `==`.
//!
//! [`MerkleBlocksTask`]: merkle_blocks::MerkleBlocksTask
//! [`GetBlockHashesTask`]: block_hashes::GetBlockHashesTask
//! [`SendTransactionTask`]: send_transaction::SendTransactionTask
//! [`RequestTransactionsTask`]: request_transactions::RequestTransactionsTask

pub mod block_hashes;
pub mod merkle_blocks;
pub mod request_transactions;
pub mod send_transaction;

pub use block_hashes::GetBlockHashesTask;
pub use merkle_blocks::MerkleBlocksTask;
pub use request_transactions::RequestTransactionsTask;
pub use send_transaction::SendTransactionTask;

use crate::domain::{TaskError, Timestamp};
use crate::messages::{InboundMessage, OutboundMessage};
use crate::ports::{TaskDelegate, TaskRequester, TimeSource};
use std::any::Any;
use std::sync::{Arc, Weak};
use std::time::Duration;

/// Contract every peer task fulfills.
///
/// Methods are invoked synchronously by the owning connection, one call at
/// a time. `handle` returns whether the task claimed the message; a claimed
/// message is consumed, an unclaimed one is offered elsewhere. Errors out
/// of `handle` mean the peer violated the protocol and are the owner's cue
/// to disconnect.
pub trait PeerTask: Send {
    /// Shared plumbing (collaborators, clock, idle timer).
    fn context(&self) -> &TaskContext;

    /// Mutable access to the shared plumbing.
    fn context_mut(&mut self) -> &mut TaskContext;

    /// Wires the collaborators. Called by the owner before `start`.
    fn bind(&mut self, requester: Weak<dyn TaskRequester>, delegate: Weak<dyn TaskDelegate>) {
        self.context_mut().bind(requester, delegate);
    }

    /// Emits the initial request(s) and arms the idle timer.
    fn start(&mut self);

    /// Offers a decoded inbound message.
    ///
    /// Returns `Ok(true)` if the task claimed and processed it, `Ok(false)`
    /// if the message is not for this task (no side effects). The default
    /// claims nothing.
    fn handle(&mut self, message: &InboundMessage) -> Result<bool, TaskError> {
        let _ = message;
        Ok(false)
    }

    /// Owner's timer tick. Resolves the task through the delegate when the
    /// idle window has been exceeded.
    fn check_timeout(&mut self);

    /// Re-arms the idle timer at "now".
    fn reset_timer(&mut self) {
        self.context_mut().reset_timer();
    }

    /// The concrete task for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Variant-aware equality; different variants are never equal.
    fn equal_to(&self, other: &dyn PeerTask) -> bool;
}

impl PartialEq for dyn PeerTask {
    fn eq(&self, other: &Self) -> bool {
        self.equal_to(other)
    }
}

/// Plumbing shared by every task variant.
///
/// Collaborators are held weakly: the connection and its listener outlive a
/// task in normal operation, but during teardown either may drop first, and
/// a task must never keep them alive or call into freed state. Every call
/// through a dead handle is a silent no-op.
pub struct TaskContext {
    requester: Option<Weak<dyn TaskRequester>>,
    delegate: Option<Weak<dyn TaskDelegate>>,
    clock: Arc<dyn TimeSource>,
    last_active: Option<Timestamp>,
}

impl TaskContext {
    /// Creates an unbound context reading time from `clock`.
    pub fn new(clock: Arc<dyn TimeSource>) -> Self {
        Self {
            requester: None,
            delegate: None,
            clock,
            last_active: None,
        }
    }

    /// Wires the collaborators.
    pub fn bind(
        &mut self,
        requester: Weak<dyn TaskRequester>,
        delegate: Weak<dyn TaskDelegate>,
    ) {
        self.requester = Some(requester);
        self.delegate = Some(delegate);
    }

    /// Sends through the requester, or does nothing if it is gone.
    pub fn send(&self, message: OutboundMessage) {
        if let Some(requester) = self.requester.as_ref().and_then(Weak::upgrade) {
            requester.send(message);
        }
    }

    /// Records "now" as the last moment of useful progress.
    pub fn reset_timer(&mut self) {
        self.last_active = Some(self.clock.now());
    }

    /// When the timer was last armed. `None` until the task starts.
    pub fn last_active(&self) -> Option<Timestamp> {
        self.last_active
    }

    /// Whether more than `allowed` has elapsed since the timer was armed.
    ///
    /// False while the timer is unarmed: a task that has not started yet
    /// cannot time out.
    pub fn idle_exceeded(&self, allowed: Duration) -> bool {
        match self.last_active {
            Some(last) => self.clock.now().saturating_duration_since(last) > allowed,
            None => false,
        }
    }

    /// Reports completion, or does nothing if the delegate is gone.
    pub fn notify_completed(&self, task: &dyn PeerTask) {
        match self.delegate.as_ref().and_then(Weak::upgrade) {
            Some(delegate) => delegate.task_completed(task),
            None => tracing::debug!("Task completed with no delegate to notify"),
        }
    }

    /// Reports failure, or does nothing if the delegate is gone.
    pub fn notify_failed(&self, task: &dyn PeerTask, error: TaskError) {
        match self.delegate.as_ref().and_then(Weak::upgrade) {
            Some(delegate) => delegate.task_failed(task, error),
            None => tracing::debug!("Task failed with no delegate to notify: {}", error),
        }
    }
}
