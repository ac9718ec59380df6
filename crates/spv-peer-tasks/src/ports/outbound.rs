//! # Driven Ports (Outbound SPI)
//!
//! Interfaces the peer task layer **requires** its host to implement: the
//! connection that ships messages, the delegate that learns outcomes, the
//! proof validator, the block handler, and the clock.
//!
//! # Thread Safety
//!
//! Implementations must be `Send + Sync`. Tasks themselves are driven from
//! one thread at a time, but the host may move a connection's tasks between
//! worker threads and shares the collaborators across tasks.

use crate::domain::{HandlerError, MerkleBlock, TaskError, Timestamp, ValidationError};
use crate::messages::{MerkleBlockMessage, OutboundMessage};
use crate::tasks::PeerTask;

/// Sends protocol messages to the remote peer.
///
/// Tasks hold this weakly and fire-and-forget: delivery failures surface
/// later as silence, which the idle timeout converts into a task outcome.
pub trait TaskRequester: Send + Sync {
    /// Queue a message for the peer this task belongs to.
    fn send(&self, message: OutboundMessage);
}

/// Receives the terminal outcome of a task.
///
/// Held weakly by tasks; a host that dropped its delegate simply stops
/// hearing outcomes. Methods receive the reporting task so one delegate can
/// serve many tasks and identify the caller by downcast or equality.
pub trait TaskDelegate: Send + Sync {
    /// The task finished its job.
    fn task_completed(&self, task: &dyn PeerTask);

    /// The task failed and will make no further progress.
    fn task_failed(&self, task: &dyn PeerTask, error: TaskError);
}

/// Verifies a filtered-block proof and extracts its commitments.
///
/// The concrete implementation owns the partial-merkle-tree algorithm; the
/// task layer only routes payloads through it.
pub trait MerkleBlockValidator: Send + Sync {
    /// Checks the proof payload and, on success, returns the block shell
    /// with its committed transaction hashes.
    fn validate(&self, message: &MerkleBlockMessage) -> Result<MerkleBlock, ValidationError>;
}

/// Consumes fully reassembled blocks in completion order.
pub trait MerkleBlockHandler: Send + Sync {
    /// Accepts a complete block. An error is fatal to the delivering task.
    fn handle(&self, block: MerkleBlock) -> Result<(), HandlerError>;
}

/// Abstract clock.
///
/// Tasks read time only through this port so idle behavior is testable
/// with a manually advanced clock.
pub trait TimeSource: Send + Sync {
    /// Current time.
    fn now(&self) -> Timestamp;
}
