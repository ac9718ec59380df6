//! # Domain Errors
//!
//! Error types for the peer task layer. Validation and handler failures
//! originate behind their respective ports; `TaskError` is the unified
//! shape a task reports through its delegate or returns from message
//! handling.

use std::time::Duration;
use thiserror::Error;

/// A merkle proof failed cryptographic or structural checks.
///
/// Raised by the proof validator while a task is processing a merkle block
/// message. The task propagates it to the caller unchanged; recovery
/// (ban the peer, retry elsewhere) is the owner's decision.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The partial merkle tree does not reproduce the header's root.
    #[error("Merkle root mismatch")]
    RootMismatch,

    /// The proof payload is structurally invalid.
    #[error("Malformed merkle proof: {0}")]
    Malformed(String),
}

/// Downstream processing rejected a fully reassembled block.
///
/// Raised by the block handler during finalization. Fatal to the task:
/// reported once through the failure path, never retried here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HandlerError {
    /// The block does not connect to the chain the client is tracking.
    #[error("Block does not link to the known chain")]
    ChainLinkage,

    /// The block could not be persisted.
    #[error("Storage failure: {0}")]
    Storage(String),
}

/// Terminal failure of a peer task.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// A received proof failed validation.
    #[error("Invalid merkle proof: {0}")]
    InvalidProof(#[from] ValidationError),

    /// A reassembled block was rejected downstream.
    #[error("Block rejected: {0}")]
    BlockRejected(#[from] HandlerError),

    /// No useful message arrived within the allowed idle window.
    #[error("Peer idle for longer than {0:?}")]
    Timeout(Duration),
}
