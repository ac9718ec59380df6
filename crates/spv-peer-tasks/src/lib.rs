//! # SPV Peer Tasks
//!
//! Per-peer request state machines for a lightweight (SPV) blockchain
//! client. Each task owns one outstanding request on one connection:
//! fetching filtered blocks, discovering block hashes, broadcasting a
//! transaction, or fetching transaction bodies.
//!
//! ## Operating Model
//!
//! The owning connection drives everything. It starts a task, offers it
//! every decoded inbound message (a task claims a message or leaves it for
//! others), and polls [`PeerTask::check_timeout`] on its timer tick. Tasks
//! never block, spawn, or sleep; silence is converted into an outcome only
//! when the owner asks. Outcomes are reported through a weakly held
//! [`TaskDelegate`], so a torn-down host never hears from stale tasks.
//!
//! ## Module Structure
//!
//! ```text
//! spv-peer-tasks/
//! ├── domain/          # BlockHash, MerkleBlock, Timestamp, errors
//! ├── messages/        # Decoded wire messages and inventory vocabulary
//! ├── ports/           # Outbound dependency traits
//! ├── tasks/           # PeerTask contract + the four task variants
//! ├── adapters/        # SystemTimeSource
//! ├── testing          # Recorders and scripted collaborators
//! └── config.rs        # PeerTaskConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod messages;
pub mod ports;
pub mod tasks;
pub mod testing;

// Re-exports
pub use adapters::SystemTimeSource;
pub use config::{PeerTaskConfig, DEFAULT_ALLOWED_IDLE_SECS};
pub use domain::{
    BlockHash, HandlerError, MerkleBlock, TaskError, Timestamp, ValidationError, HEIGHT_UNKNOWN,
};
pub use messages::{
    GetBlocksMessage, InboundMessage, InventoryItem, InventoryType, MerkleBlockMessage,
    OutboundMessage, TransactionMessage,
};
pub use ports::{
    MerkleBlockHandler, MerkleBlockValidator, TaskDelegate, TaskRequester, TimeSource,
};
pub use tasks::{
    GetBlockHashesTask, MerkleBlocksTask, PeerTask, RequestTransactionsTask, SendTransactionTask,
    TaskContext,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
