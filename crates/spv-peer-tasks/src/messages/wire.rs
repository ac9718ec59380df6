//! Protocol messages as tasks see them.
//!
//! Framing, checksums, and byte-level encoding belong to the transport; by
//! the time a message reaches a task it is already decoded into these
//! shapes. Outbound messages are handed to the requester in the same form.

use super::inventory::InventoryItem;
use serde::{Deserialize, Serialize};
use spv_types::{Hash, Transaction};

/// Messages a task asks the connection to send.
#[derive(Clone, Debug)]
pub enum OutboundMessage {
    /// Request the listed objects (`getdata`).
    GetData(Vec<InventoryItem>),
    /// Ask the peer for block hashes following a locator (`getblocks`).
    GetBlocks(GetBlocksMessage),
    /// Announce objects this client can serve (`inv`).
    Inventory(Vec<InventoryItem>),
    /// A full transaction body (`tx`).
    Transaction(TransactionMessage),
}

/// Decoded messages the connection offers to its tasks.
#[derive(Clone, Debug)]
pub enum InboundMessage {
    /// A filtered-block proof (`merkleblock`).
    MerkleBlock(MerkleBlockMessage),
    /// A transaction body (`tx`).
    Transaction(TransactionMessage),
    /// Object announcement from the peer (`inv`).
    Inventory(Vec<InventoryItem>),
    /// The peer requests objects we announced (`getdata`).
    GetData(Vec<InventoryItem>),
}

/// Block-locator request for hash discovery.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GetBlocksMessage {
    /// Known header hashes, newest first, thinning toward genesis.
    pub locator_hashes: Vec<Hash>,
}

/// Raw filtered-block proof payload.
///
/// Carried opaquely: tasks hand the whole payload to a proof validator and
/// never interpret `hashes`/`flags` themselves.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MerkleBlockMessage {
    /// Hash of the block header the proof is for.
    pub header_hash: Hash,
    /// Merkle root claimed by the header.
    pub merkle_root: Hash,
    /// Number of transactions in the full block.
    pub total_transactions: u32,
    /// Partial merkle tree node hashes.
    pub hashes: Vec<Hash>,
    /// Partial merkle tree traversal flags.
    pub flags: Vec<u8>,
}

/// A transaction body in transit.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransactionMessage {
    /// The decoded transaction.
    pub transaction: Transaction,
}

impl TransactionMessage {
    /// Wraps a transaction for the wire.
    pub fn new(transaction: Transaction) -> Self {
        Self { transaction }
    }
}
