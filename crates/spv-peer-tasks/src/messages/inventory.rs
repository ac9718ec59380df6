//! Inventory vocabulary for announce/request exchanges.

use serde::{Deserialize, Serialize};
use spv_types::Hash;

/// Class of object an inventory entry refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InventoryType {
    /// A transaction, identified by its hash.
    Transaction,
    /// A full block.
    Block,
    /// A block delivered as a filtered (merkle) proof plus matched
    /// transactions.
    FilteredBlock,
}

/// One entry of an `inv`/`getdata` exchange: an object class and its hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    /// What kind of object the hash names.
    pub object_type: InventoryType,
    /// Hash identifying the object.
    pub hash: Hash,
}

impl InventoryItem {
    /// Creates an inventory entry.
    pub fn new(object_type: InventoryType, hash: Hash) -> Self {
        Self { object_type, hash }
    }

    /// Shorthand for a filtered-block entry.
    pub fn filtered_block(hash: Hash) -> Self {
        Self::new(InventoryType::FilteredBlock, hash)
    }

    /// Shorthand for a transaction entry.
    pub fn transaction(hash: Hash) -> Self {
        Self::new(InventoryType::Transaction, hash)
    }

    /// Shorthand for a full-block entry.
    pub fn block(hash: Hash) -> Self {
        Self::new(InventoryType::Block, hash)
    }
}
