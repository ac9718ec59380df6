//! # Domain Entities
//!
//! The mutable aggregate at the heart of filtered-block sync: a merkle
//! block whose matched transactions trickle in as separate peer messages.

use serde::{Deserialize, Serialize};
use spv_types::{Hash, Transaction};
use std::collections::HashSet;

/// A filtered block under reassembly.
///
/// A validated proof commits to the set of transaction hashes the peer's
/// filter matched (`transaction_hashes`); the bodies arrive afterwards as
/// individual messages and accumulate in `transactions`. The block is
/// complete once every distinct committed hash has a collected body. A proof
/// that matched nothing commits to an empty set and is complete on arrival.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MerkleBlock {
    /// Hash of the block header the proof commits to.
    pub header_hash: Hash,
    /// Transaction hashes the proof committed to (filter matches).
    pub transaction_hashes: HashSet<Hash>,
    /// Bodies collected so far, in arrival order.
    pub transactions: Vec<Transaction>,
    /// Chain height, when the request carried one.
    pub height: Option<u64>,
}

impl MerkleBlock {
    /// Creates a freshly validated block with no bodies collected yet.
    pub fn new(header_hash: Hash, transaction_hashes: HashSet<Hash>) -> Self {
        Self {
            header_hash,
            transaction_hashes,
            transactions: Vec::new(),
            height: None,
        }
    }

    /// Whether the proof committed to this transaction hash.
    pub fn commits_to(&self, hash: &Hash) -> bool {
        self.transaction_hashes.contains(hash)
    }

    /// Whether a body for this hash has already been collected.
    pub fn has_collected(&self, hash: &Hash) -> bool {
        self.transactions.iter().any(|tx| tx.hash == *hash)
    }

    /// Records a committed transaction body.
    ///
    /// A body whose hash is already collected is ignored, so the collected
    /// count can never exceed the number of distinct committed hashes and
    /// completion always means full membership.
    pub fn collect(&mut self, transaction: Transaction) {
        if !self.has_collected(&transaction.hash) {
            self.transactions.push(transaction);
        }
    }

    /// Whether every distinct committed hash has a collected body.
    pub fn complete(&self) -> bool {
        self.transactions.len() == self.transaction_hashes.len()
    }
}
