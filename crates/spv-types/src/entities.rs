//! # Core Chain Primitives
//!
//! The minimal vocabulary the peer task layer speaks: hashes and raw
//! transactions. Everything richer (headers, proofs, wallet records) lives
//! in the subsystems that interpret these bytes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 32-byte hash (e.g., double SHA-256 of a header or transaction).
pub type Hash = [u8; 32];

/// A raw transaction as relayed between peers.
///
/// The task layer never decodes `raw`; all matching and bookkeeping keys on
/// `hash`. Equality therefore compares the hash alone, mirroring how peers
/// identify transactions on the wire.
#[derive(Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// The transaction identifier (hash of the serialized body).
    pub hash: Hash,
    /// The serialized transaction body, opaque to this layer.
    pub raw: Vec<u8>,
}

impl Transaction {
    /// Creates a transaction from its identifier and serialized body.
    pub fn new(hash: Hash, raw: Vec<u8>) -> Self {
        Self { hash, raw }
    }
}

impl PartialEq for Transaction {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for Transaction {}

impl fmt::Debug for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transaction")
            .field("hash", &HexPrefix(&self.hash))
            .field("raw_len", &self.raw.len())
            .finish()
    }
}

/// Renders the first bytes of a hash as hex for logs and assertions.
struct HexPrefix<'a>(&'a Hash);

impl fmt::Debug for HexPrefix<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0[..4] {
            write!(f, "{byte:02x}")?;
        }
        write!(f, "..")
    }
}
