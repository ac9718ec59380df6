//! # Value Objects
//!
//! Immutable values the task layer passes around: block identities and
//! clock readings.

use serde::{Deserialize, Serialize};
use spv_types::Hash;
use std::time::Duration;

/// Height value meaning "height not known for this hash".
pub const HEIGHT_UNKNOWN: u64 = 0;

/// Identity of a block the client wants fetched.
///
/// Produced by header sync or checkpoint data before the block body is
/// requested from a peer. The height rides along when known; `0` means the
/// caller could not resolve it. Identity is the header hash alone, so two
/// `BlockHash` values with the same hash but different heights are equal
/// (the `Hash` impl matches, hashing only the header hash).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockHash {
    /// Hash of the block header.
    pub header_hash: Hash,
    /// Chain height, or [`HEIGHT_UNKNOWN`] when unresolved.
    pub height: u64,
}

impl BlockHash {
    /// Creates a block identity with a known height.
    pub fn new(header_hash: Hash, height: u64) -> Self {
        Self {
            header_hash,
            height,
        }
    }

    /// Creates a block identity whose height is not known.
    pub fn without_height(header_hash: Hash) -> Self {
        Self {
            header_hash,
            height: HEIGHT_UNKNOWN,
        }
    }

    /// The height, if the producer resolved one.
    pub fn known_height(&self) -> Option<u64> {
        (self.height != HEIGHT_UNKNOWN).then_some(self.height)
    }
}

impl PartialEq for BlockHash {
    fn eq(&self, other: &Self) -> bool {
        self.header_hash == other.header_hash
    }
}

impl Eq for BlockHash {}

impl std::hash::Hash for BlockHash {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.header_hash.hash(state);
    }
}

/// A clock reading in whole seconds since the Unix epoch.
///
/// Tasks never read the system clock directly; they receive timestamps from
/// an injected time source so idle-timeout behavior is deterministic under
/// test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Creates a timestamp from seconds since the epoch.
    pub fn new(secs: u64) -> Self {
        Self(secs)
    }

    /// The underlying seconds value.
    pub fn as_secs(&self) -> u64 {
        self.0
    }

    /// Elapsed time since `earlier`, zero if `earlier` is in the future.
    pub fn saturating_duration_since(&self, earlier: Timestamp) -> Duration {
        Duration::from_secs(self.0.saturating_sub(earlier.0))
    }

    /// This timestamp advanced by `secs` seconds.
    pub fn add_secs(&self, secs: u64) -> Self {
        Self(self.0.saturating_add(secs))
    }
}
