//! # Peer Task Configuration
//!
//! Tunables for task construction. Hosts typically build one config per
//! network profile and hand each task its idle window from it.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Idle window granted to a merkle-blocks batch before it is declared
/// stalled.
pub const DEFAULT_ALLOWED_IDLE_SECS: u64 = 60;

/// Peer task configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PeerTaskConfig {
    /// Seconds of silence a task tolerates before resolving via timeout.
    pub allowed_idle_secs: u64,
}

impl Default for PeerTaskConfig {
    fn default() -> Self {
        Self {
            allowed_idle_secs: DEFAULT_ALLOWED_IDLE_SECS,
        }
    }
}

impl PeerTaskConfig {
    /// Create a config for testing (short idle window).
    pub fn for_testing() -> Self {
        Self {
            allowed_idle_secs: 2,
        }
    }

    /// The idle window as a `Duration`.
    pub fn allowed_idle(&self) -> Duration {
        Duration::from_secs(self.allowed_idle_secs)
    }
}
