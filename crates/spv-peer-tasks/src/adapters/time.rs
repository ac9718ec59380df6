//! Production time source.

use crate::domain::Timestamp;
use crate::ports::TimeSource;

/// Time source backed by the system clock.
///
/// This adapter implements [`TimeSource`] using `std::time::SystemTime`.
/// Tests use [`crate::testing::ManualTimeSource`] instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl SystemTimeSource {
    /// Creates a system time source.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Timestamp {
        use std::time::{SystemTime, UNIX_EPOCH};

        let duration = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();

        Timestamp::new(duration.as_secs())
    }
}
