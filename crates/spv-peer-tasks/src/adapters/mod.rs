//! # Adapters Module
//!
//! Production implementations of the outbound ports. The message-sending
//! side lives with the host's transport; this crate only ships the clock.

pub mod time;

pub use time::SystemTimeSource;
