//! # Ports Module
//!
//! Hexagonal architecture ports. The inbound surface of this crate is the
//! [`crate::tasks::PeerTask`] trait itself; this module holds the outbound
//! dependencies tasks are wired to.

pub mod outbound;

pub use outbound::*;
