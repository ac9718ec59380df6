//! # Messages Module
//!
//! Decoded protocol messages and the inventory vocabulary tasks use to
//! name objects.

pub mod inventory;
pub mod wire;

pub use inventory::*;
pub use wire::*;
