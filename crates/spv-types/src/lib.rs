//! # SPV Types Crate
//!
//! Primitive chain types shared across the SPV client subsystems.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: Cross-crate primitives are defined here.
//! - **Opaque Payloads**: Raw transaction bytes are carried, never decoded,
//!   by the layers above; only the hash identifies a transaction.

pub mod entities;

pub use entities::*;
