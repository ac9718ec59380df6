//! # Domain Module
//!
//! Core domain types for the peer task layer: block identities, the
//! merkle-block aggregate, clock readings, and error enums.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::*;
pub use value_objects::*;
