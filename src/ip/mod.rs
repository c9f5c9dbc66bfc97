//! Node address module.
//!
//! This module contains the dotted-quad [`Address`] type used as the node
//! identity throughout the topology.

pub mod address;

// Re-export commonly used types
pub use address::{Address, AddressParseError};
