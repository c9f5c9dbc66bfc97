//! Network topology module.
//!
//! This module contains the tree-shaped [`Network`], the bracket notation it
//! is read from and written to, and the traversals that answer route and
//! level queries.

pub mod bracket;
pub mod network;
pub mod traversal;

// Re-export key types for easier access
pub use network::Network;
pub use traversal::Adjacency;
