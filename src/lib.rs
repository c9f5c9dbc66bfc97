//! # Nettree - tree-shaped IPv4 network topologies
//!
//! This library models a network as an undirected tree whose nodes are
//! dotted-quad addresses, and keeps it a valid tree (connected, acyclic, no
//! duplicate nodes) through every operation.
//!
//! ## Overview
//!
//! A [`Network`] is built either as a star (a root linked to its children) or
//! from bracket notation, where a parenthesised group opens a subtree:
//!
//! ```text
//! (10.0.0.1 (10.0.0.2 10.0.0.3) 10.0.0.4)
//! ```
//!
//! Here `10.0.0.1` links to `10.0.0.2` and `10.0.0.4`, and `10.0.0.2` links
//! to `10.0.0.3`.
//!
//! ## Architecture
//!
//! - `ip`: the [`Address`] node identity and its dotted-quad parsing
//! - `topology`: the [`Network`] itself, bracket notation and traversals
//! - `error`: construction errors
//! - `config` / `config_loader`: YAML scenario files
//! - `scenario`: applies scenario steps to named networks
//!
//! ## Example Usage
//!
//! ```rust
//! use nettree::{Address, Network};
//!
//! let mut network: Network = "(10.0.0.1 (10.0.0.2 10.0.0.3) 10.0.0.4)".parse()?;
//! let root: Address = "10.0.0.1".parse()?;
//! let leaf: Address = "10.0.0.3".parse()?;
//!
//! assert_eq!(network.height(root), 2);
//! assert_eq!(network.route(leaf, root).len(), 3);
//! assert_eq!(network.to_bracket_notation(root), "(10.0.0.1 (10.0.0.2 10.0.0.3) 10.0.0.4)");
//!
//! // Graft a star below 10.0.0.4
//! let branch = Network::new(Address::new(10, 0, 0, 4), &[Address::new(10, 0, 0, 5)])?;
//! assert!(network.add(&branch));
//! assert_eq!(network.len(), 5);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Error Handling
//!
//! Construction returns [`TopologyError`]; mutations after construction
//! return `false` and leave the network unchanged when they are refused.
//! Scenario loading and running use `color_eyre` reports with context.

pub mod config;
pub mod config_loader;
pub mod error;
pub mod ip;
pub mod scenario;
pub mod topology;

pub use error::TopologyError;
pub use ip::{Address, AddressParseError};
pub use topology::Network;
