//! Tree-shaped network topology.
//!
//! A [`Network`] is an undirected tree over [`Address`]es. Both constructors
//! validate their input before anything is built, and every mutation either
//! moves the tree to another valid tree or leaves it untouched and returns
//! `false`.

use log::{debug, warn};
use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use crate::error::TopologyError;
use crate::ip::Address;
use crate::topology::bracket;
use crate::topology::traversal::{self, Adjacency};

/// An undirected, connected, acyclic network of addresses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Network {
    adjacency: Adjacency,
}

impl Network {
    /// Create a star with `root` linked to every child.
    ///
    /// # Errors
    /// * [`TopologyError::InvalidArgument`] if `children` is empty
    /// * [`TopologyError::InvalidTree`] if `root` is among the children or a
    ///   child is listed twice
    pub fn new(root: Address, children: &[Address]) -> Result<Self, TopologyError> {
        if children.is_empty() {
            return Err(TopologyError::InvalidArgument(format!(
                "root {} needs at least one child",
                root
            )));
        }
        if children.contains(&root) {
            return Err(TopologyError::InvalidTree(format!(
                "root {} cannot be its own child",
                root
            )));
        }

        let child_set: BTreeSet<Address> = children.iter().copied().collect();
        if child_set.len() != children.len() {
            return Err(TopologyError::InvalidTree(
                "the same child address is listed more than once".to_string(),
            ));
        }

        let mut adjacency = BTreeMap::new();
        for &child in &child_set {
            adjacency.insert(child, BTreeSet::from([root]));
        }
        adjacency.insert(root, child_set);

        debug!("Built star network rooted at {} with {} children", root, children.len());
        Ok(Self { adjacency })
    }

    /// Create a network from bracket notation such as
    /// `(10.0.0.1 (10.0.0.2 10.0.0.3) 10.0.0.4)`.
    pub fn from_bracket_notation(notation: &str) -> Result<Self, TopologyError> {
        let adjacency = bracket::parse(notation)?;
        debug!("Parsed bracket notation into a network of {} nodes", adjacency.len());
        Ok(Self { adjacency })
    }

    /// Returns true if `address` is a node of this network
    pub fn contains(&self, address: Address) -> bool {
        self.adjacency.contains_key(&address)
    }

    /// All nodes in ascending address order
    pub fn list(&self) -> Vec<Address> {
        self.adjacency.keys().copied().collect()
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.adjacency.len()
    }

    /// Always false for a successfully constructed network
    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Neighbors of `address` in ascending order, empty if it is unknown
    pub fn neighbors(&self, address: Address) -> Vec<Address> {
        traversal::neighbors(&self.adjacency, address).iter().copied().collect()
    }

    /// Every edge once, as `(lower, higher)` pairs in ascending order
    pub fn edges(&self) -> Vec<(Address, Address)> {
        self.adjacency
            .iter()
            .flat_map(|(&node, neighbors)| {
                neighbors
                    .iter()
                    .filter(move |&&other| node < other)
                    .map(move |&other| (node, other))
            })
            .collect()
    }

    /// Number of edges on the longest path down from `root`; 0 if `root` is unknown
    pub fn height(&self, root: Address) -> usize {
        self.levels(root).len().saturating_sub(1)
    }

    /// Nodes grouped by their distance from `root`.
    ///
    /// Group 0 is `[root]`; each group is sorted ascending. Empty if `root`
    /// is unknown.
    pub fn levels(&self, root: Address) -> Vec<Vec<Address>> {
        traversal::levels(&self.adjacency, root)
    }

    /// The unique path from `start` to `end`, both included.
    ///
    /// Empty if either endpoint is unknown or both are the same node.
    pub fn route(&self, start: Address, end: Address) -> Vec<Address> {
        traversal::route(&self.adjacency, start, end)
    }

    /// Bracket notation of the tree as seen from `root`; empty if `root` is unknown
    pub fn to_bracket_notation(&self, root: Address) -> String {
        bracket::render(&self.adjacency, root)
    }

    /// Add the edge `{a, b}` if both nodes exist and no path joins them yet.
    pub fn connect(&mut self, a: Address, b: Address) -> bool {
        if !self.contains(a) || !self.contains(b) {
            return false;
        }
        if traversal::reachable(&self.adjacency, a).contains(&b) {
            debug!("Refusing to connect {} and {}: they are already connected", a, b);
            return false;
        }

        self.adjacency.entry(a).or_default().insert(b);
        self.adjacency.entry(b).or_default().insert(a);
        true
    }

    /// Remove the edge `{a, b}`, dropping the endpoint that becomes isolated.
    ///
    /// Fails if the network has only two nodes, if the edge does not exist,
    /// or if neither endpoint is a leaf (the tree would fall apart).
    pub fn disconnect(&mut self, a: Address, b: Address) -> bool {
        if self.adjacency.len() == 2 {
            return false;
        }

        let a_degree = match self.adjacency.get(&a) {
            Some(neighbors) if neighbors.contains(&b) => neighbors.len(),
            _ => return false,
        };
        let b_degree = match self.adjacency.get(&b) {
            Some(neighbors) if neighbors.contains(&a) => neighbors.len(),
            _ => return false,
        };
        if a_degree > 1 && b_degree > 1 {
            debug!("Refusing to disconnect {} and {}: the network would split", a, b);
            return false;
        }

        for (node, other) in [(a, b), (b, a)] {
            if let Some(neighbors) = self.adjacency.get_mut(&node) {
                neighbors.remove(&other);
                if neighbors.is_empty() {
                    self.adjacency.remove(&node);
                }
            }
        }
        true
    }

    /// Merge `other` into this network.
    ///
    /// The merge is computed on a copy and only swapped in if the result is
    /// still one tree. Returns false, leaving this network unchanged, if
    /// `other` brings nothing new or the merge would create a cycle or leave
    /// disconnected parts.
    pub fn add(&mut self, other: &Network) -> bool {
        if !self.gains_from(other) {
            debug!("Nothing to merge: every node and edge is already present");
            return false;
        }

        let mut merged = self.adjacency.clone();
        for (&node, neighbors) in &other.adjacency {
            merged.entry(node).or_default().extend(neighbors.iter().copied());
        }

        if !traversal::is_tree(&merged) {
            let reason = if traversal::has_cycle(&merged) {
                "contains a cycle"
            } else {
                "is not connected"
            };
            warn!("Rolled back merge of {} nodes: the result {}", other.len(), reason);
            return false;
        }

        debug!("Merged network grew from {} to {} nodes", self.adjacency.len(), merged.len());
        self.adjacency = merged;
        true
    }

    /// True if `other` has a node or an edge this network lacks
    fn gains_from(&self, other: &Network) -> bool {
        other.adjacency.iter().any(|(node, neighbors)| match self.adjacency.get(node) {
            Some(ours) => !neighbors.is_subset(ours),
            None => true,
        })
    }
}

impl FromStr for Network {
    type Err = TopologyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_bracket_notation(s)
    }
}
