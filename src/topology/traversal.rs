//! Depth-first traversals over an adjacency map.
//!
//! All walks use an explicit work stack so that long chains cannot exhaust
//! the call stack. Walks that start from a root skip the edge back to the
//! node they came from; this is enough to terminate on any tree.

use std::collections::{btree_set, BTreeMap, BTreeSet};

use crate::ip::Address;

/// Undirected adjacency: every node mapped to its ordered neighbor set
pub type Adjacency = BTreeMap<Address, BTreeSet<Address>>;

static NO_NEIGHBORS: BTreeSet<Address> = BTreeSet::new();

/// Neighbors of `node`, or an empty set if it is unknown
pub fn neighbors(adjacency: &Adjacency, node: Address) -> &BTreeSet<Address> {
    adjacency.get(&node).unwrap_or(&NO_NEIGHBORS)
}

/// Number of undirected edges (each edge is stored once per endpoint)
pub fn edge_count(adjacency: &Adjacency) -> usize {
    adjacency.values().map(BTreeSet::len).sum::<usize>() / 2
}

/// All nodes reachable from `start`, including `start` itself
pub fn reachable(adjacency: &Adjacency, start: Address) -> BTreeSet<Address> {
    let mut visited = BTreeSet::new();
    if !adjacency.contains_key(&start) {
        return visited;
    }

    let mut stack = vec![start];
    visited.insert(start);
    while let Some(node) = stack.pop() {
        for &next in neighbors(adjacency, node) {
            if visited.insert(next) {
                stack.push(next);
            }
        }
    }
    visited
}

/// True if any component contains a cycle (self-loops included)
pub fn has_cycle(adjacency: &Adjacency) -> bool {
    let mut visited = BTreeSet::new();

    for &start in adjacency.keys() {
        if !visited.insert(start) {
            continue;
        }

        let mut stack: Vec<(Address, Option<Address>)> = vec![(start, None)];
        while let Some((node, parent)) = stack.pop() {
            for &next in neighbors(adjacency, node) {
                if Some(next) == parent {
                    continue;
                }
                // A second way into an already discovered node closes a loop
                if !visited.insert(next) {
                    return true;
                }
                stack.push((next, Some(node)));
            }
        }
    }
    false
}

/// True if every node can reach every other node
pub fn is_connected(adjacency: &Adjacency) -> bool {
    match adjacency.keys().next() {
        Some(&first) => reachable(adjacency, first).len() == adjacency.len(),
        None => true,
    }
}

/// True if the adjacency forms one non-empty tree
pub fn is_tree(adjacency: &Adjacency) -> bool {
    !adjacency.is_empty()
        && edge_count(adjacency) == adjacency.len() - 1
        && !has_cycle(adjacency)
        && is_connected(adjacency)
}

/// One level of an in-progress route search
struct Frame<'a> {
    node: Address,
    parent: Option<Address>,
    pending: btree_set::Iter<'a, Address>,
}

impl<'a> Frame<'a> {
    fn new(adjacency: &'a Adjacency, node: Address, parent: Option<Address>) -> Self {
        Self {
            node,
            parent,
            pending: neighbors(adjacency, node).iter(),
        }
    }

    fn next_child(&mut self) -> Option<Address> {
        let parent = self.parent;
        self.pending.by_ref().copied().find(|&next| Some(next) != parent)
    }
}

/// Path from `start` to `end`, both inclusive, or empty if there is none.
///
/// The open frames always hold the path walked so far; a dead end pops its
/// frame before the search continues with the next sibling.
pub fn route(adjacency: &Adjacency, start: Address, end: Address) -> Vec<Address> {
    if start == end || !adjacency.contains_key(&start) || !adjacency.contains_key(&end) {
        return Vec::new();
    }

    let mut frames = vec![Frame::new(adjacency, start, None)];
    while let Some(frame) = frames.last_mut() {
        let current = frame.node;
        match frame.next_child() {
            Some(next) if next == end => {
                let mut path: Vec<Address> = frames.iter().map(|f| f.node).collect();
                path.push(end);
                return path;
            }
            Some(next) => frames.push(Frame::new(adjacency, next, Some(current))),
            None => {
                frames.pop();
            }
        }
    }
    Vec::new()
}

/// Nodes grouped by distance from `root`, each group sorted ascending
pub fn levels(adjacency: &Adjacency, root: Address) -> Vec<Vec<Address>> {
    let mut levels: Vec<Vec<Address>> = Vec::new();
    if !adjacency.contains_key(&root) {
        return levels;
    }

    let mut stack: Vec<(Address, Option<Address>, usize)> = vec![(root, None, 0)];
    while let Some((node, parent, depth)) = stack.pop() {
        if levels.len() == depth {
            levels.push(Vec::new());
        }
        levels[depth].push(node);

        for &next in neighbors(adjacency, node) {
            if Some(next) != parent {
                stack.push((next, Some(node), depth + 1));
            }
        }
    }

    for level in &mut levels {
        level.sort();
    }
    levels
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(last: u8) -> Address {
        Address::new(10, 0, 0, last)
    }

    fn build(edges: &[(u8, u8)]) -> Adjacency {
        let mut adjacency = Adjacency::new();
        for &(a, b) in edges {
            adjacency.entry(addr(a)).or_default().insert(addr(b));
            adjacency.entry(addr(b)).or_default().insert(addr(a));
        }
        adjacency
    }

    #[test]
    fn test_reachable_and_connectivity() {
        let adjacency = build(&[(1, 2), (2, 3), (4, 5)]);
        let from_one = reachable(&adjacency, addr(1));
        assert_eq!(from_one.len(), 3);
        assert!(!from_one.contains(&addr(4)));
        assert!(!is_connected(&adjacency));
        assert!(reachable(&adjacency, addr(9)).is_empty());

        assert!(is_connected(&build(&[(1, 2), (2, 3)])));
    }

    #[test]
    fn test_cycle_detection() {
        assert!(!has_cycle(&build(&[(1, 2), (1, 3), (3, 4)])));
        assert!(has_cycle(&build(&[(1, 2), (2, 3), (3, 1)])));
        // Cycle hidden in a second component
        assert!(has_cycle(&build(&[(1, 2), (5, 6), (6, 7), (7, 5)])));

        let mut self_loop = build(&[(1, 2)]);
        self_loop.get_mut(&addr(2)).unwrap().insert(addr(2));
        assert!(has_cycle(&self_loop));
    }

    #[test]
    fn test_is_tree() {
        assert!(is_tree(&build(&[(1, 2), (1, 3), (3, 4)])));
        assert!(!is_tree(&build(&[(1, 2), (3, 4)])));
        assert!(!is_tree(&build(&[(1, 2), (2, 3), (3, 1)])));
        assert!(!is_tree(&Adjacency::new()));
        assert_eq!(edge_count(&build(&[(1, 2), (1, 3), (3, 4)])), 3);
    }

    #[test]
    fn test_route_follows_edges() {
        let adjacency = build(&[(1, 2), (1, 3), (3, 4), (3, 5), (5, 6)]);
        assert_eq!(route(&adjacency, addr(2), addr(6)), vec![addr(2), addr(1), addr(3), addr(5), addr(6)]);
        assert_eq!(route(&adjacency, addr(4), addr(5)), vec![addr(4), addr(3), addr(5)]);
        assert_eq!(route(&adjacency, addr(1), addr(2)), vec![addr(1), addr(2)]);
        assert!(route(&adjacency, addr(1), addr(1)).is_empty());
        assert!(route(&adjacency, addr(1), addr(99)).is_empty());
    }

    #[test]
    fn test_route_survives_long_chain() {
        let edges: Vec<(u8, u8)> = (1..=254).map(|i| (i, i + 1)).collect();
        let adjacency = build(&edges);
        let path = route(&adjacency, addr(1), addr(255));
        assert_eq!(path.len(), 255);
        assert_eq!(levels(&adjacency, addr(1)).len(), 255);
    }

    #[test]
    fn test_levels_grouped_by_depth() {
        let adjacency = build(&[(1, 3), (1, 2), (3, 5), (3, 4), (2, 6)]);
        assert_eq!(
            levels(&adjacency, addr(1)),
            vec![vec![addr(1)], vec![addr(2), addr(3)], vec![addr(4), addr(5), addr(6)]]
        );
        assert_eq!(
            levels(&adjacency, addr(5)),
            vec![vec![addr(5)], vec![addr(3)], vec![addr(1), addr(4)], vec![addr(2)], vec![addr(6)]]
        );
        assert!(levels(&adjacency, addr(42)).is_empty());
    }
}
