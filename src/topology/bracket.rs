//! Bracket notation for tree topologies.
//!
//! A tree is written as nested groups, e.g.
//! `(10.0.0.1 (10.0.0.2 10.0.0.3) 10.0.0.4)`: an opening bracket starts a
//! subtree rooted at the address it encloses, bare addresses are leaves of
//! the innermost open subtree, and a run of closing brackets ends that many
//! subtrees. Tokens are separated by single spaces.

use crate::error::TopologyError;
use crate::ip::Address;
use crate::topology::traversal::{neighbors, Adjacency};

/// Length of the shortest legal tree, `(a.a.a.a a.a.a.a)`
pub const SMALLEST_NOTATION_LEN: usize = 17;

/// A single space-separated token of bracket notation
#[derive(Debug, Clone, PartialEq)]
enum Token {
    /// `(addr`: opens a subtree rooted at `addr`
    Open(Address),
    /// `addr`: a leaf of the innermost open subtree
    Leaf(Address),
    /// `addr)))`: a leaf that also closes `closes` subtrees
    Close { address: Address, closes: usize },
}

impl Token {
    fn read(raw: &str) -> Result<Self, TopologyError> {
        if let Some(rest) = raw.strip_prefix('(') {
            if rest.ends_with(')') {
                return Err(TopologyError::Parse(format!(
                    "single-node subtree '{}' is not allowed, write it as a bare leaf",
                    raw
                )));
            }
            return Ok(Token::Open(rest.parse()?));
        }

        let trimmed = raw.trim_end_matches(')');
        let closes = raw.len() - trimmed.len();
        let address = trimmed.parse()?;
        if closes == 0 {
            Ok(Token::Leaf(address))
        } else {
            Ok(Token::Close { address, closes })
        }
    }
}

/// Check the outer shape of the notation before any token is read
fn validate_shape(notation: &str) -> Result<(), TopologyError> {
    if notation.len() < SMALLEST_NOTATION_LEN {
        return Err(TopologyError::Parse(format!(
            "'{}' is too short to describe a tree (minimum {} characters)",
            notation, SMALLEST_NOTATION_LEN
        )));
    }
    if !notation.starts_with('(') || !notation.ends_with(')') {
        return Err(TopologyError::Parse(
            "notation must start with '(' and end with ')'".to_string(),
        ));
    }

    let opened = notation.matches('(').count();
    let closed = notation.matches(')').count();
    if opened != closed {
        return Err(TopologyError::Parse(format!(
            "number of opened ({}) and closed ({}) brackets are not equal",
            opened, closed
        )));
    }
    Ok(())
}

/// Builds an adjacency map from tokens, tracking the open ancestors
#[derive(Default)]
struct Parser {
    adjacency: Adjacency,
    ancestors: Vec<Address>,
}

impl Parser {
    /// Introduce a new node; every address may be declared only once
    fn declare(&mut self, address: Address) -> Result<(), TopologyError> {
        if self.adjacency.contains_key(&address) {
            return Err(TopologyError::InvalidTree(format!(
                "address {} is declared more than once",
                address
            )));
        }
        self.adjacency.insert(address, Default::default());
        Ok(())
    }

    /// Declare `address` as a child of the innermost open subtree
    fn attach(&mut self, address: Address) -> Result<(), TopologyError> {
        let parent = *self.ancestors.last().ok_or_else(|| {
            TopologyError::Parse(format!("address {} is outside of any subtree", address))
        })?;
        self.declare(address)?;
        self.adjacency.entry(parent).or_default().insert(address);
        self.adjacency.entry(address).or_default().insert(parent);
        Ok(())
    }

    fn consume(&mut self, token: Token) -> Result<(), TopologyError> {
        match token {
            Token::Open(address) => {
                if self.ancestors.is_empty() {
                    if !self.adjacency.is_empty() {
                        return Err(TopologyError::Parse(format!(
                            "subtree {} starts after the top-level tree was closed",
                            address
                        )));
                    }
                    self.declare(address)?;
                } else {
                    self.attach(address)?;
                }
                self.ancestors.push(address);
            }
            Token::Leaf(address) => self.attach(address)?,
            Token::Close { address, closes } => {
                self.attach(address)?;
                for _ in 0..closes {
                    self.ancestors.pop().ok_or_else(|| {
                        TopologyError::Parse(format!("unbalanced ')' after {}", address))
                    })?;
                }
            }
        }
        Ok(())
    }

    fn finish(self) -> Result<Adjacency, TopologyError> {
        if let Some(open) = self.ancestors.last() {
            return Err(TopologyError::Parse(format!("subtree {} is never closed", open)));
        }
        if self.adjacency.len() < 2 {
            return Err(TopologyError::Parse("a tree needs at least two nodes".to_string()));
        }
        Ok(self.adjacency)
    }
}

/// Parse bracket notation into an adjacency map
pub fn parse(notation: &str) -> Result<Adjacency, TopologyError> {
    validate_shape(notation)?;

    let mut parser = Parser::default();
    for raw in notation.split(' ') {
        parser.consume(Token::read(raw)?)?;
    }
    parser.finish()
}

/// Pending output while rendering
enum Emit {
    Node { node: Address, parent: Option<Address> },
    Space,
    Close,
}

/// Render the tree as seen from `root`, or an empty string if `root` is unknown.
///
/// Leaves below the root are written bare; every other node opens a group
/// holding its address followed by its children in ascending order.
pub fn render(adjacency: &Adjacency, root: Address) -> String {
    let mut out = String::new();
    if !adjacency.contains_key(&root) {
        return out;
    }

    let mut stack = vec![Emit::Node { node: root, parent: None }];
    while let Some(emit) = stack.pop() {
        match emit {
            Emit::Space => out.push(' '),
            Emit::Close => out.push(')'),
            Emit::Node { node, parent } => {
                let children = neighbors(adjacency, node);
                if parent.is_some() && children.len() == 1 {
                    out.push_str(&node.to_string());
                    continue;
                }

                out.push('(');
                out.push_str(&node.to_string());
                stack.push(Emit::Close);
                for &child in children.iter().rev() {
                    if Some(child) != parent {
                        stack.push(Emit::Node { node: child, parent: Some(node) });
                        stack.push(Emit::Space);
                    }
                }
            }
        }
    }
    out
}
