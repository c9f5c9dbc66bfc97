//! Error types for topology construction.
//!
//! Construction either yields a valid tree or one of these errors; no partial
//! topology is ever returned. Mutations after construction report failure as
//! a plain `false` instead.

use crate::ip::AddressParseError;

/// Errors that can occur while constructing a topology
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TopologyError {
    /// The caller supplied arguments that cannot describe any tree
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The input is well-formed but describes something that is not a tree
    #[error("Invalid tree topology: {0}")]
    InvalidTree(String),

    /// Malformed bracket notation
    #[error("Malformed bracket notation: {0}")]
    Parse(String),

    /// An embedded address failed to parse
    #[error("Malformed address: {0}")]
    Address(#[from] AddressParseError),
}

impl TopologyError {
    /// True for lexical malformation (bracket notation or address text),
    /// false for structural violations and caller errors
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Self::Parse(_) | Self::Address(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        assert!(TopologyError::Parse("x".to_string()).is_parse_error());
        assert!(TopologyError::Address(AddressParseError::Empty).is_parse_error());
        assert!(!TopologyError::InvalidTree("x".to_string()).is_parse_error());
        assert!(!TopologyError::InvalidArgument("x".to_string()).is_parse_error());
    }

    #[test]
    fn test_address_error_converts() {
        let err: TopologyError = AddressParseError::Empty.into();
        assert_eq!(err.to_string(), "Malformed address: empty input is not a valid address");
    }
}
