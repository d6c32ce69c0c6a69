//! Error types for operation-node construction and compilation.

use thiserror::Error;

use crate::ast::NodeKind;

/// The main error type for querynode operations.
#[derive(Debug, Error)]
pub enum QueryError {
    /// A factory (or the compiler) was handed a structurally invalid node.
    #[error("Invalid structure: {node} {reason}")]
    InvalidStructure { node: NodeKind, reason: &'static str },

    /// The target dialect has no syntax for a clause present in the tree.
    #[error("Unsupported clause: {clause} is not supported by the {dialect} dialect")]
    UnsupportedClause { clause: String, dialect: String },

    /// A node of one kind was used where another kind is required.
    #[error("Kind mismatch: expected {expected}, found {found}")]
    KindMismatch { expected: NodeKind, found: NodeKind },

    /// Dialect profile could not be read or understood.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl QueryError {
    /// Create an invalid structure error for the given node kind.
    pub fn invalid(node: NodeKind, reason: &'static str) -> Self {
        Self::InvalidStructure { node, reason }
    }

    /// Create an unsupported clause error.
    pub fn unsupported(clause: impl Into<String>, dialect: impl Into<String>) -> Self {
        Self::UnsupportedClause {
            clause: clause.into(),
            dialect: dialect.into(),
        }
    }

    /// Create a kind mismatch error.
    pub fn mismatch(expected: NodeKind, found: NodeKind) -> Self {
        Self::KindMismatch { expected, found }
    }
}

impl From<toml::de::Error> for QueryError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result type alias for querynode operations.
pub type QueryResult<T> = Result<T, QueryError>;
