//! Graph construction errors.

use std::fmt;

/// Errors raised while freezing a [`crate::GraphBuilder`] into a
/// [`crate::Graph`]. These are the "design-model malformed" fatal cases:
/// no rules run if the graph itself does not type-check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// Two vertices were registered under the same identifier.
    DuplicateIdentifier(String),
    /// An edge referenced a vertex handle that was never registered.
    DanglingEdge { source: String, target: String },
    /// A rule or builder call referenced a trait name that the design's
    /// loader never populated, suggesting a name mismatch at the boundary.
    UnknownTraitReference(String),
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphError::DuplicateIdentifier(id) => {
                write!(f, "duplicate vertex identifier: {id}")
            }
            GraphError::DanglingEdge { source, target } => {
                write!(f, "edge references missing vertex: {source} -> {target}")
            }
            GraphError::UnknownTraitReference(name) => {
                write!(f, "unknown trait reference: {name}")
            }
        }
    }
}

impl std::error::Error for GraphError {}
