//! Error taxonomy.
//!
//! One `thiserror` enum per component boundary, following the named-variant
//! style of the codebase this was grown from, plus a top-level union for the
//! orchestrator's `Result` type. Only [`DsideError::Input`] and
//! [`DsideError::Configuration`] are fatal; everything else is recorded and
//! the run proceeds.

use thiserror::Error;

pub use dside_graph::GraphError;

/// Malformed decision model: a covered element that does not exist in G,
/// or a payload invariant violated by a rule.
#[derive(Debug, Error)]
pub enum DecisionModelError {
    #[error("decision model of category {category} covers vertex/edge {element} not present in the design graph")]
    UncoveredElement { category: &'static str, element: String },

    #[error("decision model of category {category} is missing required payload field {field}")]
    MissingPayload { category: &'static str, field: &'static str },
}

/// The dominance filter removed all models from a nonempty input with no
/// whitelist exclusion responsible — evidence a category's custom
/// dominance relation is not antisymmetric.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("dominance cycle suspected: {input_len} models went in, 0 came out, with no whitelist in effect")]
    DominanceCycleSuspected { input_len: usize },
}

/// Exploration backend failure: solver crashed, or timed out with no
/// partial solution. Non-fatal to the run; the next exploration item, if
/// any, proceeds.
#[derive(Debug, Error)]
pub enum ExplorationError {
    #[error("explorer {explorer} failed: {reason}")]
    BackendFailure { explorer: String, reason: String },

    #[error("explorer {explorer} timed out after {secs}s with no partial solution")]
    Timeout { explorer: String, secs: u32 },

    #[error("reverse-identification produced an edge referencing {reference}, which is in neither the design graph nor the solution's covered set")]
    IllTypedReverseAnnotation { reference: String },
}

/// Artifact write failure. Non-fatal: the atomic write-to-temp-then-rename
/// pattern guarantees no partial file is left behind, and the run
/// continues with the next solution.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed to write artifact {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode artifact {path} as {format}: {source}")]
    Encoding {
        path: String,
        format: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl From<bincode::Error> for ArtifactError {
    fn from(source: bincode::Error) -> Self {
        ArtifactError::Io {
            path: String::new(),
            source: std::io::Error::new(std::io::ErrorKind::Other, source),
        }
    }
}

/// Top-level union consumed by the orchestrator. `anyhow::Error` is used at
/// the CLI binary boundary; this enum is for in-library propagation.
#[derive(Debug, Error)]
pub enum DsideError {
    #[error("design-model malformed: {0}")]
    Input(#[from] GraphError),

    #[error("decision model error: {0}")]
    DecisionModel(#[from] DecisionModelError),

    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("exploration error: {0}")]
    Exploration(#[from] ExplorationError),

    #[error("artifact error: {0}")]
    Artifact(#[from] ArtifactError),
}

impl DsideError {
    /// Whether this error is fatal to the run (per the error-taxonomy
    /// table: only `Input` and `Configuration` halt the orchestrator before
    /// any result is produced).
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, DsideError::Input(_) | DsideError::Configuration(_))
    }
}
