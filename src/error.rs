//! Crate-wide error taxonomy.

use thiserror::Error;

/// Consolidated error type for the similarity engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("invalid config: {reason}")]
    InvalidConfig { reason: String },

    #[error("malformed AST: {detail}")]
    MalformedAst { detail: String },

    /// Canonical serialization for hashing failed. Never surfaced by
    /// `find_similar`: the scorer degrades internally (no hash short-circuit)
    /// rather than fail the run.
    #[error("hash unavailable")]
    HashUnavailable,
}

pub type Result<T> = std::result::Result<T, EngineError>;
