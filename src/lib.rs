//! AST-based near-duplicate function detection.
//!
//! Given a set of parsed function declarations (see [`FunctionRecord`]),
//! [`scheduler::find_similar`] returns every pair whose composite similarity
//! score meets a configured [`Config::threshold`], computed from tree edit
//! distance, token-sequence edit distance, body-structure comparison, and
//! signature comparison. Directory walking, source parsing, report
//! serialization, and CLI plumbing are all the caller's responsibility —
//! this crate only scores and schedules.

mod body;
mod cache;
mod cancellation;
mod config;
mod error;
mod hash;
mod levenshtein;
mod model;
mod normalize;
mod scheduler;
mod scorer;
mod signature;
mod ted;
mod token_similarity;
mod tokenize;

pub use cache::SimilarityCache;
pub use cancellation::CancellationToken;
pub use config::{Config, Limits, Processing, Thresholds, Weights};
pub use error::{EngineError, Result};
pub use model::{AstNode, FunctionRecord, LitKind, Match, Param, TypeExpr};
pub use scheduler::{find_similar, DetectionOutcome, PairScheduler, ProgressFn};
pub use scorer::score;

pub use hash::hash_normalized;
pub use normalize::normalize;
pub use signature::render as render_signature;
pub use tokenize::tokenize;
