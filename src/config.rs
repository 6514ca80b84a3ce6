//! Thresholds, weights, and caps for the similarity engine.
//!
//! Mirrors the toolkit's `DuplicateDetectionConfig` pattern: a plain,
//! serde-(de)serializable value constructed once and threaded through the
//! scorer and scheduler. Loading this from a file or CLI flags is a host
//! concern outside this crate.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Weights applied to the four composite subscores. Must be positive and
/// sum to ~1.0; see [`Weights::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub tree_edit: f64,
    pub token_similarity: f64,
    pub structural: f64,
    pub signature: f64,
    /// Multiplicative penalty applied to the structural subscore when the
    /// two functions' structural signatures differ. In `(0, 1]`.
    pub different_signature: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            tree_edit: 0.35,
            token_similarity: 0.30,
            structural: 0.20,
            signature: 0.15,
            different_signature: 0.9,
        }
    }
}

/// Replacement scores used by the body structure comparator under specific
/// heuristics (see §4.6/§4.8 of the design).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Structural score substituted when both bodies contain a `return`
    /// of a binary expression and are otherwise >0.7 similar.
    pub similar_operations_floor: f64,
    /// Structural score used when two bodies have different statement counts.
    pub statement_count_penalty: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            similar_operations_floor: 0.85,
            statement_count_penalty: 0.5,
        }
    }
}

/// Pre-filter cut-offs that let the scorer reject obviously-dissimilar pairs
/// without running the full four-subscore comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Limits {
    /// Hard cap on the number of memoized pair scores.
    pub max_cache_size: usize,
    /// Maximum allowed gap between two signature string lengths.
    pub max_signature_length_diff: usize,
    /// Maximum allowed ratio (and reciprocal) between two line counts.
    pub max_line_difference_ratio: f64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_cache_size: 100_000,
            max_signature_length_diff: 40,
            max_line_difference_ratio: 3.0,
        }
    }
}

/// Pre-filter cut-off for an empty body compared against a populated one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Processing {
    pub max_empty_vs_populated: usize,
    /// Size of the scheduler's worker pool. `0` means "use the number of
    /// hardware threads".
    pub worker_threads: usize,
}

impl Default for Processing {
    fn default() -> Self {
        Self {
            max_empty_vs_populated: 3,
            worker_threads: 0,
        }
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Minimum composite score for a pair to be returned as a match.
    pub threshold: f64,
    pub weights: Weights,
    pub thresholds: Thresholds,
    pub limits: Limits,
    pub processing: Processing,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            threshold: 0.8,
            weights: Weights::default(),
            thresholds: Thresholds::default(),
            limits: Limits::default(),
            processing: Processing::default(),
        }
    }
}

impl Config {
    /// Build a config and validate it in one step.
    pub fn new(
        threshold: f64,
        weights: Weights,
        thresholds: Thresholds,
        limits: Limits,
        processing: Processing,
    ) -> Result<Self> {
        let config = Self {
            threshold,
            weights,
            thresholds,
            limits,
            processing,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants from the design doc. Refused at construction
    /// time, never at run time.
    pub fn validate(&self) -> Result<()> {
        let w = &self.weights;
        for (name, value) in [
            ("weights.tree_edit", w.tree_edit),
            ("weights.token_similarity", w.token_similarity),
            ("weights.structural", w.structural),
            ("weights.signature", w.signature),
        ] {
            if value <= 0.0 {
                return Err(EngineError::InvalidConfig {
                    reason: format!("{name} must be positive, got {value}"),
                });
            }
        }

        let sum = w.tree_edit + w.token_similarity + w.structural + w.signature;
        if !(0.98..=1.02).contains(&sum) {
            return Err(EngineError::InvalidConfig {
                reason: format!("weights must sum to ~1.0 (within 0.02), got {sum}"),
            });
        }

        if !(w.different_signature > 0.0 && w.different_signature <= 1.0) {
            return Err(EngineError::InvalidConfig {
                reason: format!(
                    "weights.different_signature must be in (0,1], got {}",
                    w.different_signature
                ),
            });
        }

        if self.thresholds.statement_count_penalty >= 1.0
            || self.thresholds.statement_count_penalty < 0.0
        {
            return Err(EngineError::InvalidConfig {
                reason: format!(
                    "thresholds.statement_count_penalty must be in [0,1), got {}",
                    self.thresholds.statement_count_penalty
                ),
            });
        }

        if self.limits.max_line_difference_ratio < 1.0 {
            return Err(EngineError::InvalidConfig {
                reason: format!(
                    "limits.max_line_difference_ratio must be >= 1.0, got {}",
                    self.limits.max_line_difference_ratio
                ),
            });
        }

        Ok(())
    }

    /// Resolve `processing.worker_threads == 0` to the number of hardware
    /// threads, matching the toolkit's `num_cpus::get()` default idiom.
    pub fn resolved_worker_threads(&self) -> usize {
        if self.processing.worker_threads == 0 {
            num_cpus::get().max(1)
        } else {
            self.processing.worker_threads
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_weight() {
        let mut config = Config::default();
        config.weights.tree_edit = 0.0;
        assert!(matches!(
            config.validate(),
            Err(EngineError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn rejects_weights_not_summing_to_one() {
        let mut config = Config::default();
        config.weights.tree_edit = 0.9;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_out_of_range_different_signature_penalty() {
        let mut config = Config::default();
        config.weights.different_signature = 1.5;
        assert!(config.validate().is_err());

        config.weights.different_signature = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_worker_threads_resolves_to_hardware_threads() {
        let config = Config::default();
        assert_eq!(config.processing.worker_threads, 0);
        assert!(config.resolved_worker_threads() >= 1);
    }
}
