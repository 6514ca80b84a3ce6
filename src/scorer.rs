//! Composite Scorer (§4.8): combines the four subscores into a single
//! `[0,1]` similarity, with cache lookups and early-termination pre-filters
//! in front of the expensive comparison.

use crate::body;
use crate::cache::SimilarityCache;
use crate::config::Config;
use crate::model::{count_nodes, FunctionRecord};
use crate::signature;
use crate::ted;
use crate::token_similarity;

/// Score two function records in `[0,1]` per the protocol in §4.8.
pub fn score(f1: &FunctionRecord, f2: &FunctionRecord, config: &Config, cache: &SimilarityCache) -> f64 {
    let h1 = f1.structural_hash();
    let h2 = f2.structural_hash();

    if h1 == h2 {
        tracing::trace!(h1, h2, "structural hash match, short-circuiting to 1.0");
        return 1.0;
    }

    if let Some(cached) = cache.get(h1, h2) {
        tracing::trace!(h1, h2, "cache hit");
        return cached;
    }

    if !could_be_similar(f1, f2, config) {
        tracing::trace!(h1, h2, "rejected by pre-filter");
        cache_insert(cache, h1, h2, 0.0, config);
        return 0.0;
    }

    let n1 = f1.normalized();
    let n2 = f2.normalized();

    let nodes_total = count_nodes(n1) + count_nodes(n2);
    let distance = ted::ted(Some(n1), Some(n2));
    let s_te = if nodes_total == 0 {
        1.0
    } else {
        (1.0 - distance as f64 / nodes_total as f64).clamp(0.0, 1.0)
    };

    let s_tok = token_similarity::similarity(n1, n2);

    let mut s_body = body::score(f1.body(), f2.body(), config.thresholds.statement_count_penalty);
    if f1.signature() != f2.signature() {
        s_body *= config.weights.different_signature;
    }
    if s_body > 0.7 && body::has_similar_operations(f1.body()) && body::has_similar_operations(f2.body()) {
        s_body = config.thresholds.similar_operations_floor;
    }

    let s_sig = signature::score(f1.signature(), f2.signature());

    let composite = (config.weights.tree_edit * s_te
        + config.weights.token_similarity * s_tok
        + config.weights.structural * s_body
        + config.weights.signature * s_sig)
        .clamp(0.0, 1.0);

    cache_insert(cache, h1, h2, composite, config);
    composite
}

fn cache_insert(cache: &SimilarityCache, h1: &str, h2: &str, value: f64, config: &Config) {
    if cache.len() >= config.limits.max_cache_size {
        tracing::warn!(max = config.limits.max_cache_size, "similarity cache is full, dropping entry");
        return;
    }
    cache.insert(h1, h2, value);
}

/// Early-termination pre-filter (§4.8 step 4): reject pairs that cannot
/// plausibly score above threshold without running the full comparison.
fn could_be_similar(f1: &FunctionRecord, f2: &FunctionRecord, config: &Config) -> bool {
    let sig1 = f1.signature();
    let sig2 = f2.signature();
    if (sig1.chars().count() as i64 - sig2.chars().count() as i64).unsigned_abs() as usize
        > config.limits.max_signature_length_diff
    {
        return false;
    }

    let lc1 = f1.line_count();
    let lc2 = f2.line_count();
    if lc1 > 0 && lc2 > 0 {
        let ratio = lc1 as f64 / lc2 as f64;
        let r = config.limits.max_line_difference_ratio;
        if !(1.0 / r..=r).contains(&ratio) {
            return false;
        }
    }

    let sc1 = f1.statement_count();
    let sc2 = f2.statement_count();
    let (empty, populated) = if sc1 == 0 {
        (sc1, sc2)
    } else if sc2 == 0 {
        (sc2, sc1)
    } else {
        return true;
    };
    if empty == 0 && populated > config.processing.max_empty_vs_populated {
        return false;
    }

    true
}
