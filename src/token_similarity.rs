//! Token-sequence similarity (§4.5): a `[0,1]` score derived from the
//! Levenshtein distance between two functions' space-joined token streams.

use crate::levenshtein;
use crate::model::AstNode;
use crate::tokenize::{join, tokenize};

/// Similarity between two normalized ASTs based on their token sequences.
pub fn similarity(a: &AstNode, b: &AstNode) -> f64 {
    let s1 = join(&tokenize(a));
    let s2 = join(&tokenize(b));
    similarity_strings(&s1, &s2)
}

fn similarity_strings(s1: &str, s2: &str) -> f64 {
    if s1.is_empty() && s2.is_empty() {
        return 1.0;
    }
    if s1.is_empty() || s2.is_empty() {
        return 0.0;
    }

    let d = levenshtein::distance(s1, s2) as f64;
    let l = s1.chars().count().max(s2.chars().count()) as f64;
    (1.0 - d / l).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;

    #[test]
    fn identical_token_streams_score_one() {
        let a = AstNode::Identifier("x".into());
        assert_eq!(similarity(&normalize(&a), &normalize(&a)), 1.0);
    }

    #[test]
    fn both_empty_scores_one() {
        assert_eq!(similarity_strings("", ""), 1.0);
    }

    #[test]
    fn one_empty_scores_zero() {
        assert_eq!(similarity_strings("abc", ""), 0.0);
        assert_eq!(similarity_strings("", "abc"), 0.0);
    }

    #[test]
    fn single_operator_difference_scores_close_to_one() {
        let plus = AstNode::Binary {
            op: "+".into(),
            left: Box::new(AstNode::Identifier("a".into())),
            right: Box::new(AstNode::Identifier("b".into())),
        };
        let times = AstNode::Binary {
            op: "*".into(),
            left: Box::new(AstNode::Identifier("a".into())),
            right: Box::new(AstNode::Identifier("b".into())),
        };
        let score = similarity(&normalize(&plus), &normalize(&times));
        assert!(score > 0.8, "expected high similarity, got {score}");
    }
}
