//! Body Structure Comparator (§4.6): compares block-level statement
//! sequences by coarse syntactic kind.

use std::mem::discriminant;

use crate::model::{statements_of, AstNode};

/// Score two function bodies in `[0,1]`.
///
/// Both absent ⇒ 1.0; exactly one absent ⇒ 0.0; different statement counts
/// ⇒ `statement_count_penalty`; equal counts ⇒ fraction of positionally
/// matching statement kinds (two empty bodies trivially match at 1.0).
pub fn score(
    a: Option<&AstNode>,
    b: Option<&AstNode>,
    statement_count_penalty: f64,
) -> f64 {
    match (a, b) {
        (None, None) => 1.0,
        (None, Some(_)) | (Some(_), None) => 0.0,
        (Some(body_a), Some(body_b)) => {
            let stmts_a = statements_of(body_a);
            let stmts_b = statements_of(body_b);

            if stmts_a.len() != stmts_b.len() {
                return statement_count_penalty;
            }
            if stmts_a.is_empty() {
                return 1.0;
            }

            let matches = stmts_a
                .iter()
                .zip(stmts_b.iter())
                .filter(|(x, y)| same_kind(x, y))
                .count();

            matches as f64 / stmts_a.len() as f64
        }
    }
}

fn same_kind(a: &AstNode, b: &AstNode) -> bool {
    discriminant(a) == discriminant(b)
}

/// The "hasSimilarOperations" heuristic (§4.8/§9): true iff the body
/// contains a `return` statement whose value is a binary expression.
/// Narrow by design — replicated verbatim from the source behavior rather
/// than generalized.
pub fn has_similar_operations(body: Option<&AstNode>) -> bool {
    let Some(body) = body else {
        return false;
    };
    statements_of(body).iter().any(|stmt| {
        matches!(
            stmt,
            AstNode::Return(values) if values.iter().any(|v| matches!(v, AstNode::Binary { .. }))
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LitKind;

    fn ident(name: &str) -> AstNode {
        AstNode::Identifier(name.into())
    }

    #[test]
    fn both_absent_scores_one() {
        assert_eq!(score(None, None, 0.5), 1.0);
    }

    #[test]
    fn one_absent_scores_zero() {
        let body = AstNode::Block(vec![]);
        assert_eq!(score(Some(&body), None, 0.5), 0.0);
        assert_eq!(score(None, Some(&body), 0.5), 0.0);
    }

    #[test]
    fn different_statement_counts_use_penalty() {
        let a = AstNode::Block(vec![AstNode::Return(vec![ident("x")])]);
        let b = AstNode::Block(vec![
            AstNode::Return(vec![ident("x")]),
            AstNode::Return(vec![ident("y")]),
        ]);
        assert_eq!(score(Some(&a), Some(&b), 0.42), 0.42);
    }

    #[test]
    fn equal_counts_same_kinds_scores_one() {
        let a = AstNode::Block(vec![
            AstNode::Assign {
                lhs: vec![ident("x")],
                rhs: vec![ident("y")],
            },
            AstNode::Return(vec![ident("x")]),
        ]);
        let b = AstNode::Block(vec![
            AstNode::Assign {
                lhs: vec![ident("a")],
                rhs: vec![ident("b")],
            },
            AstNode::Return(vec![ident("a")]),
        ]);
        assert_eq!(score(Some(&a), Some(&b), 0.5), 1.0);
    }

    #[test]
    fn partial_kind_match_is_fractional() {
        let a = AstNode::Block(vec![
            AstNode::Return(vec![ident("x")]),
            AstNode::Return(vec![ident("y")]),
        ]);
        let b = AstNode::Block(vec![
            AstNode::Return(vec![ident("x")]),
            AstNode::ExprStmt(Box::new(ident("y"))),
        ]);
        assert_eq!(score(Some(&a), Some(&b), 0.5), 0.5);
    }

    #[test]
    fn detects_return_of_binary_expression() {
        let body = AstNode::Block(vec![AstNode::Return(vec![AstNode::Binary {
            op: "+".into(),
            left: Box::new(ident("a")),
            right: Box::new(AstNode::BasicLiteral {
                kind: LitKind::Int,
                value: "NUMBER".into(),
            }),
        }])]);
        assert!(has_similar_operations(Some(&body)));
    }

    #[test]
    fn plain_return_is_not_similar_operations() {
        let body = AstNode::Block(vec![AstNode::Return(vec![ident("a")])]);
        assert!(!has_similar_operations(Some(&body)));
    }
}
