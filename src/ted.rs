//! Tree Edit Distance (§4.4): a bounded approximation of the edit distance
//! between two normalized AST roots.
//!
//! Not classical Zhang–Shasha: this is a top-down recursion over three
//! alternatives at each node pair (substitute, insert, delete), each costing
//! 1 plus a recursive contribution, with an early-exit "structurally equal"
//! check that skips the recursion entirely for node pairs the approximation
//! considers identical. That equality check is deliberately shallow for
//! binary/unary operators (kind + operator spelling only, operands are not
//! compared) — a documented simplification of the approximation, not a bug
//! to be fixed; callers should not expect an optimal lower bound.

use crate::model::{children, AstNode};

/// Approximate edit distance between two (possibly absent) AST nodes.
///
/// `ted(None, None) == 0`; `ted(Some(_), None) == ted(None, Some(_)) == 1`;
/// `ted(a, b) == ted(b, a)`; identical trees yield 0.
pub fn ted(a: Option<&AstNode>, b: Option<&AstNode>) -> usize {
    match (a, b) {
        (None, None) => 0,
        (None, Some(_)) | (Some(_), None) => 1,
        (Some(na), Some(nb)) => {
            if structurally_equal(na, nb) {
                return 0;
            }

            let substitute = 1 + child_sequence_distance(na, nb);

            let b_children = children(nb);
            let insert = 1 + b_children
                .iter()
                .map(|c| ted(Some(na), Some(c)))
                .min()
                .unwrap_or(0);

            let a_children = children(na);
            let delete = 1 + a_children
                .iter()
                .map(|c| ted(Some(c), Some(nb)))
                .min()
                .unwrap_or(0);

            substitute.min(insert).min(delete)
        }
    }
}

/// Positional child alignment: child `k` of `a` against child `k` of `b`;
/// a side running out of children contributes the usual one-sided cost.
fn child_sequence_distance(a: &AstNode, b: &AstNode) -> usize {
    let ca = children(a);
    let cb = children(b);
    let len = ca.len().max(cb.len());
    (0..len)
        .map(|k| ted(ca.get(k).copied(), cb.get(k).copied()))
        .sum()
}

/// The "short-circuit" equality predicate from §4.4.
fn structurally_equal(a: &AstNode, b: &AstNode) -> bool {
    match (a, b) {
        (AstNode::Identifier(_), AstNode::Identifier(_)) => true,
        (
            AstNode::BasicLiteral { kind: k1, .. },
            AstNode::BasicLiteral { kind: k2, .. },
        ) => k1 == k2,
        (AstNode::Binary { op: o1, .. }, AstNode::Binary { op: o2, .. }) => o1 == o2,
        (AstNode::Unary { op: o1, .. }, AstNode::Unary { op: o2, .. }) => o1 == o2,
        (
            AstNode::Call {
                callee: c1,
                args: a1,
            },
            AstNode::Call {
                callee: c2,
                args: a2,
            },
        ) => {
            structurally_equal(c1, c2)
                && a1.len() == a2.len()
                && a1.iter().zip(a2.iter()).all(|(x, y)| structurally_equal(x, y))
        }
        (AstNode::Opaque { kind: k1 }, AstNode::Opaque { kind: k2 }) => k1 == k2,
        (AstNode::Block(s1), AstNode::Block(s2)) => pairwise_equal(s1, s2),
        (AstNode::ExprStmt(e1), AstNode::ExprStmt(e2)) => structurally_equal(e1, e2),
        (AstNode::Return(v1), AstNode::Return(v2)) => pairwise_equal(v1, v2),
        (
            AstNode::Assign { lhs: l1, rhs: r1 },
            AstNode::Assign { lhs: l2, rhs: r2 },
        ) => pairwise_equal(l1, l2) && pairwise_equal(r1, r2),
        (
            AstNode::If {
                cond: c1,
                then_branch: t1,
                else_branch: e1,
            },
            AstNode::If {
                cond: c2,
                then_branch: t2,
                else_branch: e2,
            },
        ) => {
            structurally_equal(c1, c2)
                && structurally_equal(t1, t2)
                && optional_equal(e1.as_deref(), e2.as_deref())
        }
        (
            AstNode::For {
                init: i1,
                cond: c1,
                post: p1,
                body: b1,
            },
            AstNode::For {
                init: i2,
                cond: c2,
                post: p2,
                body: b2,
            },
        ) => {
            optional_equal(i1.as_deref(), i2.as_deref())
                && optional_equal(c1.as_deref(), c2.as_deref())
                && optional_equal(p1.as_deref(), p2.as_deref())
                && structurally_equal(b1, b2)
        }
        (
            AstNode::Selector {
                base: b1,
                field: f1,
            },
            AstNode::Selector {
                base: b2,
                field: f2,
            },
        ) => f1 == f2 && structurally_equal(b1, b2),
        (AstNode::Star(i1), AstNode::Star(i2)) => structurally_equal(i1, i2),
        (
            AstNode::FunctionDecl { body: b1, .. },
            AstNode::FunctionDecl { body: b2, .. },
        ) => optional_equal(b1.as_deref(), b2.as_deref()),
        _ => false,
    }
}

fn pairwise_equal(a: &[AstNode], b: &[AstNode]) -> bool {
    a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| structurally_equal(x, y))
}

fn optional_equal(a: Option<&AstNode>, b: Option<&AstNode>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(x), Some(y)) => structurally_equal(x, y),
        _ => false,
    }
}
