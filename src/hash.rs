//! Hasher (§4.2): a stable content hash of a normalized AST for the
//! exact-duplicate short-circuit.
//!
//! Equal hashes mean the engine treats the pair as structurally identical
//! (score 1.0); unequal hashes mean no conclusion either way — the full
//! comparison still has to run.

use blake3::Hasher;

use crate::model::AstNode;
use crate::signature;

/// Hex-encoded, 256-bit structural hash of a normalized AST's canonical
/// serialization.
pub fn hash_normalized(node: &AstNode) -> String {
    let mut hasher = Hasher::new();
    serialize_into(node, &mut hasher);
    hex::encode(hasher.finalize().as_bytes())
}

/// Write a canonical, tag-prefixed serialization of `node` into `hasher`.
/// Only information the normalizer keeps (node kind, operator spellings,
/// child order, class tokens) is fed into the digest. The signature is fed
/// in alongside the body so that two bodies which are otherwise identical
/// but differ in parameter/result types don't collapse to the same hash —
/// primitive type names surviving normalization (§3) have to actually reach
/// the digest to distinguish anything.
fn serialize_into(node: &AstNode, hasher: &mut Hasher) {
    match node {
        AstNode::FunctionDecl { body, .. } => {
            hasher.update(b"FunctionDecl(");
            hasher.update(signature::render(node).as_bytes());
            hasher.update(b")");
            match body {
                Some(b) => serialize_into(b, hasher),
                None => {
                    hasher.update(b"<no-body>");
                }
            }
        }
        AstNode::Block(stmts) => {
            hasher.update(b"Block(");
            hasher.update(stmts.len().to_le_bytes().as_slice());
            for stmt in stmts {
                serialize_into(stmt, hasher);
            }
            hasher.update(b")");
        }
        AstNode::Assign { lhs, rhs } => {
            hasher.update(b"Assign(");
            for n in lhs {
                serialize_into(n, hasher);
            }
            hasher.update(b"=");
            for n in rhs {
                serialize_into(n, hasher);
            }
            hasher.update(b")");
        }
        AstNode::ExprStmt(expr) => {
            hasher.update(b"ExprStmt(");
            serialize_into(expr, hasher);
            hasher.update(b")");
        }
        AstNode::Return(values) => {
            hasher.update(b"Return(");
            for v in values {
                serialize_into(v, hasher);
            }
            hasher.update(b")");
        }
        AstNode::If {
            cond,
            then_branch,
            else_branch,
        } => {
            hasher.update(b"If(");
            serialize_into(cond, hasher);
            hasher.update(b"?");
            serialize_into(then_branch, hasher);
            if let Some(e) = else_branch {
                hasher.update(b":");
                serialize_into(e, hasher);
            }
            hasher.update(b")");
        }
        AstNode::For {
            init,
            cond,
            post,
            body,
        } => {
            hasher.update(b"For(");
            for part in [init, cond, post] {
                if let Some(n) = part {
                    serialize_into(n, hasher);
                }
                hasher.update(b";");
            }
            serialize_into(body, hasher);
            hasher.update(b")");
        }
        AstNode::Binary { op, left, right } => {
            hasher.update(b"Binary(");
            hasher.update(op.as_bytes());
            serialize_into(left, hasher);
            serialize_into(right, hasher);
            hasher.update(b")");
        }
        AstNode::Unary { op, expr } => {
            hasher.update(b"Unary(");
            hasher.update(op.as_bytes());
            serialize_into(expr, hasher);
            hasher.update(b")");
        }
        AstNode::Call { callee, args } => {
            hasher.update(b"Call(");
            serialize_into(callee, hasher);
            for arg in args {
                serialize_into(arg, hasher);
            }
            hasher.update(b")");
        }
        AstNode::Identifier(name) => {
            hasher.update(b"Ident(");
            hasher.update(name.as_bytes());
            hasher.update(b")");
        }
        AstNode::BasicLiteral { value, .. } => {
            hasher.update(b"Lit(");
            hasher.update(value.as_bytes());
            hasher.update(b")");
        }
        AstNode::Selector { base, field } => {
            hasher.update(b"Selector(");
            serialize_into(base, hasher);
            hasher.update(b".");
            hasher.update(field.as_bytes());
            hasher.update(b")");
        }
        AstNode::Star(inner) => {
            hasher.update(b"Star(");
            serialize_into(inner, hasher);
            hasher.update(b")");
        }
        AstNode::Opaque { kind } => {
            hasher.update(b"Opaque(");
            hasher.update(kind.as_bytes());
            hasher.update(b")");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LitKind;
    use crate::normalize::normalize;

    #[test]
    fn identical_trees_hash_identically() {
        let a = AstNode::Identifier("x".into());
        let b = AstNode::Identifier("x".into());
        assert_eq!(hash_normalized(&a), hash_normalized(&b));
    }

    #[test]
    fn different_operators_hash_differently() {
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
        assert_ne!(
            hash_normalized(&normalize(&plus)),
            hash_normalized(&normalize(&times))
        );
    }

    #[test]
    fn renamed_locals_hash_identically_after_normalization() {
        let f = |name: &str| AstNode::Return(vec![AstNode::Identifier(name.into())]);
        assert_eq!(
            hash_normalized(&normalize(&f("a"))),
            hash_normalized(&normalize(&f("x")))
        );
    }

    #[test]
    fn same_body_different_signature_hashes_differently() {
        use crate::model::{Param, TypeExpr};

        let body = || {
            Some(Box::new(AstNode::Block(vec![AstNode::Return(vec![
                AstNode::Identifier("x".into()),
            ])])))
        };
        let int_fn = AstNode::FunctionDecl {
            name: "f".into(),
            params: vec![Param {
                name: "x".into(),
                ty: TypeExpr::Ident("int".into()),
            }],
            results: vec![TypeExpr::Ident("int".into())],
            body: body(),
        };
        let string_fn = AstNode::FunctionDecl {
            name: "f".into(),
            params: vec![
                Param {
                    name: "x".into(),
                    ty: TypeExpr::Ident("string".into()),
                },
                Param {
                    name: "y".into(),
                    ty: TypeExpr::Ident("string".into()),
                },
            ],
            results: vec![TypeExpr::Ident("error".into())],
            body: body(),
        };
        assert_ne!(
            hash_normalized(&normalize(&int_fn)),
            hash_normalized(&normalize(&string_fn))
        );
    }

    #[test]
    fn produces_64_hex_chars_for_256_bits() {
        let digest = hash_normalized(&AstNode::BasicLiteral {
            kind: LitKind::Int,
            value: "NUMBER".into(),
        });
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
