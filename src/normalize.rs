//! AST Normalizer (§4.1).
//!
//! Produces a canonical form of a function body in which every
//! identifier-position node is reduced to the class token `IDENT`, numeric
//! literals to `NUMBER`, and string literals to `STRING`. Built-in
//! primitive type names (e.g. `int`, `string`, `bool`) are preserved
//! verbatim because they distinguish otherwise-identical bodies. Node
//! kinds, child order, operator spellings, and control-flow topology are
//! preserved exactly.
//!
//! This crate's [`AstNode`] enforces required children at the type level
//! (a `Binary` cannot exist without both operands, an `If` cannot exist
//! without a condition and a then-branch), so there is no runtime
//! representation of "missing required child of a recognized node" for an
//! already-constructed tree. Normalization is therefore total: it never
//! needs to raise `MalformedAST` internally. The error variant stays in the
//! public taxonomy (§7) for a host that validates its own parser's output
//! before building a [`FunctionRecord`].

use crate::model::{is_primitive_type_name, AstNode, LitKind};

pub const IDENT: &str = "IDENT";
pub const NUMBER: &str = "NUMBER";
pub const STRING: &str = "STRING";
pub const CHAR: &str = "CHAR";
pub const IMAG: &str = "IMAG";

/// Normalize a function body (or any subtree) into its canonical form.
///
/// Deterministic and idempotent: `normalize(normalize(t)) == normalize(t)`.
pub fn normalize(node: &AstNode) -> AstNode {
    match node {
        AstNode::FunctionDecl {
            name,
            params,
            results,
            body,
        } => AstNode::FunctionDecl {
            name: name.clone(),
            params: params.clone(),
            results: results.clone(),
            body: body.as_deref().map(|b| Box::new(normalize(b))),
        },
        AstNode::Block(stmts) => AstNode::Block(stmts.iter().map(normalize).collect()),
        AstNode::Assign { lhs, rhs } => AstNode::Assign {
            lhs: lhs.iter().map(normalize).collect(),
            rhs: rhs.iter().map(normalize).collect(),
        },
        AstNode::ExprStmt(expr) => AstNode::ExprStmt(Box::new(normalize(expr))),
        AstNode::Return(values) => AstNode::Return(values.iter().map(normalize).collect()),
        AstNode::If {
            cond,
            then_branch,
            else_branch,
        } => AstNode::If {
            cond: Box::new(normalize(cond)),
            then_branch: Box::new(normalize(then_branch)),
            else_branch: else_branch.as_deref().map(|e| Box::new(normalize(e))),
        },
        AstNode::For {
            init,
            cond,
            post,
            body,
        } => AstNode::For {
            init: init.as_deref().map(|n| Box::new(normalize(n))),
            cond: cond.as_deref().map(|n| Box::new(normalize(n))),
            post: post.as_deref().map(|n| Box::new(normalize(n))),
            body: Box::new(normalize(body)),
        },
        AstNode::Binary { op, left, right } => AstNode::Binary {
            op: op.clone(),
            left: Box::new(normalize(left)),
            right: Box::new(normalize(right)),
        },
        AstNode::Unary { op, expr } => AstNode::Unary {
            op: op.clone(),
            expr: Box::new(normalize(expr)),
        },
        AstNode::Call { callee, args } => AstNode::Call {
            callee: Box::new(normalize(callee)),
            args: args.iter().map(normalize).collect(),
        },
        AstNode::Identifier(name) => {
            if is_primitive_type_name(name) {
                AstNode::Identifier(name.clone())
            } else {
                AstNode::Identifier(IDENT.to_string())
            }
        }
        AstNode::BasicLiteral { kind, .. } => AstNode::BasicLiteral {
            kind: *kind,
            value: class_token_for(*kind).to_string(),
        },
        AstNode::Selector { base, field } => AstNode::Selector {
            base: Box::new(normalize(base)),
            field: field.clone(),
        },
        AstNode::Star(inner) => AstNode::Star(Box::new(normalize(inner))),
        // Unsupported kinds are passed through unchanged (§4.1).
        AstNode::Opaque { kind } => AstNode::Opaque { kind: kind.clone() },
    }
}

fn class_token_for(kind: LitKind) -> &'static str {
    match kind {
        LitKind::Int | LitKind::Float => NUMBER,
        LitKind::String => STRING,
        LitKind::Char => CHAR,
        LitKind::Imaginary => IMAG,
    }
}
