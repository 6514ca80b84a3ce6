//! Tokenizer (§4.3): emits a normalized lexical token sequence, in source
//! order, from a normalized AST.
//!
//! Operates on an already-[`normalize`](crate::normalize::normalize)d tree,
//! so identifiers are already either `IDENT` or a preserved primitive type
//! name, and literals are already class tokens. The tokenizer's job is just
//! to linearize the tree and spell out keywords/operators/punctuation.

use crate::model::{AstNode, TypeExpr};

/// Tokenize a normalized AST into a flat, source-ordered sequence of
/// opaque token strings. Comments and whitespace never appear in this
/// crate's [`AstNode`] and so are implicitly dropped.
pub fn tokenize(node: &AstNode) -> Vec<String> {
    let mut out = Vec::new();
    emit(node, &mut out);
    out
}

fn emit(node: &AstNode, out: &mut Vec<String>) {
    match node {
        AstNode::FunctionDecl {
            params,
            results,
            body,
            ..
        } => {
            out.push("func".into());
            out.push("(".into());
            for (i, param) in params.iter().enumerate() {
                if i > 0 {
                    out.push(",".into());
                }
                emit_type(&param.ty, out);
            }
            out.push(")".into());
            for result in results {
                emit_type(result, out);
            }
            if let Some(b) = body {
                emit(b, out);
            }
        }
        AstNode::Block(stmts) => {
            out.push("{".into());
            for stmt in stmts {
                emit(stmt, out);
                out.push(";".into());
            }
            out.push("}".into());
        }
        AstNode::Assign { lhs, rhs } => {
            emit_list(lhs, out);
            out.push("=".into());
            emit_list(rhs, out);
        }
        AstNode::ExprStmt(expr) => emit(expr, out),
        AstNode::Return(values) => {
            out.push("return".into());
            emit_list(values, out);
        }
        AstNode::If {
            cond,
            then_branch,
            else_branch,
        } => {
            out.push("if".into());
            emit(cond, out);
            emit(then_branch, out);
            if let Some(e) = else_branch {
                out.push("else".into());
                emit(e, out);
            }
        }
        AstNode::For {
            init,
            cond,
            post,
            body,
        } => {
            out.push("for".into());
            if let Some(n) = init {
                emit(n, out);
            }
            out.push(";".into());
            if let Some(n) = cond {
                emit(n, out);
            }
            out.push(";".into());
            if let Some(n) = post {
                emit(n, out);
            }
            emit(body, out);
        }
        AstNode::Binary { op, left, right } => {
            emit(left, out);
            out.push(op.clone());
            emit(right, out);
        }
        AstNode::Unary { op, expr } => {
            out.push(op.clone());
            emit(expr, out);
        }
        AstNode::Call { callee, args } => {
            emit(callee, out);
            out.push("(".into());
            for (i, arg) in args.iter().enumerate() {
                if i > 0 {
                    out.push(",".into());
                }
                emit(arg, out);
            }
            out.push(")".into());
        }
        AstNode::Identifier(name) => out.push(name.clone()),
        AstNode::BasicLiteral { value, .. } => out.push(value.clone()),
        AstNode::Selector { base, field } => {
            emit(base, out);
            out.push(".".into());
            out.push(field.clone());
        }
        AstNode::Star(inner) => {
            out.push("*".into());
            emit(inner, out);
        }
        AstNode::Opaque { kind } => out.push(kind.clone()),
    }
}

fn emit_list(nodes: &[AstNode], out: &mut Vec<String>) {
    for (i, node) in nodes.iter().enumerate() {
        if i > 0 {
            out.push(",".into());
        }
        emit(node, out);
    }
}

/// Emit a parameter/result type as tokens, mirroring
/// [`crate::signature::render`]'s type rendering so the token stream carries
/// the same signature information the structural hash does (§3: primitive
/// type names are "preserved verbatim as a distinguishing feature").
fn emit_type(ty: &TypeExpr, out: &mut Vec<String>) {
    match ty {
        TypeExpr::Ident(name) => out.push(name.clone()),
        TypeExpr::Pointer(inner) => {
            out.push("*".into());
            emit_type(inner, out);
        }
        TypeExpr::Selector { package, name } => {
            out.push(package.clone());
            out.push(".".into());
            out.push(name.clone());
        }
        TypeExpr::Other => out.push("unknown".into()),
    }
}

/// Space-join a token sequence, the input form the token-similarity
/// subscore (§4.5) runs Levenshtein over.
pub fn join(tokens: &[String]) -> String {
    tokens.join(" ")
}
