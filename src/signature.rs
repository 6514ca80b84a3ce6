//! Signature rendering and comparison (§3/§4.7).
//!
//! The canonical signature string is `func(<param-types>) <result-types>`,
//! with multi-result wrapped in parentheses. Identifier-only types are kept
//! verbatim; pointer/selector types render as `*T` / `Q.T`; anything else
//! reduces to `unknown`.

use crate::model::{AstNode, TypeExpr};

/// Render the canonical signature string of a function declaration.
pub fn render(node: &AstNode) -> String {
    let AstNode::FunctionDecl { params, results, .. } = node else {
        return "func()".to_string();
    };

    let param_types: Vec<String> = params.iter().map(|p| render_type(&p.ty)).collect();
    let params_str = param_types.join(", ");

    let result_str = match results.len() {
        0 => String::new(),
        1 => render_type(&results[0]),
        _ => {
            let parts: Vec<String> = results.iter().map(render_type).collect();
            format!("({})", parts.join(", "))
        }
    };

    if result_str.is_empty() {
        format!("func({params_str})")
    } else {
        format!("func({params_str}) {result_str}")
    }
}

fn render_type(ty: &TypeExpr) -> String {
    match ty {
        TypeExpr::Ident(name) => name.clone(),
        TypeExpr::Pointer(inner) => format!("*{}", render_type(inner)),
        TypeExpr::Selector { package, name } => format!("{package}.{name}"),
        TypeExpr::Other => "unknown".to_string(),
    }
}

/// Compare two rendered signatures. Equal strings score 1.0; otherwise a
/// crude length-based similarity, with the same both/one-empty conventions
/// as the token-sequence subscore (§4.5).
pub fn score(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let la = a.chars().count() as f64;
    let lb = b.chars().count() as f64;
    (1.0 - (la - lb).abs() / la.max(lb)).clamp(0.0, 1.0)
}
