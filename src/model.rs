//! The engine's own minimal AST and the function-record value object.
//!
//! AST parsing of the host language is an external collaborator (see the
//! design doc, §1/§6): this crate never parses source text. It only needs
//! an owned, recursive representation of a function declaration shaped like
//! the contract in §6 (function-decl, block-statement, a handful of
//! statement and expression kinds). Anything a caller's parser produces that
//! doesn't fit one of the named kinds is wrapped in [`AstNode::Opaque`] so
//! every comparator can tolerate it as an inert leaf.

use std::path::PathBuf;

use once_cell::sync::OnceCell;

/// A function parameter: a name and its declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub ty: TypeExpr,
}

/// A type reference, reduced to the few shapes the signature comparator
/// cares about (see §3: "Signature").
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    /// A bare identifier, e.g. `int`, `string`, `MyStruct`.
    Ident(String),
    /// `*T`
    Pointer(Box<TypeExpr>),
    /// `pkg.T`
    Selector { package: String, name: String },
    /// Anything else (generics, arrays, function types, ...): reduces to
    /// `unknown` in the rendered signature.
    Other,
}

/// The kind of a literal leaf, used only to pick the right class token
/// during normalization/tokenization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LitKind {
    Int,
    Float,
    String,
    Char,
    Imaginary,
}

/// The engine's language-agnostic AST node.
///
/// Node kinds, child order, operator spellings, and control-flow topology
/// are exactly what the normalizer preserves (§4.1); only identifier and
/// literal *leaves* are touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AstNode {
    FunctionDecl {
        name: String,
        params: Vec<Param>,
        results: Vec<TypeExpr>,
        body: Option<Box<AstNode>>,
    },
    Block(Vec<AstNode>),
    Assign {
        lhs: Vec<AstNode>,
        rhs: Vec<AstNode>,
    },
    ExprStmt(Box<AstNode>),
    Return(Vec<AstNode>),
    If {
        cond: Box<AstNode>,
        then_branch: Box<AstNode>,
        else_branch: Option<Box<AstNode>>,
    },
    For {
        init: Option<Box<AstNode>>,
        cond: Option<Box<AstNode>>,
        post: Option<Box<AstNode>>,
        body: Box<AstNode>,
    },
    Binary {
        op: String,
        left: Box<AstNode>,
        right: Box<AstNode>,
    },
    Unary {
        op: String,
        expr: Box<AstNode>,
    },
    Call {
        callee: Box<AstNode>,
        args: Vec<AstNode>,
    },
    Identifier(String),
    BasicLiteral {
        kind: LitKind,
        value: String,
    },
    Selector {
        base: Box<AstNode>,
        field: String,
    },
    Star(Box<AstNode>),
    /// An unrecognized node kind, tolerated rather than rejected. Treated
    /// as an opaque leaf by every comparator (§4.4 edge case: "unsupported
    /// node kinds are treated as leaves with zero children").
    Opaque { kind: String },
}

/// Predeclared primitive type names preserved verbatim by the normalizer
/// and tokenizer (§4.1/§4.3) instead of being collapsed to `IDENT`.
pub const PRIMITIVE_TYPE_NAMES: &[&str] = &[
    "bool",
    "string",
    "int",
    "int8",
    "int16",
    "int32",
    "int64",
    "uint",
    "uint8",
    "uint16",
    "uint32",
    "uint64",
    "uintptr",
    "byte",
    "rune",
    "float32",
    "float64",
    "complex64",
    "complex128",
    "error",
];

/// True if `name` names a recognized built-in primitive type.
pub fn is_primitive_type_name(name: &str) -> bool {
    PRIMITIVE_TYPE_NAMES.contains(&name)
}

/// Lazily-computed, write-once fields derived from a function's AST.
///
/// The scheduler's pre-normalization pass (§4.9) forces all three before
/// dispatch so that, during parallel scoring, workers only ever read these
/// cells; [`OnceCell`] enforces "write-once, read-many" without a mutex.
#[derive(Debug, Default)]
struct Memo {
    normalized: OnceCell<AstNode>,
    hash_hex: OnceCell<String>,
    signature: OnceCell<String>,
    node_count: OnceCell<usize>,
}

/// The unit of comparison: a single function declaration plus its source
/// position, owned exclusively by the caller and borrowed by the engine for
/// the duration of one detection run (§3: "Function record").
#[derive(Debug)]
pub struct FunctionRecord {
    pub name: String,
    pub file: PathBuf,
    pub start_line: usize,
    pub end_line: usize,
    root: AstNode,
    memo: Memo,
}

impl FunctionRecord {
    /// Construct a record. Panics if `end_line < start_line`, enforcing the
    /// invariant from §3 at construction time rather than silently
    /// producing a negative line count.
    pub fn new(name: impl Into<String>, file: impl Into<PathBuf>, start_line: usize, end_line: usize, root: AstNode) -> Self {
        assert!(
            end_line >= start_line,
            "end_line ({end_line}) must be >= start_line ({start_line})"
        );
        Self {
            name: name.into(),
            file: file.into(),
            start_line,
            end_line,
            root,
            memo: Memo::default(),
        }
    }

    /// `end_line - start_line + 1`.
    pub fn line_count(&self) -> usize {
        self.end_line - self.start_line + 1
    }

    /// The original, unmodified AST root.
    pub fn root(&self) -> &AstNode {
        &self.root
    }

    /// The normalized AST, computed once and memoized.
    pub fn normalized(&self) -> &AstNode {
        self.memo
            .normalized
            .get_or_init(|| crate::normalize::normalize(&self.root))
    }

    /// Force computation of the normalized AST, hash, signature, and node
    /// count. Called by the scheduler's pre-normalization pass so that
    /// later concurrent reads never race a first write.
    pub fn precompute(&self) {
        let _ = self.normalized();
        let _ = self.structural_hash();
        let _ = self.signature();
        let _ = self.node_count();
    }

    /// Hex-encoded structural hash of the normalized AST (§4.2).
    pub fn structural_hash(&self) -> &str {
        self.memo
            .hash_hex
            .get_or_init(|| crate::hash::hash_normalized(self.normalized()))
    }

    /// The canonical signature string (§3/§4.7).
    pub fn signature(&self) -> &str {
        self.memo
            .signature
            .get_or_init(|| crate::signature::render(&self.root))
    }

    /// Total node count of the normalized AST, used to scale the tree edit
    /// distance subscore (§4.8 step 6).
    pub fn node_count(&self) -> usize {
        *self.memo.node_count.get_or_init(|| count_nodes(self.normalized()))
    }

    /// The function body, if any (the `Block` child of `FunctionDecl`).
    pub fn body(&self) -> Option<&AstNode> {
        match &self.root {
            AstNode::FunctionDecl { body, .. } => body.as_deref(),
            _ => None,
        }
    }

    /// Statement count of the body, or 0 if there is no body.
    pub fn statement_count(&self) -> usize {
        match self.body() {
            Some(AstNode::Block(stmts)) => stmts.len(),
            Some(_) => 1,
            None => 0,
        }
    }
}

/// The statements of a function body: the elements of a `Block`, or a
/// single-element slice wrapping any other node (a body need not literally
/// be a `Block` to have "one statement" for comparison purposes).
pub fn statements_of(body: &AstNode) -> Vec<&AstNode> {
    match body {
        AstNode::Block(stmts) => stmts.iter().collect(),
        other => vec![other],
    }
}

pub(crate) fn count_nodes(node: &AstNode) -> usize {
    1 + children(node).iter().map(|child| count_nodes(child)).sum::<usize>()
}

/// Enumerate the direct children of a node in source order. Shared by the
/// normalizer, the tree edit distance routine, and the node counter so they
/// all agree on "shape".
pub fn children(node: &AstNode) -> Vec<&AstNode> {
    match node {
        AstNode::FunctionDecl { body, .. } => body.iter().map(|b| b.as_ref()).collect(),
        AstNode::Block(stmts) => stmts.iter().collect(),
        AstNode::Assign { lhs, rhs } => lhs.iter().chain(rhs.iter()).collect(),
        AstNode::ExprStmt(expr) => vec![expr.as_ref()],
        AstNode::Return(values) => values.iter().collect(),
        AstNode::If {
            cond,
            then_branch,
            else_branch,
        } => {
            let mut out = vec![cond.as_ref(), then_branch.as_ref()];
            if let Some(e) = else_branch {
                out.push(e.as_ref());
            }
            out
        }
        AstNode::For {
            init,
            cond,
            post,
            body,
        } => {
            let mut out = Vec::new();
            if let Some(i) = init {
                out.push(i.as_ref());
            }
            if let Some(c) = cond {
                out.push(c.as_ref());
            }
            if let Some(p) = post {
                out.push(p.as_ref());
            }
            out.push(body.as_ref());
            out
        }
        AstNode::Binary { left, right, .. } => vec![left.as_ref(), right.as_ref()],
        AstNode::Unary { expr, .. } => vec![expr.as_ref()],
        AstNode::Call { callee, args } => {
            let mut out = vec![callee.as_ref()];
            out.extend(args.iter());
            out
        }
        AstNode::Selector { base, .. } => vec![base.as_ref()],
        AstNode::Star(inner) => vec![inner.as_ref()],
        AstNode::Identifier(_) | AstNode::BasicLiteral { .. } | AstNode::Opaque { .. } => vec![],
    }
}

/// A pair of functions whose composite score met the configured threshold
/// (§3: "Match").
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub index_a: usize,
    pub index_b: usize,
    pub score: f64,
}
