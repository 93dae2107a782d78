//! Concrete parse tree.
//!
//! The parser produces these nodes; `lower` folds them into the
//! compact AST. The tree keeps one `Binary` wrapper per precedence
//! level that actually consumed an operator (levels that matched
//! nothing elide their wrapper), so the shape still records how the
//! grammar grouped the expression.

use crobots_ast::ast::{BinOp, UnOp};
use crobots_ast::Spanned;

pub type CstExpr = Spanned<CstExprKind>;
pub type CstStmt = Spanned<CstStmtKind>;

#[derive(Debug, Clone, PartialEq)]
pub enum CstExprKind {
    Int(i64),
    Ident(String),
    Paren(Box<CstExpr>),
    Unary {
        op: UnOp,
        operand: Box<CstExpr>,
    },
    /// One precedence level's worth of left-associative pairs.
    Binary {
        lhs: Box<CstExpr>,
        pairs: Vec<(BinOp, CstExpr)>,
    },
    /// `a += b = rhs` — targets in source order.
    Assign {
        targets: Vec<CstAssignTarget>,
        rhs: Box<CstExpr>,
    },
    /// Prefix `++x` / `--x`; desugared to a compound assignment by the
    /// AST builder.
    Incr {
        decrement: bool,
        name: Spanned<String>,
    },
    Call {
        callee: Spanned<String>,
        args: Vec<CstExpr>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CstAssignTarget {
    /// `None` for plain `=`, the arithmetic op for `+=` etc.
    pub op: Option<BinOp>,
    pub name: Spanned<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CstStmtKind {
    Empty,
    Expr(CstExpr),
    Block(Vec<CstStmt>),
    If {
        cond: CstExpr,
        then_branch: Box<CstStmt>,
        else_branch: Option<Box<CstStmt>>,
    },
    While {
        cond: CstExpr,
        body: Box<CstStmt>,
    },
    DoWhile {
        body: Box<CstStmt>,
        cond: CstExpr,
    },
    Return(Option<CstExpr>),
    VarDecl(Vec<CstDeclarator>),
    FunctionDecl {
        doc: Option<String>,
        name: Spanned<String>,
        params: Vec<Spanned<String>>,
        body: Vec<CstStmt>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CstDeclarator {
    pub name: Spanned<String>,
    pub init: Option<CstExpr>,
}

/// A parsed compilation unit, before lowering.
#[derive(Debug, Clone, PartialEq)]
pub struct CstProgram {
    pub items: Vec<CstStmt>,
    pub span: crobots_ast::Span,
}
