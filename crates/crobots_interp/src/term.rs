//! Runtime terms.
//!
//! `step` rewrites these; because every intermediate shape is still a
//! term with a source span, a driver can pause after any reduction and
//! point at the span currently executing. Terms are built by cloning
//! out of the immutable AST.

use std::fmt;

use crobots_ast::ast::{
    AssignTarget, BinOp, Expr, ExprKind, FnDecl, Stmt, StmtKind, UnOp,
};
use crobots_ast::{Name, Span, Spanned};

// ── Expression terms ─────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    pub kind: TermKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TermKind {
    Int(i64),
    /// The distinguished "no value" result of a void primitive or a
    /// fall-through call.
    Unit,
    Ident(Name),
    Unary {
        op: UnOp,
        expr: Box<Term>,
    },
    Chain {
        lhs: Box<Term>,
        links: Vec<(BinOp, Term)>,
    },
    Assign {
        targets: Vec<AssignTarget>,
        rhs: Box<Term>,
    },
    Call {
        callee: Spanned<Name>,
        args: Vec<Term>,
    },
    /// A call body mid-execution. Stepping it to completion pops the
    /// environment frame pushed at call entry.
    Frame {
        body: Vec<StmtTerm>,
    },
}

impl Term {
    pub fn int(value: i64, span: Span) -> Self {
        Term {
            kind: TermKind::Int(value),
            span,
        }
    }

    pub fn unit(span: Span) -> Self {
        Term {
            kind: TermKind::Unit,
            span,
        }
    }

    /// Fully reduced: no redex left.
    pub fn is_value(&self) -> bool {
        matches!(self.kind, TermKind::Int(_) | TermKind::Unit)
    }

    /// The integer a value term contributes where an int is demanded;
    /// the no-value term counts as 0. `None` while a redex remains.
    pub fn coerced(&self) -> Option<i64> {
        match self.kind {
            TermKind::Int(v) => Some(v),
            TermKind::Unit => Some(0),
            _ => None,
        }
    }

    /// The value a `return` of this term carries; a `return` of the
    /// no-value term carries nothing.
    pub fn returned(&self) -> Option<i64> {
        match self.kind {
            TermKind::Int(v) => Some(v),
            _ => None,
        }
    }
}

impl From<&Expr> for Term {
    fn from(expr: &Expr) -> Self {
        let kind = match &expr.node {
            ExprKind::Const(v) => TermKind::Int(*v),
            ExprKind::Ident(name) => TermKind::Ident(name.clone()),
            ExprKind::Unary { op, expr } => TermKind::Unary {
                op: *op,
                expr: Box::new(Term::from(&**expr)),
            },
            ExprKind::Chain { lhs, links } => TermKind::Chain {
                lhs: Box::new(Term::from(&**lhs)),
                links: links
                    .iter()
                    .map(|link| (link.op, Term::from(&link.expr)))
                    .collect(),
            },
            ExprKind::Assign { targets, rhs } => TermKind::Assign {
                targets: targets.clone(),
                rhs: Box::new(Term::from(&**rhs)),
            },
            ExprKind::Call { callee, args } => TermKind::Call {
                callee: callee.clone(),
                args: args.iter().map(Term::from).collect(),
            },
        };
        Term {
            kind,
            span: expr.span,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TermKind::Int(v) => write!(f, "{}", v),
            TermKind::Unit => write!(f, "void"),
            TermKind::Ident(name) => write!(f, "{}", name),
            TermKind::Unary { op, expr } => write!(f, "{}{}", op.symbol(), expr),
            TermKind::Chain { lhs, links } => {
                write!(f, "{}", lhs)?;
                for (op, rhs) in links {
                    write!(f, " {} {}", op.symbol(), rhs)?;
                }
                Ok(())
            }
            TermKind::Assign { targets, rhs } => {
                for target in targets {
                    match target.op {
                        Some(op) => write!(f, "{} {}= ", target.name.node, op.symbol())?,
                        None => write!(f, "{} = ", target.name.node)?,
                    }
                }
                write!(f, "{}", rhs)
            }
            TermKind::Call { callee, args } => {
                write!(f, "{}(", callee.node)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
            TermKind::Frame { body } => match body.first() {
                Some(stmt) => write!(f, "<call: {}>", stmt),
                None => write!(f, "<call: done>"),
            },
        }
    }
}

// ── Statement terms ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct StmtTerm {
    pub kind: StmtTermKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StmtTermKind {
    Empty,
    Expr(Term),
    /// A block not yet entered; stepping it pushes the frame.
    Block(Vec<Stmt>),
    /// A block after frame entry; the first element is in flight.
    RunBlock(Vec<StmtTerm>),
    If {
        cond: Term,
        then_branch: Stmt,
        else_branch: Option<Stmt>,
    },
    /// A loop not yet entered; its first step starts evaluating the
    /// condition.
    While {
        cond: Expr,
        body: Stmt,
    },
    /// A loop whose condition is being reduced. A true condition
    /// rewrites to "body, then the original loop".
    RunWhile {
        cond_term: Term,
        cond: Expr,
        body: Stmt,
    },
    Return(Option<Term>),
    /// Pending declarators, processed front to back.
    VarDecl(Vec<(Spanned<Name>, Option<Term>)>),
    FunctionDecl(FnDecl),
    /// Two statements in sequence, no frame of their own.
    Seq {
        first: Box<StmtTerm>,
        then: Box<StmtTerm>,
    },
}

impl From<&Stmt> for StmtTerm {
    fn from(stmt: &Stmt) -> Self {
        let kind = match &stmt.node {
            StmtKind::Empty => StmtTermKind::Empty,
            StmtKind::Expr(expr) => StmtTermKind::Expr(Term::from(expr)),
            StmtKind::Block(body) => StmtTermKind::Block(body.clone()),
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            } => StmtTermKind::If {
                cond: Term::from(cond),
                then_branch: (**then_branch).clone(),
                else_branch: else_branch.as_ref().map(|stmt| (**stmt).clone()),
            },
            StmtKind::While { cond, body } => StmtTermKind::While {
                cond: cond.clone(),
                body: (**body).clone(),
            },
            StmtKind::Return(expr) => StmtTermKind::Return(expr.as_ref().map(Term::from)),
            StmtKind::VarDecl(decls) => StmtTermKind::VarDecl(
                decls
                    .iter()
                    .map(|d| (d.name.clone(), d.init.as_ref().map(Term::from)))
                    .collect(),
            ),
            StmtKind::FunctionDecl(decl) => StmtTermKind::FunctionDecl(decl.clone()),
        };
        StmtTerm {
            kind,
            span: stmt.span,
        }
    }
}

impl fmt::Display for StmtTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            StmtTermKind::Empty => write!(f, ";"),
            StmtTermKind::Expr(term) => write!(f, "{};", term),
            StmtTermKind::Block(body) => write!(f, "{{ {} statement(s) }}", body.len()),
            StmtTermKind::RunBlock(body) => match body.first() {
                Some(stmt) => write!(f, "{{ {} … }}", stmt),
                None => write!(f, "{{ }}"),
            },
            StmtTermKind::If { cond, .. } => write!(f, "if ({}) …", cond),
            StmtTermKind::While { cond, .. } => write!(f, "while ({}) …", cond),
            StmtTermKind::RunWhile { cond_term, .. } => write!(f, "while ({}) …", cond_term),
            StmtTermKind::Return(None) => write!(f, "return;"),
            StmtTermKind::Return(Some(term)) => write!(f, "return {};", term),
            StmtTermKind::VarDecl(pending) => {
                write!(f, "int ")?;
                for (i, (name, init)) in pending.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", name.node)?;
                    if let Some(init) = init {
                        write!(f, " = {}", init)?;
                    }
                }
                write!(f, ";")
            }
            StmtTermKind::FunctionDecl(decl) => write!(f, "{}(…) {{ … }}", decl.name.node),
            StmtTermKind::Seq { first, .. } => write!(f, "{}", first),
        }
    }
}
