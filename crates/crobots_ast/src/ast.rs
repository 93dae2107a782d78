use std::fmt;

use crate::name::Name;
use crate::{Span, Spanned};

// ── Operators ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    /// Arithmetic negation, `-x`.
    Neg,
    /// Bitwise complement, spelled `!x` in the surface syntax.
    Not,
}

impl UnOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnOp::Neg => "-",
            UnOp::Not => "!",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    And,
    Or,
    Shl,
    Shr,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Rem => "%",
            BinOp::Eq => "==",
            BinOp::NotEq => "!=",
            BinOp::Lt => "<",
            BinOp::Gt => ">",
            BinOp::LtEq => "<=",
            BinOp::GtEq => ">=",
            BinOp::And => "&&",
            BinOp::Or => "||",
            BinOp::Shl => "<<",
            BinOp::Shr => ">>",
        }
    }
}

// ── Expressions ──────────────────────────────────────────────────

pub type Expr = Spanned<ExprKind>;

/// One `(operator, operand)` pair of a left-associative binary chain.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainLink {
    pub op: BinOp,
    pub expr: Expr,
}

/// One target of an assignment chain, in the order it was written.
/// `op` is the compound operator (`+=` carries `Add`); plain `=` is `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignTarget {
    pub op: Option<BinOp>,
    pub name: Spanned<Name>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Const(i64),
    Ident(Name),
    Unary {
        op: UnOp,
        expr: Box<Expr>,
    },
    /// A flat left-associative operator chain: `lhs op1 e1 op2 e2 …`.
    /// The links are ordered left-to-right and never re-associated.
    Chain {
        lhs: Box<Expr>,
        links: Vec<ChainLink>,
    },
    /// A chained assignment: the targets are stored in source order;
    /// evaluation processes them right-to-left (see the interpreter).
    Assign {
        targets: Vec<AssignTarget>,
        rhs: Box<Expr>,
    },
    Call {
        callee: Spanned<Name>,
        args: Vec<Expr>,
    },
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.node)
    }
}

impl fmt::Display for ExprKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExprKind::Const(v) => write!(f, "{}", v),
            ExprKind::Ident(name) => write!(f, "{}", name),
            ExprKind::Unary { op, expr } => write!(f, "{}{}", op.symbol(), expr),
            ExprKind::Chain { lhs, links } => {
                write!(f, "{}", lhs)?;
                for link in links {
                    write!(f, " {} {}", link.op.symbol(), link.expr)?;
                }
                Ok(())
            }
            ExprKind::Assign { targets, rhs } => {
                for target in targets {
                    let op = match target.op {
                        Some(op) => format!("{}=", op.symbol()),
                        None => "=".to_string(),
                    };
                    write!(f, "{} {} ", target.name.node, op)?;
                }
                write!(f, "{}", rhs)
            }
            ExprKind::Call { callee, args } => {
                write!(f, "{}(", callee.node)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
        }
    }
}

// ── Statements ───────────────────────────────────────────────────

pub type Stmt = Spanned<StmtKind>;

/// One `name` or `name = init` of an `int` declaration statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Declarator {
    pub name: Spanned<Name>,
    pub init: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FnDecl {
    pub name: Spanned<Name>,
    pub params: Vec<Spanned<Name>>,
    pub body: Vec<Stmt>,
    /// Inner text of a `/** … */` comment immediately preceding the
    /// declaration, if any.
    pub doc: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    Empty,
    Expr(Expr),
    Block(Vec<Stmt>),
    If {
        cond: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    While {
        cond: Expr,
        body: Box<Stmt>,
    },
    Return(Option<Expr>),
    VarDecl(Vec<Declarator>),
    FunctionDecl(FnDecl),
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.node)
    }
}

impl fmt::Display for StmtKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StmtKind::Empty => write!(f, ";"),
            StmtKind::Expr(expr) => write!(f, "{};", expr),
            StmtKind::Block(body) => {
                writeln!(f, "{{")?;
                for stmt in body {
                    writeln!(f, "  {}", stmt)?;
                }
                write!(f, "}}")
            }
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                write!(f, "if ({}) {}", cond, then_branch)?;
                if let Some(else_branch) = else_branch {
                    write!(f, " else {}", else_branch)?;
                }
                Ok(())
            }
            StmtKind::While { cond, body } => write!(f, "while ({}) {}", cond, body),
            StmtKind::Return(expr) => match expr {
                Some(expr) => write!(f, "return {};", expr),
                None => write!(f, "return;"),
            },
            StmtKind::VarDecl(decls) => {
                write!(f, "int ")?;
                for (i, decl) in decls.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", decl.name.node)?;
                    if let Some(init) = &decl.init {
                        write!(f, " = {}", init)?;
                    }
                }
                write!(f, ";")
            }
            StmtKind::FunctionDecl(decl) => {
                write!(f, "{}(", decl.name.node)?;
                for (i, param) in decl.params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", param.node)?;
                }
                writeln!(f, ") {{")?;
                for stmt in &decl.body {
                    writeln!(f, "  {}", stmt)?;
                }
                write!(f, "}}")
            }
        }
    }
}

// ── Program ──────────────────────────────────────────────────────

/// A program is a sequence of top-level declarations, one of which is
/// a zero-argument function named `main` serving as the entry point.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub items: Vec<Stmt>,
    pub span: Span,
}

impl Program {
    /// Find a top-level function declaration by name.
    pub fn function(&self, name: &str) -> Option<&FnDecl> {
        self.items.iter().find_map(|item| match &item.node {
            StmtKind::FunctionDecl(decl) if decl.name.node == name => Some(decl),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sp<T>(node: T) -> Spanned<T> {
        Spanned::new(node, Span::dummy())
    }

    #[test]
    fn chain_displays_left_to_right() {
        let expr = ExprKind::Chain {
            lhs: Box::new(sp(ExprKind::Const(1))),
            links: vec![
                ChainLink {
                    op: BinOp::Add,
                    expr: sp(ExprKind::Const(2)),
                },
                ChainLink {
                    op: BinOp::Mul,
                    expr: sp(ExprKind::Ident(Name::from("x"))),
                },
            ],
        };
        assert_eq!(expr.to_string(), "1 + 2 * x");
    }

    #[test]
    fn assign_displays_targets_in_source_order() {
        let expr = ExprKind::Assign {
            targets: vec![
                AssignTarget {
                    op: Some(BinOp::Add),
                    name: sp(Name::from("o")),
                },
                AssignTarget {
                    op: None,
                    name: sp(Name::from("q")),
                },
            ],
            rhs: Box::new(sp(ExprKind::Const(2))),
        };
        assert_eq!(expr.to_string(), "o += q = 2");
    }
}
