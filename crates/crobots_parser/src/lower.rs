//! AST builder: folds the concrete parse tree into the compact AST.
//!
//! Precedence-level wrappers become flat `Chain` nodes, parentheses
//! disappear (the inner node takes the outer range), prefix `++`/`--`
//! lowers to a one-target compound assignment of `1`, and `do…while`
//! lowers to "body once, then `while`".

use crate::cst::{CstExpr, CstExprKind, CstProgram, CstStmt, CstStmtKind};
use crobots_ast::ast::{
    AssignTarget, ChainLink, Declarator, Expr, ExprKind, FnDecl, Program, Stmt, StmtKind,
};
use crobots_ast::{Name, Spanned};

pub fn lower_program(cst: CstProgram) -> Program {
    Program {
        items: cst.items.into_iter().map(lower_stmt).collect(),
        span: cst.span,
    }
}

pub fn lower_expr(cst: CstExpr) -> Expr {
    let span = cst.span;
    let kind = match cst.node {
        CstExprKind::Int(value) => ExprKind::Const(value),
        CstExprKind::Ident(name) => ExprKind::Ident(Name::from(name)),
        CstExprKind::Paren(inner) => {
            // The parenthesized node keeps the outer range so the
            // parens still highlight as part of it.
            let mut inner = lower_expr(*inner);
            inner.span = span;
            return inner;
        }
        CstExprKind::Unary { op, operand } => ExprKind::Unary {
            op,
            expr: Box::new(lower_expr(*operand)),
        },
        CstExprKind::Binary { lhs, pairs } => ExprKind::Chain {
            lhs: Box::new(lower_expr(*lhs)),
            links: pairs
                .into_iter()
                .map(|(op, rhs)| ChainLink {
                    op,
                    expr: lower_expr(rhs),
                })
                .collect(),
        },
        CstExprKind::Assign { targets, rhs } => ExprKind::Assign {
            targets: targets
                .into_iter()
                .map(|t| AssignTarget {
                    op: t.op,
                    name: lower_name(t.name),
                })
                .collect(),
            rhs: Box::new(lower_expr(*rhs)),
        },
        CstExprKind::Incr { decrement, name } => {
            let op = if decrement {
                crobots_ast::ast::BinOp::Sub
            } else {
                crobots_ast::ast::BinOp::Add
            };
            ExprKind::Assign {
                targets: vec![AssignTarget {
                    op: Some(op),
                    name: lower_name(name),
                }],
                rhs: Box::new(Spanned::new(ExprKind::Const(1), span)),
            }
        }
        CstExprKind::Call { callee, args } => ExprKind::Call {
            callee: lower_name(callee),
            args: args.into_iter().map(lower_expr).collect(),
        },
    };
    Spanned::new(kind, span)
}

pub fn lower_stmt(cst: CstStmt) -> Stmt {
    let span = cst.span;
    let kind = match cst.node {
        CstStmtKind::Empty => StmtKind::Empty,
        CstStmtKind::Expr(expr) => StmtKind::Expr(lower_expr(expr)),
        CstStmtKind::Block(body) => StmtKind::Block(body.into_iter().map(lower_stmt).collect()),
        CstStmtKind::If {
            cond,
            then_branch,
            else_branch,
        } => StmtKind::If {
            cond: lower_expr(cond),
            then_branch: Box::new(lower_stmt(*then_branch)),
            else_branch: else_branch.map(|stmt| Box::new(lower_stmt(*stmt))),
        },
        CstStmtKind::While { cond, body } => StmtKind::While {
            cond: lower_expr(cond),
            body: Box::new(lower_stmt(*body)),
        },
        CstStmtKind::DoWhile { body, cond } => {
            // Body once, then the ordinary loop.
            let body = lower_stmt(*body);
            let while_stmt = Spanned::new(
                StmtKind::While {
                    cond: lower_expr(cond),
                    body: Box::new(body.clone()),
                },
                span,
            );
            StmtKind::Block(vec![body, while_stmt])
        }
        CstStmtKind::Return(expr) => StmtKind::Return(expr.map(lower_expr)),
        CstStmtKind::VarDecl(decls) => StmtKind::VarDecl(
            decls
                .into_iter()
                .map(|d| Declarator {
                    name: lower_name(d.name),
                    init: d.init.map(lower_expr),
                })
                .collect(),
        ),
        CstStmtKind::FunctionDecl {
            doc,
            name,
            params,
            body,
        } => StmtKind::FunctionDecl(FnDecl {
            name: lower_name(name),
            params: params.into_iter().map(lower_name).collect(),
            body: body.into_iter().map(lower_stmt).collect(),
            doc,
        }),
    };
    Spanned::new(kind, span)
}

fn lower_name(name: Spanned<String>) -> Spanned<Name> {
    Spanned::new(Name::from(name.node), name.span)
}
