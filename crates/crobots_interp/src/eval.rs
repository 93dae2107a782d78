//! Big-step evaluation: direct recursive computation of a node's final
//! value, bypassing intermediate terms. Shares all semantics with the
//! small-step engine; convenient for tests and the REPL.

use crate::builtins::PrimResult;
use crate::fault::Fault;
use crate::ops::{apply_binop, apply_unop};
use crate::step::Machine;
use crobots_ast::ast::{Expr, ExprKind, Stmt, StmtKind};

/// How a statement finished.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    Normal,
    Returned(Option<i64>),
}

fn coerce(value: Option<i64>) -> i64 {
    value.unwrap_or(0)
}

impl Machine<'_> {
    /// Evaluate an expression to its final value; `None` is the
    /// no-value result of a void call.
    pub fn eval_expr(&mut self, expr: &Expr) -> Result<Option<i64>, Fault> {
        match &expr.node {
            ExprKind::Const(v) => Ok(Some(*v)),
            ExprKind::Ident(name) => Ok(Some(self.state.read_var(name)?)),
            ExprKind::Unary { op, expr } => {
                let value = coerce(self.eval_expr(expr)?);
                Ok(Some(apply_unop(*op, value)))
            }
            ExprKind::Chain { lhs, links } => {
                let mut acc = coerce(self.eval_expr(lhs)?);
                for link in links {
                    let rhs = coerce(self.eval_expr(&link.expr)?);
                    acc = apply_binop(link.op, acc, rhs)?;
                }
                Ok(Some(acc))
            }
            ExprKind::Assign { targets, rhs } => {
                // Rightmost target first, then each earlier target
                // receives the just-computed value.
                let mut value = coerce(self.eval_expr(rhs)?);
                for target in targets.iter().rev() {
                    value = match target.op {
                        None => value,
                        Some(op) => {
                            apply_binop(op, self.state.read_var(&target.name.node)?, value)?
                        }
                    };
                    self.state.write_var(&target.name.node, value)?;
                }
                Ok(Some(value))
            }
            ExprKind::Call { callee, args } => {
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(coerce(self.eval_expr(arg)?));
                }
                match self.prims.call(&callee.node, &values)? {
                    Some(PrimResult::Value(v)) => Ok(Some(v)),
                    Some(PrimResult::Void) => Ok(None),
                    None => {
                        let func = self.state.function(&callee.node)?;
                        if func.params.len() != values.len() {
                            return Err(Fault::ArgumentMismatch {
                                name: callee.node.clone(),
                                expected: func.params.len(),
                                actual: values.len(),
                            });
                        }
                        let params = func.params.clone();
                        let body = func.body.clone();
                        self.state.push_call_frame();
                        for (param, value) in params.into_iter().zip(values) {
                            self.state.define_var(param, value);
                        }
                        let mut result = None;
                        for stmt in &body {
                            match self.eval_stmt(stmt) {
                                Ok(Flow::Normal) => {}
                                Ok(Flow::Returned(value)) => {
                                    result = value;
                                    break;
                                }
                                Err(fault) => {
                                    return Err(fault);
                                }
                            }
                        }
                        self.state.pop_frame();
                        Ok(result)
                    }
                }
            }
        }
    }

    pub fn eval_stmt(&mut self, stmt: &Stmt) -> Result<Flow, Fault> {
        match &stmt.node {
            StmtKind::Empty => Ok(Flow::Normal),
            StmtKind::Expr(expr) => {
                self.eval_expr(expr)?;
                Ok(Flow::Normal)
            }
            StmtKind::Block(body) => {
                self.state.push_block_frame();
                for stmt in body {
                    match self.eval_stmt(stmt) {
                        Ok(Flow::Normal) => {}
                        Ok(flow @ Flow::Returned(_)) => {
                            self.state.pop_frame();
                            return Ok(flow);
                        }
                        Err(fault) => return Err(fault),
                    }
                }
                self.state.pop_frame();
                Ok(Flow::Normal)
            }
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                if coerce(self.eval_expr(cond)?) != 0 {
                    self.eval_stmt(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.eval_stmt(else_branch)
                } else {
                    Ok(Flow::Normal)
                }
            }
            StmtKind::While { cond, body } => {
                while coerce(self.eval_expr(cond)?) != 0 {
                    if let flow @ Flow::Returned(_) = self.eval_stmt(body)? {
                        return Ok(flow);
                    }
                }
                Ok(Flow::Normal)
            }
            StmtKind::Return(expr) => match expr {
                Some(expr) => Ok(Flow::Returned(self.eval_expr(expr)?)),
                None => Ok(Flow::Returned(None)),
            },
            StmtKind::VarDecl(decls) => {
                for decl in decls {
                    let value = match &decl.init {
                        Some(init) => coerce(self.eval_expr(init)?),
                        None => 0,
                    };
                    self.state.define_var(decl.name.node.clone(), value);
                }
                Ok(Flow::Normal)
            }
            StmtKind::FunctionDecl(decl) => {
                self.state.define_func(
                    decl.name.node.clone(),
                    decl.params.iter().map(|p| p.node.clone()).collect(),
                    decl.body.clone(),
                );
                Ok(Flow::Normal)
            }
        }
    }
}
