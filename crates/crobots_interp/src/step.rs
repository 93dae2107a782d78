//! Small-step reduction.
//!
//! `step_expr` performs exactly one reduction, leftmost-innermost, and
//! returns either the rewritten term or the terminal signal for an
//! already-fully-reduced term. Faults propagate immediately as `Err`
//! and never reuse the terminal channel.

use crate::builtins::{PrimResult, Primitives};
use crate::fault::Fault;
use crate::ops::{apply_binop, apply_unop};
use crate::state::RunState;
use crate::term::{StmtTerm, StmtTermKind, Term, TermKind};

#[derive(Debug, Clone, PartialEq)]
pub enum ExprStep {
    Reduced(Term),
    /// The term was already a value; there is no redex. A control
    /// signal, not an error.
    Terminal,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StmtStep {
    /// Nothing left to do and no value produced.
    Completed,
    /// A `return` is propagating; enclosing blocks pop their frames as
    /// it passes through.
    Returned(Option<i64>),
    /// There is a next, generally smaller, statement to step.
    Progressed(StmtTerm),
}

/// One execution's mutable context: the run state plus the injected
/// primitive table.
pub struct Machine<'a> {
    pub state: &'a mut RunState,
    pub prims: &'a mut Primitives,
}

impl<'a> Machine<'a> {
    pub fn new(state: &'a mut RunState, prims: &'a mut Primitives) -> Self {
        Machine { state, prims }
    }

    /// Step a sub-term known not to be a value yet.
    fn reduce_sub(&mut self, term: Term) -> Result<Term, Fault> {
        match self.step_expr(term)? {
            ExprStep::Reduced(term) => Ok(term),
            ExprStep::Terminal => unreachable!("sub-term was already a value"),
        }
    }

    pub fn step_expr(&mut self, term: Term) -> Result<ExprStep, Fault> {
        let span = term.span;
        let kind = match term.kind {
            TermKind::Int(_) | TermKind::Unit => return Ok(ExprStep::Terminal),

            TermKind::Ident(name) => {
                let value = self.state.read_var(&name)?;
                TermKind::Int(value)
            }

            TermKind::Unary { op, expr } => match expr.coerced() {
                Some(value) => TermKind::Int(apply_unop(op, value)),
                None => TermKind::Unary {
                    op,
                    expr: Box::new(self.reduce_sub(*expr)?),
                },
            },

            TermKind::Chain { lhs, mut links } => {
                if !lhs.is_value() {
                    TermKind::Chain {
                        lhs: Box::new(self.reduce_sub(*lhs)?),
                        links,
                    }
                } else if links.is_empty() {
                    TermKind::Int(lhs.coerced().unwrap_or(0))
                } else if !links[0].1.is_value() {
                    let (op, rhs) = links.remove(0);
                    links.insert(0, (op, self.reduce_sub(rhs)?));
                    TermKind::Chain { lhs, links }
                } else {
                    // Both sides of the first pair are values: collapse
                    // it into a new left operand.
                    let (op, rhs) = links.remove(0);
                    let collapsed_span = lhs.span.merge(rhs.span);
                    let value = apply_binop(
                        op,
                        lhs.coerced().unwrap_or(0),
                        rhs.coerced().unwrap_or(0),
                    )?;
                    if links.is_empty() {
                        TermKind::Int(value)
                    } else {
                        TermKind::Chain {
                            lhs: Box::new(Term::int(value, collapsed_span)),
                            links,
                        }
                    }
                }
            }

            TermKind::Assign { mut targets, rhs } => {
                if !rhs.is_value() {
                    TermKind::Assign {
                        targets,
                        rhs: Box::new(self.reduce_sub(*rhs)?),
                    }
                } else if targets.is_empty() {
                    TermKind::Int(rhs.coerced().unwrap_or(0))
                } else {
                    // Rightmost target first; each earlier target then
                    // receives the just-computed value.
                    let target = targets.pop().expect("non-empty");
                    let value = rhs.coerced().unwrap_or(0);
                    let new_value = match target.op {
                        None => value,
                        Some(op) => {
                            apply_binop(op, self.state.read_var(&target.name.node)?, value)?
                        }
                    };
                    self.state.write_var(&target.name.node, new_value)?;
                    if targets.is_empty() {
                        TermKind::Int(new_value)
                    } else {
                        TermKind::Assign {
                            targets,
                            rhs: Box::new(Term::int(new_value, rhs.span)),
                        }
                    }
                }
            }

            TermKind::Call { callee, mut args } => {
                if let Some(i) = args.iter().position(|arg| !arg.is_value()) {
                    let arg = args.remove(i);
                    args.insert(i, self.reduce_sub(arg)?);
                    TermKind::Call { callee, args }
                } else {
                    let values: Vec<i64> =
                        args.iter().map(|arg| arg.coerced().unwrap_or(0)).collect();
                    match self.prims.call(&callee.node, &values)? {
                        Some(PrimResult::Value(v)) => TermKind::Int(v),
                        Some(PrimResult::Void) => TermKind::Unit,
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
                            TermKind::Frame {
                                body: body.iter().map(StmtTerm::from).collect(),
                            }
                        }
                    }
                }
            }

            TermKind::Frame { mut body } => {
                if body.is_empty() {
                    self.state.pop_frame();
                    TermKind::Unit
                } else {
                    match self.step_stmt(body.remove(0))? {
                        StmtStep::Completed => {
                            if body.is_empty() {
                                self.state.pop_frame();
                                TermKind::Unit
                            } else {
                                TermKind::Frame { body }
                            }
                        }
                        StmtStep::Returned(value) => {
                            self.state.pop_frame();
                            match value {
                                Some(v) => TermKind::Int(v),
                                None => TermKind::Unit,
                            }
                        }
                        StmtStep::Progressed(stmt) => {
                            body.insert(0, stmt);
                            TermKind::Frame { body }
                        }
                    }
                }
            }
        };
        Ok(ExprStep::Reduced(Term { kind, span }))
    }

    pub fn step_stmt(&mut self, stmt: StmtTerm) -> Result<StmtStep, Fault> {
        let span = stmt.span;
        let next = match stmt.kind {
            StmtTermKind::Empty => return Ok(StmtStep::Completed),

            StmtTermKind::Expr(term) => {
                if term.is_value() {
                    return Ok(StmtStep::Completed);
                }
                StmtTermKind::Expr(self.reduce_sub(term)?)
            }

            StmtTermKind::Block(body) => {
                self.state.push_block_frame();
                StmtTermKind::RunBlock(body.iter().map(StmtTerm::from).collect())
            }

            StmtTermKind::RunBlock(mut body) => {
                if body.is_empty() {
                    self.state.pop_frame();
                    return Ok(StmtStep::Completed);
                }
                match self.step_stmt(body.remove(0))? {
                    StmtStep::Completed => {
                        if body.is_empty() {
                            self.state.pop_frame();
                            return Ok(StmtStep::Completed);
                        }
                        StmtTermKind::RunBlock(body)
                    }
                    StmtStep::Returned(value) => {
                        self.state.pop_frame();
                        return Ok(StmtStep::Returned(value));
                    }
                    StmtStep::Progressed(next) => {
                        body.insert(0, next);
                        StmtTermKind::RunBlock(body)
                    }
                }
            }

            StmtTermKind::If {
                cond,
                then_branch,
                else_branch,
            } => match cond.coerced() {
                Some(value) => {
                    if value != 0 {
                        return Ok(StmtStep::Progressed(StmtTerm::from(&then_branch)));
                    }
                    match else_branch {
                        Some(else_branch) => {
                            return Ok(StmtStep::Progressed(StmtTerm::from(&else_branch)))
                        }
                        None => return Ok(StmtStep::Completed),
                    }
                }
                None => StmtTermKind::If {
                    cond: self.reduce_sub(cond)?,
                    then_branch,
                    else_branch,
                },
            },

            StmtTermKind::While { cond, body } => StmtTermKind::RunWhile {
                cond_term: Term::from(&cond),
                cond,
                body,
            },

            StmtTermKind::RunWhile {
                cond_term,
                cond,
                body,
            } => match cond_term.coerced() {
                Some(value) => {
                    if value == 0 {
                        return Ok(StmtStep::Completed);
                    }
                    // Body once, then the original loop again.
                    let first = Box::new(StmtTerm::from(&body));
                    let then = Box::new(StmtTerm {
                        span,
                        kind: StmtTermKind::While { cond, body },
                    });
                    StmtTermKind::Seq { first, then }
                }
                None => StmtTermKind::RunWhile {
                    cond_term: self.reduce_sub(cond_term)?,
                    cond,
                    body,
                },
            },

            StmtTermKind::Return(None) => return Ok(StmtStep::Returned(None)),
            StmtTermKind::Return(Some(term)) => {
                if term.is_value() {
                    return Ok(StmtStep::Returned(term.returned()));
                }
                StmtTermKind::Return(Some(self.reduce_sub(term)?))
            }

            StmtTermKind::VarDecl(mut pending) => {
                let (name, init) = pending.remove(0);
                match init {
                    None => {
                        self.state.define_var(name.node, 0);
                    }
                    Some(term) => match term.coerced() {
                        Some(value) => {
                            self.state.define_var(name.node, value);
                        }
                        None => {
                            let reduced = self.reduce_sub(term)?;
                            pending.insert(0, (name, Some(reduced)));
                            return Ok(StmtStep::Progressed(StmtTerm {
                                kind: StmtTermKind::VarDecl(pending),
                                span,
                            }));
                        }
                    },
                }
                if pending.is_empty() {
                    return Ok(StmtStep::Completed);
                }
                StmtTermKind::VarDecl(pending)
            }

            StmtTermKind::FunctionDecl(decl) => {
                self.state.define_func(
                    decl.name.node,
                    decl.params.into_iter().map(|p| p.node).collect(),
                    decl.body,
                );
                return Ok(StmtStep::Completed);
            }

            StmtTermKind::Seq { first, then } => match self.step_stmt(*first)? {
                StmtStep::Completed => return Ok(StmtStep::Progressed(*then)),
                StmtStep::Returned(value) => return Ok(StmtStep::Returned(value)),
                StmtStep::Progressed(next) => StmtTermKind::Seq {
                    first: Box::new(next),
                    then,
                },
            },
        };
        Ok(StmtStep::Progressed(StmtTerm { kind: next, span }))
    }
}
