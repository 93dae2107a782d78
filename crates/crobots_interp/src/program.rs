//! The program driver: executes the top-level declaration sequence,
//! then traces the entry-point call.

use crate::builtins::{MathApi, NullRobot, Primitives};
use crate::eval::Flow;
use crate::fault::Fault;
use crate::state::{Binding, RunState};
use crate::step::{ExprStep, Machine};
use crate::term::{Term, TermKind};
use crobots_ast::ast::Program;
use crobots_ast::{Name, Span, Spanned};

/// How a bounded run ended. Distinct from [`Fault`]: running out of gas
/// is the driver's budget, not the program's error.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Done(Option<i64>),
    OutOfGas,
}

/// One reduction's worth of progress from a [`Running`] handle.
#[derive(Debug, Clone, PartialEq)]
pub enum Tick {
    Running,
    Done(Option<i64>),
}

pub struct Interpreter<'p> {
    program: &'p Program,
    state: RunState,
    prims: Primitives,
    loaded: bool,
}

impl<'p> Interpreter<'p> {
    pub fn new(program: &'p Program, prims: Primitives) -> Self {
        Self {
            program,
            state: RunState::new(),
            prims,
            loaded: false,
        }
    }

    /// Driver against a zeroed robot; suits tests and plain programs.
    pub fn with_null_robot(program: &'p Program) -> Self {
        Self::new(program, Primitives::new(Box::new(NullRobot), MathApi::new()))
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    /// Execute the top-level items in order against the global frame:
    /// function declarations bind, variable declarations initialize.
    /// Idempotent across `run`/`stepper`.
    pub fn load_toplevel(&mut self) -> Result<(), Fault> {
        if self.loaded {
            return Ok(());
        }
        let mut machine = Machine::new(&mut self.state, &mut self.prims);
        for item in &self.program.items {
            if let Flow::Returned(_) = machine.eval_stmt(item)? {
                break;
            }
        }
        self.loaded = true;
        Ok(())
    }

    /// The `main()` call term, or the fault if no zero-argument `main`
    /// was declared at the top level.
    fn entry_call(&self) -> Result<Term, Fault> {
        let name = Name::from("main");
        match self.state.lookup(&name) {
            Some(Binding::Func(_)) => {}
            _ => return Err(Fault::NoMainFunction),
        }
        let func = self.state.function(&name)?;
        if !func.params.is_empty() {
            return Err(Fault::NoMainFunction);
        }
        let span = self
            .program
            .function("main")
            .map(|decl| decl.name.span)
            .unwrap_or_else(Span::dummy);
        Ok(Term {
            kind: TermKind::Call {
                callee: Spanned::new(name, span),
                args: Vec::new(),
            },
            span,
        })
    }

    /// Trace `main()` to termination, or stop after `gas` reductions.
    pub fn run(&mut self, gas: Option<u64>) -> Result<Outcome, Fault> {
        let mut running = self.stepper()?;
        let mut remaining = gas;
        loop {
            if let Some(left) = remaining.as_mut() {
                if *left == 0 {
                    return Ok(Outcome::OutOfGas);
                }
                *left -= 1;
            }
            match running.step()? {
                Tick::Running => {}
                Tick::Done(value) => return Ok(Outcome::Done(value)),
            }
        }
    }

    /// A handle over the `main()` trace, advancing one reduction per
    /// `step` and exposing the current term for display.
    pub fn stepper(&mut self) -> Result<Running<'_, 'p>, Fault> {
        self.load_toplevel()?;
        let term = self.entry_call()?;
        Ok(Running { interp: self, term })
    }
}

pub struct Running<'a, 'p> {
    interp: &'a mut Interpreter<'p>,
    term: Term,
}

impl Running<'_, '_> {
    pub fn current(&self) -> &Term {
        &self.term
    }

    /// The source span the trace currently points at.
    pub fn span(&self) -> Span {
        self.term.span
    }

    pub fn step(&mut self) -> Result<Tick, Fault> {
        if self.term.is_value() {
            return Ok(Tick::Done(self.term.returned()));
        }
        let mut machine = Machine::new(&mut self.interp.state, &mut self.interp.prims);
        match machine.step_expr(self.term.clone())? {
            ExprStep::Reduced(term) => {
                self.term = term;
                Ok(Tick::Running)
            }
            ExprStep::Terminal => Ok(Tick::Done(self.term.returned())),
        }
    }
}
