//! Execution engine: small-step term reduction with an equivalent
//! big-step evaluator, a per-run memory table and frame stack, the
//! injected primitive table, and the gas-bounded program driver.

pub mod builtins;
pub mod eval;
pub mod fault;
pub mod ops;
pub mod program;
pub mod state;
pub mod step;
pub mod term;

pub use builtins::{MathApi, NullRobot, PrimResult, Primitives, RobotApi, TRIG_SCALE};
pub use eval::Flow;
pub use fault::Fault;
pub use program::{Interpreter, Outcome, Running, Tick};
pub use state::{Binding, Frame, FuncId, Function, Location, MemoryTable, RunState};
pub use step::{ExprStep, Machine, StmtStep};
pub use term::{StmtTerm, StmtTermKind, Term, TermKind};
