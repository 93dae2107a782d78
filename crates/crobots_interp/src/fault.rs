use crobots_ast::Name;

/// A runtime fault. Fatal to the current run: callers should discard
/// the run state after seeing one, not resume it. Termination of a
/// fully reduced term is *not* a fault — see `ExprStep::Terminal`.
#[derive(Debug, Clone, PartialEq)]
pub enum Fault {
    UndefinedVariable(Name),
    /// The name is bound, but to a function where a variable was needed.
    NotAVariable(Name),
    /// The name is unbound or bound to a variable where a callable was
    /// needed.
    NotAFunction(Name),
    ArgumentMismatch {
        name: Name,
        expected: usize,
        actual: usize,
    },
    DivisionByZero,
    /// No zero-argument `main` to start from. Raised at the first
    /// call, not at load time.
    NoMainFunction,
}

impl std::fmt::Display for Fault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Fault::UndefinedVariable(name) => write!(f, "undefined variable `{name}`"),
            Fault::NotAVariable(name) => write!(f, "`{name}` is a function, not a variable"),
            Fault::NotAFunction(name) => write!(f, "`{name}` is not a function"),
            Fault::ArgumentMismatch {
                name,
                expected,
                actual,
            } => write!(
                f,
                "`{name}` expects {expected} argument(s), got {actual}"
            ),
            Fault::DivisionByZero => write!(f, "division by zero"),
            Fault::NoMainFunction => write!(f, "no zero-argument `main` function to run"),
        }
    }
}

impl std::error::Error for Fault {}
