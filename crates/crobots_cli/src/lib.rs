pub mod highlighter;
pub mod repl;
pub mod session;
pub mod validator;
