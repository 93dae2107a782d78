pub mod ast;
pub mod diagnostic;
pub mod name;
pub mod span;

pub use diagnostic::{Diagnostic, Severity, SourceMap};
pub use name::Name;
pub use span::{Span, Spanned};
