pub mod collect;
pub mod resolve;
pub mod scope;

pub use resolve::{resolve, ReferenceSet, Resolution};
pub use scope::{DefKind, Definition, ScopeId, ScopeTree};
