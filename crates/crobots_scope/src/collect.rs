//! First pass: register every top-level function in the root scope so
//! a call can resolve to a function declared later in the file.
//! Variables are deliberately left to the resolution walk — a use must
//! see the textually nearest *preceding* declaration, which a pre-pass
//! would break.

use crate::scope::{DefKind, Definition, ScopeId, ScopeTree};
use crobots_ast::ast::{Program, StmtKind};

pub fn collect_functions(program: &Program, tree: &mut ScopeTree) {
    for item in &program.items {
        if let StmtKind::FunctionDecl(decl) = &item.node {
            tree.define(
                ScopeId::ROOT,
                Definition {
                    kind: DefKind::Function,
                    name: decl.name.node.clone(),
                    span: decl.name.span,
                    owner: None,
                },
            );
        }
    }
}
