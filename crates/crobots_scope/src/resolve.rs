//! Resolution walk and the read queries built on its result.
//!
//! Functions are pre-collected ([`crate::collect`]), then a single
//! walk defines variables in textual order and resolves every name
//! occurrence against the scope chain as it goes — so a use sees the
//! nearest preceding variable declaration, while calls may refer
//! forward to functions declared later in the file.

use std::collections::BTreeMap;

use crate::collect::collect_functions;
use crate::scope::{DefKind, Definition, ScopeId, ScopeTree};
use crobots_ast::ast::{Expr, ExprKind, Program, Stmt, StmtKind};
use crobots_ast::{Diagnostic, Name, Span};

/// Result of one resolution pass: the scope tree, the occurrence
/// indexes, and any name/shape errors. Purely a static index — it does
/// not participate in execution.
#[derive(Debug)]
pub struct Resolution {
    pub tree: ScopeTree,
    /// Definition occurrence → its own span.
    pub defs: BTreeMap<Span, Span>,
    /// Use occurrence → span of the definition it resolves to.
    pub refs: BTreeMap<Span, Span>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Everything that resolves to one definition, sorted by position.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceSet {
    pub definition: Span,
    pub references: Vec<Span>,
}

pub fn resolve(program: &Program) -> Resolution {
    let mut resolver = Resolver {
        tree: ScopeTree::new(program.span),
        defs: BTreeMap::new(),
        refs: BTreeMap::new(),
        diagnostics: Vec::new(),
    };
    collect_functions(program, &mut resolver.tree);
    for item in &program.items {
        resolver.resolve_stmt(item, ScopeId::ROOT);
    }
    Resolution {
        tree: resolver.tree,
        defs: resolver.defs,
        refs: resolver.refs,
        diagnostics: resolver.diagnostics,
    }
}

impl Resolution {
    /// The innermost scope containing `span`.
    pub fn query_range(&self, span: Span) -> ScopeId {
        self.tree.innermost_at(span)
    }

    /// Group every occurrence that resolves to the same definition as
    /// the occurrence at `span`. `None` if `span` is not a known name
    /// occurrence.
    pub fn query_references(&self, span: Span) -> Option<ReferenceSet> {
        let definition = self
            .defs
            .get(&span)
            .or_else(|| self.refs.get(&span))
            .copied()?;
        let mut references: Vec<Span> = self
            .defs
            .iter()
            .chain(self.refs.iter())
            .filter(|(_, def)| **def == definition)
            .map(|(occurrence, _)| *occurrence)
            .collect();
        references.sort();
        Some(ReferenceSet {
            definition,
            references,
        })
    }

    /// Names visible at a point, nearest declaration winning.
    pub fn query_completions(&self, span: Span) -> Vec<&Definition> {
        self.tree.visible_at(span)
    }
}

struct Resolver {
    tree: ScopeTree,
    defs: BTreeMap<Span, Span>,
    refs: BTreeMap<Span, Span>,
    diagnostics: Vec<Diagnostic>,
}

impl Resolver {
    fn resolve_stmt(&mut self, stmt: &Stmt, scope: ScopeId) {
        match &stmt.node {
            StmtKind::Empty => {}
            StmtKind::Expr(expr) => self.resolve_expr(expr, scope),
            StmtKind::Block(body) => {
                let inner = self.tree.push_scope(scope, stmt.span, None);
                for stmt in body {
                    self.resolve_stmt(stmt, inner);
                }
            }
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                self.resolve_expr(cond, scope);
                self.resolve_stmt(then_branch, scope);
                if let Some(else_branch) = else_branch {
                    self.resolve_stmt(else_branch, scope);
                }
            }
            StmtKind::While { cond, body } => {
                self.resolve_expr(cond, scope);
                self.resolve_stmt(body, scope);
            }
            StmtKind::Return(expr) => {
                if let Some(expr) = expr {
                    self.resolve_expr(expr, scope);
                }
            }
            StmtKind::VarDecl(decls) => {
                let owner = self.tree.scope(scope).label.clone();
                for decl in decls {
                    // The initializer sees only earlier declarations.
                    if let Some(init) = &decl.init {
                        self.resolve_expr(init, scope);
                    }
                    self.tree.define(
                        scope,
                        Definition {
                            kind: DefKind::Variable,
                            name: decl.name.node.clone(),
                            span: decl.name.span,
                            owner: owner.clone(),
                        },
                    );
                    self.defs.insert(decl.name.span, decl.name.span);
                }
            }
            StmtKind::FunctionDecl(decl) => {
                if scope != ScopeId::ROOT {
                    self.tree.define(
                        scope,
                        Definition {
                            kind: DefKind::Function,
                            name: decl.name.node.clone(),
                            span: decl.name.span,
                            owner: self.tree.scope(scope).label.clone(),
                        },
                    );
                }
                self.defs.insert(decl.name.span, decl.name.span);

                let fn_scope =
                    self.tree
                        .push_scope(scope, stmt.span, Some(decl.name.node.clone()));
                for param in &decl.params {
                    self.tree.define(
                        fn_scope,
                        Definition {
                            kind: DefKind::Variable,
                            name: param.node.clone(),
                            span: param.span,
                            owner: Some(decl.name.node.clone()),
                        },
                    );
                    self.defs.insert(param.span, param.span);
                }
                for stmt in &decl.body {
                    self.resolve_stmt(stmt, fn_scope);
                }
            }
        }
    }

    fn resolve_expr(&mut self, expr: &Expr, scope: ScopeId) {
        match &expr.node {
            ExprKind::Const(_) => {}
            ExprKind::Ident(name) => self.resolve_var(name, expr.span, scope),
            ExprKind::Unary { expr, .. } => self.resolve_expr(expr, scope),
            ExprKind::Chain { lhs, links } => {
                self.resolve_expr(lhs, scope);
                for link in links {
                    self.resolve_expr(&link.expr, scope);
                }
            }
            ExprKind::Assign { targets, rhs } => {
                for target in targets {
                    self.resolve_var(&target.name.node, target.name.span, scope);
                }
                self.resolve_expr(rhs, scope);
            }
            ExprKind::Call { callee, args } => {
                match self.tree.lookup(scope, &callee.node) {
                    Some(def) if def.kind == DefKind::Function => {
                        let def_span = def.span;
                        self.refs.insert(callee.span, def_span);
                    }
                    Some(def) => {
                        let def_span = def.span;
                        self.refs.insert(callee.span, def_span);
                        self.diagnostics.push(Diagnostic::error(
                            format!("`{}` is not a function", callee.node),
                            callee.span,
                        ));
                    }
                    // Unknown callees are assumed to be host primitives;
                    // arity and existence are checked at run time.
                    None => {}
                }
                for arg in args {
                    self.resolve_expr(arg, scope);
                }
            }
        }
    }

    fn resolve_var(&mut self, name: &Name, span: Span, scope: ScopeId) {
        match self.tree.lookup(scope, name) {
            Some(def) if def.kind == DefKind::Variable => {
                let def_span = def.span;
                self.refs.insert(span, def_span);
            }
            Some(def) => {
                let def_span = def.span;
                self.refs.insert(span, def_span);
                self.diagnostics.push(Diagnostic::error(
                    format!("`{name}` is a function, not a variable"),
                    span,
                ));
            }
            None => self.diagnostics.push(Diagnostic::error(
                format!("cannot find `{name}` in this scope"),
                span,
            )),
        }
    }
}
