use std::collections::BTreeMap;

use crobots_ast::{Name, Span};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ScopeId(usize);

impl ScopeId {
    pub const ROOT: ScopeId = ScopeId(0);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DefKind {
    Function,
    Variable,
}

/// A name's declaring occurrence.
#[derive(Debug, Clone, PartialEq)]
pub struct Definition {
    pub kind: DefKind,
    pub name: Name,
    pub span: Span,
    /// Label of the scope that owns the definition (the enclosing
    /// function's name, or `None` at the top level and in plain blocks).
    pub owner: Option<Name>,
}

#[derive(Debug, PartialEq)]
pub struct Scope {
    pub span: Span,
    /// The function name for a function scope; `None` for the root and
    /// for plain block scopes.
    pub label: Option<Name>,
    /// Names this scope directly declares. A redeclaration in the same
    /// scope replaces the earlier entry, so the retained definition is
    /// the textually last one.
    pub definitions: BTreeMap<Name, Definition>,
    parent: Option<ScopeId>,
    children: Vec<ScopeId>,
}

/// Arena of lexical scopes. Rebuilt from scratch on every resolution
/// request; holds no state across edits.
#[derive(Debug, PartialEq)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
}

impl ScopeTree {
    /// A tree with only the root scope, covering the whole program.
    pub fn new(program_span: Span) -> Self {
        Self {
            scopes: vec![Scope {
                span: program_span,
                label: None,
                definitions: BTreeMap::new(),
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0]
    }

    pub fn parent(&self, id: ScopeId) -> Option<ScopeId> {
        self.scopes[id.0].parent
    }

    pub fn children(&self, id: ScopeId) -> &[ScopeId] {
        &self.scopes[id.0].children
    }

    pub fn push_scope(&mut self, parent: ScopeId, span: Span, label: Option<Name>) -> ScopeId {
        debug_assert!(
            self.scopes[parent.0].span.contains(span),
            "child scope must lie within its parent"
        );
        debug_assert!(
            self.scopes[parent.0]
                .children
                .iter()
                .all(|&c| !self.scopes[c.0].span.overlaps(span)),
            "sibling scopes must not overlap"
        );
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope {
            span,
            label,
            definitions: BTreeMap::new(),
            parent: Some(parent),
            children: Vec::new(),
        });
        self.scopes[parent.0].children.push(id);
        id
    }

    pub fn define(&mut self, id: ScopeId, definition: Definition) {
        self.scopes[id.0]
            .definitions
            .insert(definition.name.clone(), definition);
    }

    /// Walk from `scope` outward through parents for a name.
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Option<&Definition> {
        let mut current = Some(scope);
        while let Some(id) = current {
            if let Some(def) = self.scopes[id.0].definitions.get(name) {
                return Some(def);
            }
            current = self.scopes[id.0].parent;
        }
        None
    }

    /// The innermost scope whose span contains `span`. Falls back to
    /// the root, which covers the whole program.
    pub fn innermost_at(&self, span: Span) -> ScopeId {
        let mut current = ScopeId::ROOT;
        'descend: loop {
            for &child in &self.scopes[current.0].children {
                if self.scopes[child.0].span.contains(span) {
                    current = child;
                    continue 'descend;
                }
            }
            return current;
        }
    }

    /// Names visible at a point, innermost declaration winning on a
    /// collision. Sorted by name.
    pub fn visible_at(&self, span: Span) -> Vec<&Definition> {
        let mut seen: BTreeMap<&Name, &Definition> = BTreeMap::new();
        let mut current = Some(self.innermost_at(span));
        while let Some(id) = current {
            for (name, def) in &self.scopes[id.0].definitions {
                seen.entry(name).or_insert(def);
            }
            current = self.scopes[id.0].parent;
        }
        seen.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn def(kind: DefKind, name: &str, span: Span) -> Definition {
        Definition {
            kind,
            name: Name::from(name),
            span,
            owner: None,
        }
    }

    #[test]
    fn innermost_at_descends_into_nested_scopes() {
        let mut tree = ScopeTree::new(Span::new(0, 100));
        let f = tree.push_scope(ScopeId::ROOT, Span::new(10, 60), Some(Name::from("f")));
        let block = tree.push_scope(f, Span::new(20, 40), None);

        assert_eq!(tree.innermost_at(Span::new(25, 26)), block);
        assert_eq!(tree.innermost_at(Span::new(50, 51)), f);
        assert_eq!(tree.innermost_at(Span::new(90, 91)), ScopeId::ROOT);
    }

    #[test]
    fn lookup_walks_outward() {
        let mut tree = ScopeTree::new(Span::new(0, 100));
        let f = tree.push_scope(ScopeId::ROOT, Span::new(10, 60), Some(Name::from("f")));
        tree.define(ScopeId::ROOT, def(DefKind::Variable, "x", Span::new(0, 1)));
        tree.define(f, def(DefKind::Variable, "y", Span::new(11, 12)));

        assert!(tree.lookup(f, "y").is_some());
        assert!(tree.lookup(f, "x").is_some());
        assert!(tree.lookup(ScopeId::ROOT, "y").is_none());
    }

    #[test]
    fn inner_definition_shadows_outer_in_visible_at() {
        let mut tree = ScopeTree::new(Span::new(0, 100));
        let f = tree.push_scope(ScopeId::ROOT, Span::new(10, 60), Some(Name::from("f")));
        tree.define(ScopeId::ROOT, def(DefKind::Variable, "x", Span::new(0, 1)));
        tree.define(f, def(DefKind::Variable, "x", Span::new(11, 12)));

        let visible = tree.visible_at(Span::new(30, 31));
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].span, Span::new(11, 12));
    }
}
