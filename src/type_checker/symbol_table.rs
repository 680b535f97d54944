use std::collections::HashMap;

use crate::ast::types::Datatype;

/// Handle to a scope stored in a `SymbolTable`.
///
/// A parent always has a smaller index than its children, so the parent chain
/// is acyclic and ends at the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(usize);

#[derive(Debug)]
pub struct Scope<T> {
    pub name: String,
    pub parent: Option<ScopeId>,
    bindings: HashMap<String, T>,
}

impl<T> Scope<T> {
    fn new(name: String, parent: Option<ScopeId>) -> Self {
        Scope {
            name,
            parent,
            bindings: HashMap::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.bindings.get(name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Arena of lexical scopes mapping names to `T`.
///
/// The type pass stores a `Datatype` per name; code generation reuses the same
/// structure to hold generated values.
#[derive(Debug)]
pub struct SymbolTable<T = Datatype> {
    scopes: Vec<Scope<T>>,
}

impl<T> SymbolTable<T> {
    /// Creates a table holding only the root scope.
    pub fn new(root_name: &str) -> Self {
        SymbolTable {
            scopes: vec![Scope::new(String::from(root_name), None)],
        }
    }

    pub fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    /// Opens a child scope of `parent`.
    pub fn enter(&mut self, parent: ScopeId, name: &str) -> ScopeId {
        assert!(parent.0 < self.scopes.len(), "Parent scope {:?} does not exist", parent);

        self.scopes.push(Scope::new(String::from(name), Some(parent)));
        ScopeId(self.scopes.len() - 1)
    }

    pub fn scope(&self, id: ScopeId) -> &Scope<T> {
        &self.scopes[id.0]
    }

    pub fn parent(&self, id: ScopeId) -> Option<ScopeId> {
        self.scopes[id.0].parent
    }

    /// Inserts or overwrites `name` in `scope`. Last write wins.
    pub fn declare(&mut self, scope: ScopeId, name: &str, value: T) {
        self.scopes[scope.0].bindings.insert(String::from(name), value);
    }

    /// Looks `name` up in `scope`, then in each enclosing scope. The innermost
    /// binding wins.
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Option<&T> {
        let mut current = Some(scope);

        while let Some(id) = current {
            let scope = &self.scopes[id.0];
            if let Some(value) = scope.get(name) {
                return Some(value);
            }
            current = scope.parent;
        }

        None
    }

    /// Number of scopes created so far, the root included.
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Number of scopes between `scope` and the root.
    pub fn depth(&self, scope: ScopeId) -> usize {
        let mut depth = 0;
        let mut current = self.parent(scope);
        while let Some(id) = current {
            depth += 1;
            current = self.parent(id);
        }
        depth
    }
}
