//! Lexical scope stack used by the resolver and by codegen's local naming.
//!
//! The tracker always holds a root scope, so inserts never need a prior
//! `push_scope()`. Lookups walk from the innermost scope outward, which gives
//! the usual shadowing rules.

use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct ScopeTracker<T> {
    scopes: Vec<HashMap<String, T>>,
}

impl<T> ScopeTracker<T> {
    pub fn new() -> Self {
        Self { scopes: vec![HashMap::new()] }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    /// Drop the innermost scope. The root scope is never popped.
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Bind `name` in the innermost scope, replacing any binding of the same
    /// name in that scope.
    pub fn insert(&mut self, name: String, value: T) {
        match self.scopes.last_mut() {
            Some(scope) => {
                scope.insert(name, value);
            }
            None => self.scopes.push(HashMap::from([(name, value)])),
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&T> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Every binding visible from the innermost scope, innermost first.
    pub fn visible(&self) -> impl Iterator<Item = (&str, &T)> {
        self.scopes.iter().rev().flat_map(|scope| scope.iter().map(|(k, v)| (k.as_str(), v)))
    }
}

impl<T> Default for ScopeTracker<T> {
    fn default() -> Self {
        Self::new()
    }
}
