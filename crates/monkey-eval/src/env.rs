//! Lexically chained variable environments.
//!
//! An [`Environment`] is a cheap, clonable handle to one scope. Scopes are
//! shared: a closure keeps its defining scope alive, and every handle to a
//! scope observes mutations made through any other handle.

use crate::error::EvalError;
use crate::object::Object;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use tracing::trace;

struct Scope {
    bindings: BTreeMap<String, Object>,
    outer: Option<Environment>,
}

#[derive(Clone)]
pub struct Environment(Rc<RefCell<Scope>>);

impl Environment {
    /// A fresh root scope with no bindings.
    pub fn new() -> Self {
        Self::with_outer(None)
    }

    /// A fresh empty scope whose lookups fall back to `outer`.
    pub fn enclosed(outer: &Environment) -> Self {
        Self::with_outer(Some(outer.clone()))
    }

    fn with_outer(outer: Option<Environment>) -> Self {
        Environment(Rc::new(RefCell::new(Scope {
            bindings: BTreeMap::new(),
            outer,
        })))
    }

    /// Look `name` up here, then in each enclosing scope in turn.
    pub fn get(&self, name: &str) -> Option<Object> {
        let scope = self.0.borrow();
        match scope.bindings.get(name) {
            Some(value) => Some(value.clone()),
            None => scope.outer.as_ref()?.get(name),
        }
    }

    /// Declare `name` in this scope.
    ///
    /// Fails if this scope already binds `name`; shadowing a binding of an
    /// enclosing scope is allowed.
    pub fn set(&self, name: &str, value: Object) -> Result<Object, EvalError> {
        let mut scope = self.0.borrow_mut();
        if scope.bindings.contains_key(name) {
            return Err(EvalError::AlreadyDeclared(name.to_string()));
        }
        trace!(name, kind = %value.kind(), "declare");
        scope.bindings.insert(name.to_string(), value.clone());
        Ok(value)
    }

    /// Rebind an existing `name` of this scope.
    ///
    /// Only this scope is searched: a name bound further out is reported as
    /// not defined.
    pub fn update(&self, name: &str, value: Object) -> Result<Object, EvalError> {
        let mut scope = self.0.borrow_mut();
        let Some(slot) = scope.bindings.get_mut(name) else {
            return Err(EvalError::NotDefined(name.to_string()));
        };
        trace!(name, kind = %value.kind(), "update");
        *slot = value.clone();
        Ok(value)
    }

    /// Bind `name` in this scope, replacing any existing binding.
    pub fn upsert(&self, name: &str, value: Object) -> Object {
        trace!(name, kind = %value.kind(), "upsert");
        self.0
            .borrow_mut()
            .bindings
            .insert(name.to_string(), value.clone());
        value
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

// Values may hold closures over this very scope, so only names are shown.
impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scope = self.0.borrow();
        f.debug_struct("Environment")
            .field("names", &scope.bindings.keys().collect::<Vec<_>>())
            .field("has_outer", &scope.outer.is_some())
            .finish()
    }
}
