//! Environment: a chain of scopes for lexical scoping and closures.
//!
//! Each frame owns its bindings and a strong link to exactly one parent; the
//! global frame has none. Frames are shared by every closure and in-flight
//! continuation that captured them and are freed when the last holder drops.

use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use lam_ir::{Lambda, Name};
use lam_stack::ensure_sufficient_stack;

use crate::errors::undefined_variable;
use crate::value::Closure;
use crate::{EvalResult, Value};

/// A single-threaded, reference-counted cell holding one scope.
///
/// All frame allocation goes through [`LocalScope::new`]. Not thread-safe:
/// the evaluator is single-threaded, so `Rc` rather than `Arc`.
#[repr(transparent)]
pub struct LocalScope<T>(Rc<RefCell<T>>);

impl<T> LocalScope<T> {
    #[inline]
    pub fn new(value: T) -> Self {
        LocalScope(Rc::new(RefCell::new(value)))
    }

    #[inline]
    pub fn borrow(&self) -> std::cell::Ref<'_, T> {
        self.0.borrow()
    }

    #[inline]
    pub fn borrow_mut(&self) -> std::cell::RefMut<'_, T> {
        self.0.borrow_mut()
    }

    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<T> Clone for LocalScope<T> {
    #[inline]
    fn clone(&self) -> Self {
        LocalScope(Rc::clone(&self.0))
    }
}

/// What a name is bound to in one frame.
#[derive(Clone)]
enum Slot {
    Value(Value),
    /// Self-reference of a named function literal.
    ///
    /// Storing the literal instead of the closure keeps the frame from owning
    /// a closure that owns the frame. The closure is rebuilt over the frame
    /// holding this slot whenever the name is read.
    Recursive(Rc<Lambda>),
}

/// One frame of bindings.
#[derive(Default)]
pub struct Scope {
    bindings: FxHashMap<Name, Slot>,
    parent: Option<Environment>,
}

impl Drop for Scope {
    fn drop(&mut self) {
        // A frame can be the only holder of a long chain: its parent, and any
        // closure bound here together with the frames that closure captured.
        let bindings = std::mem::take(&mut self.bindings);
        let parent = self.parent.take();
        ensure_sufficient_stack(move || drop((bindings, parent)));
    }
}

/// Handle to a frame. Cloning shares the frame.
#[derive(Clone)]
pub struct Environment(LocalScope<Scope>);

impl Environment {
    /// A fresh global frame.
    pub fn new() -> Self {
        Environment(LocalScope::new(Scope::default()))
    }

    /// A new child frame whose parent is `self`.
    #[must_use]
    pub fn extend(&self) -> Self {
        Environment(LocalScope::new(Scope {
            bindings: FxHashMap::default(),
            parent: Some(self.clone()),
        }))
    }

    /// Bind `name` in this frame only, replacing any binding it already has here.
    pub fn define(&self, name: Name, value: Value) {
        self.0.borrow_mut().bindings.insert(name, Slot::Value(value));
    }

    /// Make `lambda` visible under its own name in this frame.
    ///
    /// Does nothing for anonymous literals.
    pub fn define_recursive(&self, lambda: &Rc<Lambda>) {
        if let Some(name) = &lambda.name {
            self.0
                .borrow_mut()
                .bindings
                .insert(name.clone(), Slot::Recursive(Rc::clone(lambda)));
        }
    }

    /// Look `name` up in this frame, then in each ancestor.
    pub fn lookup(&self, name: &str) -> Option<Value> {
        let mut frame = self.clone();
        loop {
            let parent = {
                let scope = frame.0.borrow();
                if let Some(slot) = scope.bindings.get(name) {
                    return Some(match slot {
                        Slot::Value(value) => value.clone(),
                        Slot::Recursive(lambda) => Value::Closure(Rc::new(Closure {
                            lambda: Rc::clone(lambda),
                            env: frame.clone(),
                        })),
                    });
                }
                scope.parent.clone()
            };
            frame = parent?;
        }
    }

    /// [`lookup`](Self::lookup), failing with `UndefinedVariable`.
    pub fn get(&self, name: &str) -> EvalResult {
        self.lookup(name).ok_or_else(|| undefined_variable(name))
    }

    /// Overwrite the nearest existing binding of `name`.
    ///
    /// Never creates a binding: fails with `UndefinedVariable` when no frame
    /// in the chain has one.
    pub fn set(&self, name: &str, value: Value) -> EvalResult<()> {
        let mut frame = self.clone();
        loop {
            let parent = {
                let mut scope = frame.0.borrow_mut();
                if let Some(slot) = scope.bindings.get_mut(name) {
                    *slot = Slot::Value(value);
                    return Ok(());
                }
                scope.parent.clone()
            };
            match parent {
                Some(parent) => frame = parent,
                None => return Err(undefined_variable(name)),
            }
        }
    }

    /// Whether the name is bound in this frame itself (ancestors not consulted).
    pub fn defines_locally(&self, name: &str) -> bool {
        self.0.borrow().bindings.contains_key(name)
    }

    /// Whether both handles refer to the same frame.
    pub fn ptr_eq(&self, other: &Environment) -> bool {
        self.0.ptr_eq(&other.0)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scope = self.0.borrow();
        let mut names: Vec<&str> = scope.bindings.keys().map(Name::as_str).collect();
        names.sort_unstable();
        f.debug_struct("Environment")
            .field("names", &names)
            .field("has_parent", &scope.parent.is_some())
            .finish()
    }
}
