//! Per-instance interceptor registry.

use canopy_types::{Result, Value};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// A callable member of a host: receives the host and the call arguments.
pub type Method<H> = Rc<dyn Fn(&mut H, &[Value]) -> Result<Value>>;

/// A before- or after-hook. Same shape as a [`Method`]; a before-hook that
/// returns `Value::Bool(false)` vetoes the call.
pub type Hook<H> = Rc<dyn Fn(&mut H, &[Value]) -> Result<Value>>;

/// Wraps a closure into a [`Method`] (or [`Hook`]).
pub fn method<H, F>(f: F) -> Method<H>
where
    F: Fn(&mut H, &[Value]) -> Result<Value> + 'static,
{
    Rc::new(f)
}

/// Which side of the call a hook runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advice {
    Before,
    After,
}

impl fmt::Display for Advice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advice::Before => f.write_str("before"),
            Advice::After => f.write_str("after"),
        }
    }
}

/// The wrapper for one (instance, method) pair.
///
/// Holds the method as it was when first wrapped, plus the hooks in
/// registration order. Duplicates are kept and run once per registration.
pub struct Interceptor<H> {
    original: Method<H>,
    before: Vec<Hook<H>>,
    after: Vec<Hook<H>>,
}

impl<H> Interceptor<H> {
    #[must_use]
    pub fn new(original: Method<H>) -> Self {
        Self {
            original,
            before: Vec::new(),
            after: Vec::new(),
        }
    }

    #[must_use]
    pub fn original(&self) -> &Method<H> {
        &self.original
    }

    #[must_use]
    pub fn before_hooks(&self) -> &[Hook<H>] {
        &self.before
    }

    #[must_use]
    pub fn after_hooks(&self) -> &[Hook<H>] {
        &self.after
    }

    pub fn add(&mut self, advice: Advice, hook: Hook<H>) {
        match advice {
            Advice::Before => self.before.push(hook),
            Advice::After => self.after.push(hook),
        }
    }
}

impl<H> Clone for Interceptor<H> {
    fn clone(&self) -> Self {
        Self {
            original: self.original.clone(),
            before: self.before.clone(),
            after: self.after.clone(),
        }
    }
}

impl<H> fmt::Debug for Interceptor<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interceptor")
            .field("before", &self.before.len())
            .field("after", &self.after.len())
            .finish_non_exhaustive()
    }
}

/// All interceptors owned by one instance, keyed by method name.
pub struct Interceptors<H> {
    wrapped: HashMap<String, Interceptor<H>>,
}

impl<H> Interceptors<H> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            wrapped: HashMap::new(),
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Interceptor<H>> {
        self.wrapped.get(name)
    }

    #[must_use]
    pub fn is_wrapped(&self, name: &str) -> bool {
        self.wrapped.contains_key(name)
    }

    /// Appends `hook` to the wrapper for `name`, creating the wrapper around
    /// `original` if the method was not wrapped yet. An existing wrapper
    /// keeps the original it captured first.
    pub fn add(&mut self, name: &str, original: Method<H>, advice: Advice, hook: Hook<H>) {
        self.wrapped
            .entry(name.to_string())
            .or_insert_with(|| Interceptor::new(original))
            .add(advice, hook);
    }

    /// Drops the wrapper for `name`, restoring the plain method.
    pub fn remove(&mut self, name: &str) -> Option<Interceptor<H>> {
        self.wrapped.remove(name)
    }

    pub fn clear(&mut self) {
        self.wrapped.clear();
    }

    /// Wrapped method names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.wrapped.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.wrapped.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.wrapped.is_empty()
    }
}

impl<H> Default for Interceptors<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> fmt::Debug for Interceptors<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.names().into_iter().filter_map(|n| self.get(n).map(|i| (n, i))))
            .finish()
    }
}
