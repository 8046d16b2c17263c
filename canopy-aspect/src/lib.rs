//! Method interception for Canopy.
//!
//! An [`Aspect`] host resolves methods by name. `before` and `after` wrap a
//! method on the instance (never the shared class definition) by recording
//! an [`Interceptor`] in the host's [`Interceptors`] registry; every call
//! routed through [`Aspect::invoke`] then runs:
//!
//! 1. each before-hook with the call arguments; a hook returning
//!    `Value::Bool(false)` vetoes the call, which returns `Undefined`
//! 2. the original method
//! 3. each after-hook with the return value prepended to the arguments
//!
//! and returns the original method's result. Errors from hooks or the
//! method propagate unchanged.

mod registry;

pub use registry::{Advice, Hook, Interceptor, Interceptors, Method, method};

use canopy_types::{Error, Result, Value};
use tracing::debug;

/// Interception capability for a host that owns an [`Interceptors`] registry.
pub trait Aspect: Sized + 'static {
    fn interceptors(&self) -> &Interceptors<Self>;
    fn interceptors_mut(&mut self) -> &mut Interceptors<Self>;

    /// Looks up the plain (unwrapped) method `name`.
    fn resolve_method(&self, name: &str) -> Option<Method<Self>>;

    /// Registers `hook` to run before each whitespace-separated method in
    /// `methods`.
    ///
    /// Every name is checked before anything is registered; an unknown name
    /// fails with [`Error::NoSuchMethod`] and leaves the registry untouched.
    fn before(&mut self, methods: &str, hook: Hook<Self>) -> Result<&mut Self> {
        weave(self, Advice::Before, methods, hook)?;
        Ok(self)
    }

    /// Registers `hook` to run after each whitespace-separated method in
    /// `methods`. Same validation as [`Aspect::before`].
    fn after(&mut self, methods: &str, hook: Hook<Self>) -> Result<&mut Self> {
        weave(self, Advice::After, methods, hook)?;
        Ok(self)
    }

    /// Calls method `name` through its interceptor, if any.
    fn invoke(&mut self, name: &str, args: &[Value]) -> Result<Value> {
        let Some(interceptor) = self.interceptors().get(name).cloned() else {
            let method = self
                .resolve_method(name)
                .ok_or_else(|| Error::no_such_method(name))?;
            return method(self, args);
        };

        for hook in interceptor.before_hooks() {
            if let Value::Bool(false) = hook(self, args)? {
                debug!(method = name, "call vetoed by before-hook");
                return Ok(Value::Undefined);
            }
        }

        let ret = (interceptor.original())(self, args)?;

        if !interceptor.after_hooks().is_empty() {
            let mut with_ret = Vec::with_capacity(args.len() + 1);
            with_ret.push(ret.clone());
            with_ret.extend_from_slice(args);
            for hook in interceptor.after_hooks() {
                hook(self, &with_ret)?;
            }
        }
        Ok(ret)
    }
}

fn weave<H: Aspect>(host: &mut H, advice: Advice, methods: &str, hook: Hook<H>) -> Result<()> {
    let mut targets = Vec::new();
    for name in methods.split_whitespace() {
        let original = match host.interceptors().get(name) {
            Some(existing) => existing.original().clone(),
            None => host
                .resolve_method(name)
                .ok_or_else(|| Error::no_such_method(name))?,
        };
        targets.push((name, original));
    }

    for (name, original) in targets {
        debug!(method = name, %advice, "registering hook");
        host.interceptors_mut().add(name, original, advice, hook.clone());
    }
    Ok(())
}
