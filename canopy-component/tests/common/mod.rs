//! Shared helpers for component tests.

#![allow(dead_code)]

use canopy_component::{Component, Value};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

/// Installs a test-writer subscriber honoring `RUST_LOG`. Safe to call from
/// every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .compact()
        .try_init();
}

/// A shared counter handed to closures.
#[derive(Clone, Default)]
pub struct Counter(Rc<Cell<usize>>);

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn incr(&self) {
        self.0.set(self.0.get() + 1);
    }

    pub fn get(&self) -> usize {
        self.0.get()
    }

    pub fn reset(&self) {
        self.0.set(0);
    }

    /// A listener-shaped closure that bumps the counter.
    pub fn hook(&self) -> impl Fn(&mut Component, &[Value]) -> canopy_component::Result<Value> + 'static {
        let counter = self.clone();
        move |_, _| {
            counter.incr();
            Ok(Value::Undefined)
        }
    }
}

/// A shared record of argument lists.
#[derive(Clone, Default)]
pub struct Recorder(Rc<RefCell<Vec<Vec<Value>>>>);

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, args: &[Value]) {
        self.0.borrow_mut().push(args.to_vec());
    }

    pub fn calls(&self) -> Vec<Vec<Value>> {
        self.0.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }
}

pub fn v(json: serde_json::Value) -> Value {
    Value::from(json)
}
