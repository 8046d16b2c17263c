//! Shared test host for attribute tests.

#![allow(dead_code)]

use canopy_attrs::{AttributeHost, Attributes, Change, Declarations, Schema};
use canopy_types::{Map, Result, Value};
use std::rc::Rc;

/// Minimal host: a store plus a log of delivered notifications.
pub struct Host {
    pub attrs: Attributes<Host>,
    pub notified: Vec<Change>,
}

impl Host {
    pub fn new(schema: Rc<Schema<Host>>) -> Self {
        Self {
            attrs: Attributes::new(schema),
            notified: Vec::new(),
        }
    }

    /// Resolves `levels` and initializes with `config`.
    pub fn build(levels: &[Declarations<Host>], config: serde_json::Value) -> Result<Self> {
        let schema = Rc::new(Schema::resolve(levels));
        Self::with_schema(schema, config)
    }

    pub fn with_schema(schema: Rc<Schema<Host>>, config: serde_json::Value) -> Result<Self> {
        let mut host = Self::new(schema);
        host.init_attrs(&map(config))?;
        Ok(host)
    }

    pub fn names_notified(&self) -> Vec<&str> {
        self.notified.iter().map(|c| c.attribute.as_str()).collect()
    }
}

impl AttributeHost for Host {
    fn attributes(&self) -> &Attributes<Self> {
        &self.attrs
    }

    fn attributes_mut(&mut self) -> &mut Attributes<Self> {
        &mut self.attrs
    }

    fn notify_change(&mut self, change: &Change) {
        self.notified.push(change.clone());
    }
}

pub fn map(json: serde_json::Value) -> Map {
    match Value::from(json) {
        Value::Object(m) => m,
        Value::Null => Map::new(),
        other => panic!("expected object, got {other:?}"),
    }
}

pub fn v(json: serde_json::Value) -> Value {
    Value::from(json)
}
