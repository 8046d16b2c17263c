//! Per-instance construction input.

use crate::component::Component;
use canopy_aspect::Hook;
use canopy_types::{Error, Map, Result, Value};
use regex_lite::Regex;
use std::fmt;
use std::rc::Rc;
use std::sync::LazyLock;

static LISTENER_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(on|before|after)([A-Z].*)$").expect("listener key pattern is valid")
});

static EVENT_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(Change)?([A-Z])(.*)$").expect("event name pattern is valid")
});

/// User values plus config-declared listeners.
///
/// Values seed the attribute store; undeclared keys become dynamic
/// attributes. Listeners are keyed `on<Event>`, `before<Method>` or
/// `after<Method>` and are wired once construction is done.
#[derive(Clone, Default)]
pub struct Config {
    values: Map,
    listeners: Vec<(String, Hook<Component>)>,
}

impl Config {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON object into config values.
    pub fn from_json(json: &str) -> Result<Self> {
        match Value::from(serde_json::from_str::<serde_json::Value>(json)?) {
            Value::Object(values) => Ok(Self::from(values)),
            other => Err(Error::InvalidConfig(format!(
                "expected a JSON object, got {other}"
            ))),
        }
    }

    /// Builder-style value insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key, value);
        self
    }

    /// Builder-style listener registration.
    #[must_use]
    pub fn listener<F>(mut self, key: impl Into<String>, f: F) -> Self
    where
        F: Fn(&mut Component, &[Value]) -> Result<Value> + 'static,
    {
        self.listeners.push((key.into(), Rc::new(f)));
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(key, value)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    #[must_use]
    pub fn values(&self) -> &Map {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut Map {
        &mut self.values
    }

    pub fn add_listener(&mut self, key: impl Into<String>, hook: Hook<Component>) {
        self.listeners.push((key.into(), hook));
    }

    /// Listener keys in registration order.
    pub fn listener_keys(&self) -> impl Iterator<Item = &str> {
        self.listeners.iter().map(|(k, _)| k.as_str())
    }

    pub(crate) fn into_parts(self) -> (Map, Vec<(String, Hook<Component>)>) {
        (self.values, self.listeners)
    }
}

impl From<Map> for Config {
    fn from(values: Map) -> Self {
        Self {
            values,
            listeners: Vec::new(),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("values", &self.values)
            .field("listeners", &self.listener_keys().collect::<Vec<_>>())
            .finish()
    }
}

/// What a config listener key asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenerKey {
    /// `on<Event>`: an event listener.
    On(String),
    /// `before<Method>`: a before-hook.
    Before(String),
    /// `after<Method>`: an after-hook.
    After(String),
}

impl ListenerKey {
    /// Parses `onShow`, `onChangeTitle`, `beforeHide` and the like.
    ///
    /// The part after the prefix names the event or method with its first
    /// letter lower-cased; a leading `Change` becomes the `change:` prefix.
    pub fn parse(key: &str) -> Result<Self> {
        let invalid = || {
            Error::InvalidConfig(format!(
                "listener key '{key}' must look like on<Event>, before<Method> or after<Method>"
            ))
        };
        let caps = LISTENER_KEY.captures(key).ok_or_else(invalid)?;
        let (kind, rest) = match (caps.get(1), caps.get(2)) {
            (Some(kind), Some(rest)) => (kind.as_str(), rest.as_str()),
            _ => return Err(invalid()),
        };
        let name = event_name(rest).ok_or_else(invalid)?;
        Ok(match kind {
            "on" => ListenerKey::On(name),
            "before" => ListenerKey::Before(name),
            _ => ListenerKey::After(name),
        })
    }
}

fn event_name(rest: &str) -> Option<String> {
    let caps = EVENT_NAME.captures(rest)?;
    let prefix = if caps.get(1).is_some() { "change:" } else { "" };
    let first = caps.get(2)?.as_str().to_lowercase();
    let tail = caps.get(3).map_or("", |m| m.as_str());
    Some(format!("{prefix}{first}{tail}"))
}

/// Name of the method auto-wired as the change listener of `attribute`:
/// `_onChange` followed by the name with its first character upper-cased.
#[must_use]
pub fn change_method_name(attribute: &str) -> String {
    format!("_onChange{}", ucfirst(attribute))
}

fn ucfirst(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
