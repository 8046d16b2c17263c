//! `get` / `set` semantics and change notification.

use crate::changes::Change;
use crate::options::SetOptions;
use crate::store::{Attributes, Written};
use canopy_types::{Error, Map, Result, Value, merge_value};
use tracing::{debug, trace};

/// Attribute capability for a host that owns an [`Attributes`] store.
///
/// Implementors provide storage access and the delivery of one change
/// notification; every accessor is a provided method.
pub trait AttributeHost: Sized + 'static {
    fn attributes(&self) -> &Attributes<Self>;
    fn attributes_mut(&mut self) -> &mut Attributes<Self>;

    /// Announces one committed change.
    fn notify_change(&mut self, change: &Change);

    /// Returns the exposed value of `name`.
    ///
    /// With a getter, the getter sees the stored value (`Undefined` for
    /// virtual attributes); otherwise the stored value is returned as is.
    /// Unknown names yield `Undefined`.
    fn get(&self, name: &str) -> Value {
        let attrs = self.attributes();
        let stored = attrs.stored(name).cloned().unwrap_or_default();
        match attrs.schema().get(name).and_then(|a| a.getter()).cloned() {
            Some(getter) => getter(self, &stored),
            None => stored,
        }
    }

    /// Sets one attribute and announces the change.
    fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        self.set_with(name, value, SetOptions::default())
    }

    /// Sets one attribute with explicit options.
    fn set_with(&mut self, name: &str, value: impl Into<Value>, options: SetOptions) -> Result<()> {
        let mut batch = Map::with_capacity(1);
        batch.insert(name, value);
        self.set_many(batch, options)
    }

    /// Sets several attributes as one batch.
    ///
    /// Attributes without setters are applied first, then attributes with
    /// setters, each group in map order, so that a composite setter's
    /// fan-out overrides literal values supplied in the same batch.
    ///
    /// Nothing is announced until every update, including nested `set`
    /// calls made by setters, has been applied. Each written attribute is
    /// then compared once, final exposed value against the value it had
    /// before the outermost call began, in first-write order.
    ///
    /// A read-only attribute anywhere in the batch fails the call before
    /// anything is written. A failing setter fails the call and restores
    /// every value the call wrote; nothing is announced.
    fn set_many(&mut self, values: Map, options: SetOptions) -> Result<()> {
        let schema = self.attributes().schema().clone();
        if let Some(name) = values.keys().find(|k| schema.is_read_only(k)) {
            return Err(Error::read_only(name));
        }

        self.attributes_mut().begin_batch();
        if !self.attributes().is_initializing() {
            for name in values.keys() {
                let exposed = self.get(name);
                self.attributes_mut().remember(name, exposed);
            }
        }

        let (plain, with_setter): (Vec<_>, Vec<_>) = values
            .into_iter()
            .partition(|(name, _)| !schema.has_setter(name));

        for (name, value) in plain.into_iter().chain(with_setter) {
            if let Err(e) = apply(self, &name, value, options) {
                debug!(attribute = %name, error = %e, "set failed, rolling back");
                self.attributes_mut().abort_batch();
                return Err(e);
            }
        }
        let written = self.attributes_mut().finish_batch();
        commit(self, written);
        Ok(())
    }

    /// Announces every pending silent change, in first-recorded order, and
    /// clears the pending set. A no-op when nothing is pending.
    fn change(&mut self) {
        let pending = self.attributes_mut().pending_mut().take();
        if pending.is_empty() {
            return;
        }
        debug!(count = pending.len(), "replaying pending changes");
        for change in &pending {
            self.notify_change(change);
        }
    }

    /// Initializes the store from the schema and a user config.
    ///
    /// Runs in two phases. First every declared default is cloned into the
    /// store and every config value is merged over it (plain objects
    /// deep-merge, anything else replaces). Then, for each config key whose
    /// attribute has a setter, the setter runs on the merged value. Nothing
    /// is announced and nothing is left pending.
    ///
    /// Only the config value itself bypasses the read-only guard: a setter
    /// that writes another read-only attribute fails construction.
    fn init_attrs(&mut self, config: &Map) -> Result<()> {
        let schema = self.attributes().schema().clone();
        let attrs = self.attributes_mut();
        attrs.set_initializing(true);

        for (name, attr) in schema.iter() {
            if let Some(default) = attr.default_value() {
                attrs.store(name, default.clone());
            }
        }
        for (name, value) in config.iter() {
            let value = match attrs.stored(name) {
                Some(current) => merge_value(current, value.clone()),
                None => value.clone(),
            };
            attrs.store(name, value);
        }

        let mut outcome = Ok(());
        for name in config.keys() {
            if !schema.has_setter(name) {
                continue;
            }
            let value = self.attributes().stored(name).cloned().unwrap_or_default();
            if let Err(e) = apply(self, name, value, SetOptions::new().silent(true)) {
                outcome = Err(e);
                break;
            }
        }

        let attrs = self.attributes_mut();
        attrs.set_initializing(false);
        attrs.pending_mut().clear();
        outcome
    }
}

/// Applies one write. Outside initialization the write is marked on the
/// open batch for [`commit`] to compare later.
fn apply<H: AttributeHost>(
    host: &mut H,
    name: &str,
    value: Value,
    options: SetOptions,
) -> Result<()> {
    let setter = host
        .attributes()
        .schema()
        .get(name)
        .and_then(|attr| attr.setter())
        .cloned();

    let value = match setter {
        Some(setter) => setter(host, value)?,
        None if options.overwrite => value,
        None => match host.attributes().stored(name) {
            Some(current) => merge_value(current, value),
            None => value,
        },
    };

    let attrs = host.attributes_mut();
    attrs.store(name, value);
    if !attrs.is_initializing() {
        attrs.mark_written(name, options.silent);
    }
    Ok(())
}

/// Records or announces the net changes of a finished outermost batch.
///
/// An attribute whose final exposed value equals its value before the
/// batch is skipped. One written only by silent calls is recorded as
/// pending; any loud write announces it and clears its pending entry.
/// Every value is read before the first listener runs.
fn commit<H: AttributeHost>(host: &mut H, written: Vec<Written>) {
    let changes: Vec<(Change, bool)> = written
        .into_iter()
        .filter_map(|entry| {
            let current = host.get(&entry.attribute);
            (current != entry.previous)
                .then(|| (Change::new(entry.attribute, current, entry.previous), entry.silent))
        })
        .collect();

    for (change, silent) in changes {
        if silent {
            trace!(attribute = %change.attribute, "recording silent change");
            host.attributes_mut().pending_mut().record(change);
        } else {
            host.attributes_mut().pending_mut().remove(&change.attribute);
            trace!(attribute = %change.attribute, "announcing change");
            host.notify_change(&change);
        }
    }
}
