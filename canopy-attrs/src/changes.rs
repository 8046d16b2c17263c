//! Change tracking.

use canopy_types::Value;
use indexmap::IndexMap;

/// One observed change of an attribute's exposed value.
#[derive(Debug, Clone, PartialEq)]
pub struct Change {
    pub attribute: String,
    pub value: Value,
    pub previous: Value,
}

impl Change {
    #[must_use]
    pub fn new(attribute: impl Into<String>, value: Value, previous: Value) -> Self {
        Self {
            attribute: attribute.into(),
            value,
            previous,
        }
    }

    /// Notification arguments in delivery order: `(value, previous, name)`.
    #[must_use]
    pub fn args(&self) -> [Value; 3] {
        [
            self.value.clone(),
            self.previous.clone(),
            Value::from(self.attribute.as_str()),
        ]
    }
}

/// Changes recorded but not yet announced, in first-recorded order.
///
/// Only silent mutations land here. Recording the same attribute twice keeps
/// the first `previous` and the latest `value`; when the two end up equal
/// the entry disappears, since nothing changed on balance.
#[derive(Debug, Clone, Default)]
pub struct ChangeSet {
    changes: IndexMap<String, Change>,
}

impl ChangeSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, change: Change) {
        match self.changes.get_mut(&change.attribute) {
            Some(entry) if entry.previous == change.value => {
                self.changes.shift_remove(&change.attribute);
            }
            Some(entry) => entry.value = change.value,
            None => {
                self.changes.insert(change.attribute.clone(), change);
            }
        }
    }

    /// Forgets the pending entry for `attribute`, if any.
    pub fn remove(&mut self, attribute: &str) -> Option<Change> {
        self.changes.shift_remove(attribute)
    }

    /// Drains every pending change.
    pub fn take(&mut self) -> Vec<Change> {
        std::mem::take(&mut self.changes).into_values().collect()
    }

    pub fn clear(&mut self) {
        self.changes.clear();
    }

    #[must_use]
    pub fn get(&self, attribute: &str) -> Option<&Change> {
        self.changes.get(attribute)
    }

    #[must_use]
    pub fn contains(&self, attribute: &str) -> bool {
        self.changes.contains_key(attribute)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Change> {
        self.changes.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}
