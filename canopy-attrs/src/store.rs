//! Per-instance attribute state.

use crate::changes::ChangeSet;
use crate::schema::Schema;
use canopy_types::{Map, Value};
use indexmap::IndexMap;
use std::fmt;
use std::rc::Rc;

/// Bookkeeping for the `set` call in progress, nested calls included.
///
/// Nothing is announced until the outermost call finishes, so a setter's
/// fan-out and later keys of the same batch are all visible when deciding
/// what changed.
#[derive(Debug, Default)]
struct Batch {
    /// One frame per nesting level: the stored value each name had before
    /// its first write at that level (`None` when it had none).
    undo: Vec<IndexMap<String, Option<Value>>>,
    /// Exposed value of every name touched, taken before the batch wrote it.
    before: IndexMap<String, Value>,
    /// Names written, in write order, and whether every write was silent.
    written: IndexMap<String, bool>,
}

/// A net change of the outermost batch, not yet compared or announced.
#[derive(Debug)]
pub(crate) struct Written {
    pub(crate) attribute: String,
    pub(crate) previous: Value,
    pub(crate) silent: bool,
}

/// Per-instance value store.
///
/// Holds the stored value of every attribute that has one, the silent
/// changes not yet announced, and whether construction-time initialization
/// is in progress. The schema is shared with the class; everything else is
/// owned by the instance.
pub struct Attributes<H> {
    schema: Rc<Schema<H>>,
    values: Map,
    pending: ChangeSet,
    initializing: bool,
    batch: Batch,
}

impl<H> Attributes<H> {
    #[must_use]
    pub fn new(schema: Rc<Schema<H>>) -> Self {
        Self {
            schema,
            values: Map::new(),
            pending: ChangeSet::new(),
            initializing: false,
            batch: Batch::default(),
        }
    }

    #[must_use]
    pub fn schema(&self) -> &Rc<Schema<H>> {
        &self.schema
    }

    /// The raw stored value, bypassing any getter.
    #[must_use]
    pub fn stored(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Writes a stored value directly. No setter, merge or notification.
    ///
    /// Inside a `set` call the write is undone if that call fails.
    pub fn store(&mut self, name: &str, value: Value) {
        let old = self.values.insert(name, value);
        if let Some(frame) = self.batch.undo.last_mut() {
            frame.entry(name.to_string()).or_insert(old);
        }
    }

    /// Whether `name` appears in the schema. Undeclared names are still
    /// accepted by `get`/`set` as dynamic attributes.
    #[must_use]
    pub fn is_declared(&self, name: &str) -> bool {
        self.schema.contains(name)
    }

    /// Declared names in schema order, followed by dynamic names in the
    /// order they were first stored.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.schema.names().map(str::to_string).collect();
        for key in self.values.keys() {
            if !self.schema.contains(key) {
                names.push(key.to_string());
            }
        }
        names
    }

    /// Silent changes not yet announced.
    #[must_use]
    pub fn pending(&self) -> &ChangeSet {
        &self.pending
    }

    pub(crate) fn pending_mut(&mut self) -> &mut ChangeSet {
        &mut self.pending
    }

    #[must_use]
    pub fn is_initializing(&self) -> bool {
        self.initializing
    }

    pub(crate) fn set_initializing(&mut self, initializing: bool) {
        self.initializing = initializing;
    }

    /// Opens one nesting level of a `set` call.
    pub(crate) fn begin_batch(&mut self) {
        self.batch.undo.push(IndexMap::new());
    }

    /// Remembers the exposed value of `name` unless this batch already has.
    pub(crate) fn remember(&mut self, name: &str, exposed: Value) {
        self.batch.before.entry(name.to_string()).or_insert(exposed);
    }

    /// Marks `name` as written by the batch.
    pub(crate) fn mark_written(&mut self, name: &str, silent: bool) {
        let entry = self.batch.written.entry(name.to_string()).or_insert(true);
        *entry &= silent;
    }

    /// Closes one nesting level. The outermost level hands back every name
    /// it wrote; inner levels fold their undo frame into the parent's.
    pub(crate) fn finish_batch(&mut self) -> Vec<Written> {
        let Some(frame) = self.batch.undo.pop() else {
            return Vec::new();
        };
        if let Some(parent) = self.batch.undo.last_mut() {
            for (name, old) in frame {
                parent.entry(name).or_insert(old);
            }
            return Vec::new();
        }
        let mut before = std::mem::take(&mut self.batch.before);
        std::mem::take(&mut self.batch.written)
            .into_iter()
            .map(|(attribute, silent)| Written {
                previous: before.shift_remove(&attribute).unwrap_or_default(),
                attribute,
                silent,
            })
            .collect()
    }

    /// Closes one nesting level after a failure, restoring what it wrote.
    pub(crate) fn abort_batch(&mut self) {
        if let Some(frame) = self.batch.undo.pop() {
            for (name, old) in frame {
                match old {
                    Some(value) => {
                        self.values.insert(name, value);
                    }
                    None => {
                        self.values.remove(&name);
                    }
                }
            }
        }
        if self.batch.undo.is_empty() {
            self.batch.before.clear();
            self.batch.written.clear();
        }
    }

    /// Drops every stored value and pending change. The schema stays.
    pub fn clear(&mut self) {
        self.values.clear();
        self.pending.clear();
    }
}

impl<H> fmt::Debug for Attributes<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attributes")
            .field("values", &self.values)
            .field("pending", &self.pending)
            .field("initializing", &self.initializing)
            .field("batch_depth", &self.batch.undo.len())
            .finish_non_exhaustive()
    }
}
