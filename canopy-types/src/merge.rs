//! Deep-merge rules for plain objects.
//!
//! Only [`Value::Object`] participates in merging. Arrays, scalars and
//! handles on the supplier side replace whatever the receiver held.

use crate::{Map, Value};

/// Merges `supplier` into `receiver` key-wise.
///
/// Nested plain objects are merged recursively; every other supplier value
/// replaces the receiver's entry with a clone.
pub fn merge(receiver: &mut Map, supplier: &Map) {
    for (key, incoming) in supplier.iter() {
        let nested = matches!(
            (receiver.get(key), incoming),
            (Some(Value::Object(_)), Value::Object(_))
        );
        if nested {
            if let (Some(Value::Object(existing)), Value::Object(incoming)) =
                (receiver.get_mut(key), incoming)
            {
                merge(existing, incoming);
            }
        } else {
            receiver.insert(key, incoming.clone());
        }
    }
}

/// Returns a new map holding `base` with `overlay` merged on top.
#[must_use]
pub fn merged(base: &Map, overlay: &Map) -> Map {
    let mut out = base.clone();
    merge(&mut out, overlay);
    out
}

/// Combines a current value with an incoming one.
///
/// When both are plain objects the result is the current object with the
/// incoming one deep-merged on top; otherwise the incoming value wins.
#[must_use]
pub fn merge_value(current: &Value, incoming: Value) -> Value {
    match (current, incoming) {
        (Value::Object(base), Value::Object(overlay)) => Value::Object(merged(base, &overlay)),
        (_, incoming) => incoming,
    }
}
