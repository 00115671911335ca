//! Deep merging of values read from several layers.

use serde_json::Value;
use serde_json::map::Entry;

/// Fold layer values, lowest precedence first, into one value.
///
/// Returns `None` when no layer supplied a value.
pub fn merge_layers(values: impl IntoIterator<Item = Value>) -> Option<Value> {
    values.into_iter().reduce(|mut merged, value| {
        merge_values(&mut merged, value);
        merged
    })
}

/// Lay `overlay` over `base`. Only objects on both sides merge per key;
/// anything else in the overlay takes the slot.
pub fn merge_values(base: &mut Value, overlay: Value) {
    let overlay_map = match (&mut *base, overlay) {
        (Value::Object(_), Value::Object(overlay_map)) => overlay_map,
        (_, overlay) => {
            *base = overlay;
            return;
        }
    };
    let Value::Object(base_map) = base else {
        return;
    };
    for (key, value) in overlay_map {
        match base_map.entry(key) {
            Entry::Occupied(mut slot) => merge_values(slot.get_mut(), value),
            Entry::Vacant(slot) => {
                slot.insert(value);
            }
        }
    }
}
