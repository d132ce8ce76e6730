//! Bounded depth-first search over JSON trees.

use serde_json::{Map, Value};

/// Deepest nesting level the walk descends into.
pub(crate) const MAX_DEPTH: usize = 32;

/// Visits every object in `value` depth-first (pre-order) and returns the first
/// non-`None` result of `visit`. Nodes nested deeper than [`MAX_DEPTH`] are skipped.
pub(crate) fn find_object<T, F>(value: &Value, visit: &mut F) -> Option<T>
where
    F: FnMut(&Map<String, Value>) -> Option<T>,
{
    walk(value, 0, visit)
}

fn walk<T, F>(value: &Value, depth: usize, visit: &mut F) -> Option<T>
where
    F: FnMut(&Map<String, Value>) -> Option<T>,
{
    if depth > MAX_DEPTH {
        return None;
    }

    match value {
        Value::Object(map) => {
            if let Some(found) = visit(map) {
                return Some(found);
            }
            for child in map.values() {
                if let Some(found) = walk(child, depth + 1, visit) {
                    return Some(found);
                }
            }
            None
        }
        Value::Array(items) => {
            for child in items {
                if let Some(found) = walk(child, depth + 1, visit) {
                    return Some(found);
                }
            }
            None
        }
        _ => None,
    }
}
