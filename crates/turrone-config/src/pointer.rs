//! RFC 6901 JSON-Pointer helpers.
//!
//! Small standalone utility so validation and merge logic share one notion of
//! a pointer instead of leaning on any validation library's error shape.

use serde_json::{Map, Value};

/// Split a pointer into decoded path segments.
///
/// The empty pointer addresses the whole document and decodes to no
/// segments. `~1` unescapes to `/` and `~0` to `~`, in that order.
#[must_use]
pub fn decode(pointer: &str) -> Vec<String> {
    if pointer.is_empty() {
        return Vec::new();
    }

    pointer
        .trim_start_matches('/')
        .split('/')
        .map(|segment| segment.replace("~1", "/").replace("~0", "~"))
        .collect()
}

/// Join decoded segments back into a pointer string.
#[must_use]
pub fn encode<S: AsRef<str>>(segments: &[S]) -> String {
    let mut pointer = String::new();
    for segment in segments {
        pointer.push('/');
        pointer.push_str(&segment.as_ref().replace('~', "~0").replace('/', "~1"));
    }
    pointer
}

/// Resolve a pointer against a document.
#[must_use]
pub fn get<'a>(doc: &'a Value, pointer: &str) -> Option<&'a Value> {
    let mut current = doc;
    for segment in decode(pointer) {
        current = current.as_object()?.get(&segment)?;
    }
    Some(current)
}

/// Set the value at a pointer, creating intermediate objects as needed.
///
/// Non-object intermediate values are replaced by objects; the empty pointer
/// replaces the whole document.
pub fn set(doc: &mut Value, pointer: &str, value: Value) {
    let segments = decode(pointer);
    let Some((last, parents)) = segments.split_last() else {
        *doc = value;
        return;
    };

    let mut current = doc;
    for segment in parents {
        if !current.is_object() {
            *current = Value::Object(Map::new());
        }
        let Some(map) = current.as_object_mut() else {
            return;
        };
        current = map
            .entry(segment.clone())
            .or_insert_with(|| Value::Object(Map::new()));
    }

    if !current.is_object() {
        *current = Value::Object(Map::new());
    }
    if let Some(map) = current.as_object_mut() {
        map.insert(last.clone(), value);
    }
}
