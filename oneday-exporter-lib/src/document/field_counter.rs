use serde_json::{Map, Value};

const LOG_TARGET: &str = "    fields";

/// `serde_json` refuses to parse documents nested deeper than 128 levels, so a mapping
/// that reaches this depth did not come from the wire.
const MAX_DEPTH: usize = 128;

/// Count the field declarations in an index mapping document.
///
/// An object counts as one field when its `type` key holds a string. When `type` holds an
/// object instead (a field that is itself named `type`), that object is searched in place of
/// counting the current level. Every other object-valued member is searched as well, whether
/// or not the current level was counted, so multi-fields under `fields` and sibling
/// declarations under `properties` are all found. Arrays are not searched.
#[must_use]
pub fn count_fields(doc: &Value) -> u64 {
    doc.as_object().map_or(0, |map| count_in(map, 0))
}

fn count_in(map: &Map<String, Value>, depth: usize) -> u64 {
    if depth >= MAX_DEPTH {
        log::warn!(target: LOG_TARGET, "Mapping nested deeper than {MAX_DEPTH} levels, ignoring the remainder");
        return 0;
    }

    let own = match map.get("type") {
        Some(Value::String(_)) => 1,
        Some(Value::Object(nested)) => count_in(nested, depth + 1),
        _ => 0,
    };

    let children: u64 = map
        .iter()
        .filter(|(key, _)| key.as_str() != "type")
        .filter_map(|(_, value)| value.as_object())
        .map(|child| count_in(child, depth + 1))
        .sum();

    own + children
}
