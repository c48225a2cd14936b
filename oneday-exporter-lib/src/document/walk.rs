use serde_json::Value;

/// Resolve a dot-separated `path` inside `doc`.
///
/// Every segment but the last must name an object. Returns `None` when `doc` itself is not
/// an object, when an intermediate key is missing or holds a non-object value, or when the
/// final key is absent. A final key holding `null` is found and returned as [`Value::Null`].
#[must_use]
pub fn walk<'a>(doc: &'a Value, path: &str) -> Option<&'a Value> {
    let (parents, last) = match path.rsplit_once('.') {
        Some((parents, last)) => (Some(parents), last),
        None => (None, path),
    };

    let mut current = doc.as_object()?;
    if let Some(parents) = parents {
        for segment in parents.split('.') {
            current = current.get(segment)?.as_object()?;
        }
    }

    current.get(last)
}
