//! Settings import: strict JSON parsing plus a guarded deep merge.
//!
//! Imported documents are data only. They are parsed as JSON (never
//! evaluated), bounded in size and nesting, and merged into the default
//! settings without accepting object keys that alter prototypes in
//! JavaScript consumers of the merged result.

use serde_json::{Map, Value, json};

/// Maximum import document size, in bytes.
pub const IMPORT_MAX_BYTES: usize = 64 * 1024;
/// Maximum nesting depth of arrays and objects.
pub const IMPORT_MAX_DEPTH: usize = 32;
/// Keys refused at any depth.
pub const FORBIDDEN_KEYS: [&str; 3] = ["__proto__", "constructor", "prototype"];

/// Reasons an import document is refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImportError {
    #[error("data must be at most {max} bytes")]
    TooLarge { max: usize },
    #[error("data must be a valid JSON document")]
    Malformed,
    #[error("data must be nested at most {max} levels deep")]
    TooDeep { max: usize },
    #[error("data must be a JSON object")]
    NotAnObject,
    #[error("data must not contain the key `{key}`")]
    ForbiddenKey { key: String },
}

/// Settings every import starts from.
pub fn default_import_settings() -> Value {
    json!({
        "format": "json",
        "overwrite": false,
        "tags": [],
    })
}

/// Parse `raw` and merge it over `defaults`.
///
/// # Examples
/// ```
/// use bastion::domain::import_merge::{merge_import, default_import_settings};
///
/// let merged = merge_import(&default_import_settings(), r#"{"overwrite": true}"#).unwrap();
/// assert_eq!(merged["overwrite"], true);
/// assert_eq!(merged["format"], "json");
///
/// assert!(merge_import(&default_import_settings(), "process.exit()").is_err());
/// ```
pub fn merge_import(defaults: &Value, raw: &str) -> Result<Value, ImportError> {
    if raw.len() > IMPORT_MAX_BYTES {
        return Err(ImportError::TooLarge {
            max: IMPORT_MAX_BYTES,
        });
    }
    let incoming: Value = serde_json::from_str(raw).map_err(|_| ImportError::Malformed)?;
    if depth(&incoming) > IMPORT_MAX_DEPTH {
        return Err(ImportError::TooDeep {
            max: IMPORT_MAX_DEPTH,
        });
    }
    let Value::Object(incoming) = incoming else {
        return Err(ImportError::NotAnObject);
    };
    reject_forbidden_keys(&incoming)?;

    let mut merged = match defaults {
        Value::Object(map) => map.clone(),
        _ => Map::new(),
    };
    merge_into(&mut merged, incoming);
    Ok(Value::Object(merged))
}

fn depth(value: &Value) -> usize {
    match value {
        Value::Array(items) => 1 + items.iter().map(depth).max().unwrap_or(0),
        Value::Object(map) => 1 + map.values().map(depth).max().unwrap_or(0),
        _ => 0,
    }
}

fn reject_forbidden_keys(map: &Map<String, Value>) -> Result<(), ImportError> {
    for (key, value) in map {
        if FORBIDDEN_KEYS.contains(&key.as_str()) {
            return Err(ImportError::ForbiddenKey { key: key.clone() });
        }
        visit_children(value)?;
    }
    Ok(())
}

fn visit_children(value: &Value) -> Result<(), ImportError> {
    match value {
        Value::Object(map) => reject_forbidden_keys(map),
        Value::Array(items) => items.iter().try_for_each(visit_children),
        _ => Ok(()),
    }
}

fn merge_into(target: &mut Map<String, Value>, source: Map<String, Value>) {
    for (key, value) in source {
        match value {
            Value::Object(nested) => match target.get_mut(&key) {
                Some(Value::Object(existing)) => merge_into(existing, nested),
                _ => {
                    target.insert(key, Value::Object(nested));
                }
            },
            other => {
                target.insert(key, other);
            }
        }
    }
}
