//! Resource handles.
//!
//! Each handle wraps the JSON object GitHub returned plus a reference to the
//! transport for follow-up calls. Arbitrary keys are reachable through
//! `get(name)`; known keys have typed accessors, and nested objects
//! (`owner`, `parent`, `author`, ...) are turned into handles on access.

pub mod commits;
pub mod contents;
pub mod repos;
pub mod users;

use serde_json::Value;

// Re-exports
pub use commits::Commit;
pub use contents::{Content, Contents};
pub use repos::{IntoRepoRef, RepoRef, Repository};
pub use users::User;

fn str_field<'a>(fields: &'a Value, name: &str) -> Option<&'a str> {
    fields.get(name).and_then(Value::as_str)
}

fn u64_field(fields: &Value, name: &str) -> Option<u64> {
    fields.get(name).and_then(Value::as_u64)
}

fn bool_field(fields: &Value, name: &str) -> Option<bool> {
    fields.get(name).and_then(Value::as_bool)
}

/// A nested object, skipping `null`.
fn object_field(fields: &Value, name: &str) -> Option<Value> {
    fields.get(name).filter(|v| v.is_object()).cloned()
}
