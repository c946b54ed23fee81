//! Field-by-field JSON validation
//!
//! Request bodies are checked against their schema before being
//! deserialized, so every rejected field yields its own message instead of
//! the first serde error.

use crate::error::{BridgeError, BridgeResult};
use serde_json::{Map, Value};

/// Collects one message per rejected field
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<String>,
}

impl Validator {
    /// Create an empty validator
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure for `path`
    pub fn reject(&mut self, path: &str, message: impl AsRef<str>) {
        self.errors.push(format!("{} {}", path, message.as_ref()));
    }

    /// Require `value` to be a JSON object
    pub fn object<'a>(&mut self, value: &'a Value, path: &str) -> Option<&'a Map<String, Value>> {
        match value.as_object() {
            Some(map) => Some(map),
            None => {
                self.reject(path, "must be an object");
                None
            }
        }
    }

    /// Require `field` to be present and a non-empty (after trim) string
    pub fn non_empty_string<'a>(
        &mut self,
        object: &'a Map<String, Value>,
        field: &str,
        path: &str,
    ) -> Option<&'a str> {
        let full = join(path, field);
        match object.get(field) {
            None | Some(Value::Null) => {
                self.reject(&full, "is required");
                None
            }
            Some(Value::String(s)) if s.trim().is_empty() => {
                self.reject(&full, "must not be empty");
                None
            }
            Some(Value::String(s)) => Some(s.as_str()),
            Some(_) => {
                self.reject(&full, "must be a string");
                None
            }
        }
    }

    /// Allow `field` to be absent or null, otherwise require a string
    pub fn optional_string<'a>(
        &mut self,
        object: &'a Map<String, Value>,
        field: &str,
        path: &str,
    ) -> Option<&'a str> {
        match object.get(field) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.as_str()),
            Some(_) => {
                self.reject(&join(path, field), "must be a string");
                None
            }
        }
    }

    /// Require `field` to be one of `allowed`
    pub fn one_of<'a>(
        &mut self,
        object: &'a Map<String, Value>,
        field: &str,
        path: &str,
        allowed: &[&str],
    ) -> Option<&'a str> {
        let value = self.non_empty_string(object, field, path)?;
        if allowed.contains(&value) {
            Some(value)
        } else {
            self.reject(
                &join(path, field),
                format!("must be one of: {} (got \"{}\")", allowed.join(", "), value),
            );
            None
        }
    }

    /// Require `field` to be an array
    pub fn array<'a>(
        &mut self,
        object: &'a Map<String, Value>,
        field: &str,
        path: &str,
    ) -> Option<&'a Vec<Value>> {
        match object.get(field) {
            Some(Value::Array(items)) => Some(items),
            None | Some(Value::Null) => {
                self.reject(&join(path, field), "is required");
                None
            }
            Some(_) => {
                self.reject(&join(path, field), "must be an array");
                None
            }
        }
    }

    /// Allow `field` to be absent or null, otherwise require an object
    pub fn optional_object<'a>(
        &mut self,
        object: &'a Map<String, Value>,
        field: &str,
        path: &str,
    ) -> Option<&'a Map<String, Value>> {
        match object.get(field) {
            None | Some(Value::Null) => None,
            Some(Value::Object(map)) => Some(map),
            Some(_) => {
                self.reject(&join(path, field), "must be an object");
                None
            }
        }
    }

    /// Whether nothing has been rejected so far
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Finish validation
    pub fn finish(self) -> BridgeResult<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(BridgeError::validation_errors(self.errors))
        }
    }
}

fn join(path: &str, field: &str) -> String {
    if path.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", path, field)
    }
}
