use std::collections::HashSet;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::context::{ContextMap, ContextValue};
use crate::error::ValidationError;
use crate::normalize;
use crate::sanitize::{CIRCULAR_REFERENCE_MARKER, DEPTH_LIMIT_MARKER};

use super::ValidationRules;

/// A validated context value: either a string or a nested context.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ContextField {
    Text(String),
    Nested(ValidatedContext),
}

impl ContextField {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContextField::Text(s) => Some(s),
            ContextField::Nested(_) => None,
        }
    }
}

impl From<&str> for ContextField {
    fn from(value: &str) -> Self {
        ContextField::Text(value.to_string())
    }
}

/// Context that passed validation: cleaned, unique keys mapped to strings or
/// nested contexts, in input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedContext {
    entries: Vec<(String, ContextField)>,
}

impl ValidatedContext {
    pub fn get(&self, key: &str) -> Option<&ContextField> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ContextField)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<ContextField>> FromIterator<(K, V)> for ValidatedContext {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl Serialize for ValidatedContext {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Validate a (sanitized) context.
///
/// Keys are trimmed and lowercased; two keys that clean to the same string
/// are a [`ValidationError::DuplicateKey`]. Scalars are coerced to strings.
/// Errors carry the dotted key path, never the offending value.
pub fn validate_context(
    value: &ContextValue,
    rules: &ValidationRules,
) -> Result<ValidatedContext, ValidationError> {
    let mut walk = ContextWalk {
        rules,
        on_stack: HashSet::new(),
    };
    match value {
        ContextValue::Map(_) | ContextValue::List(_) | ContextValue::Shared(_) => {
            walk.container(value, "")
        }
        _ => Err(ValidationError::ContextNotMapping),
    }
}

struct ContextWalk<'a> {
    rules: &'a ValidationRules,
    on_stack: HashSet<usize>,
}

impl ContextWalk<'_> {
    fn container(
        &mut self,
        value: &ContextValue,
        path: &str,
    ) -> Result<ValidatedContext, ValidationError> {
        match value {
            ContextValue::Map(map) => self.map(map, path),
            ContextValue::List(items) => {
                let mut entries = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    let key = index.to_string();
                    let field = self.field(item, &join(path, &key))?;
                    entries.push((key, field));
                }
                Ok(ValidatedContext { entries })
            }
            ContextValue::Shared(shared) => {
                // Unsanitized input can still contain a cycle.
                let id = shared.identity();
                if !self.on_stack.insert(id) {
                    return Err(ValidationError::CircularReference {
                        path: display_path(path),
                    });
                }
                let result = self.map(&shared.borrow(), path);
                self.on_stack.remove(&id);
                result
            }
            _ => Err(ValidationError::ContextNotMapping),
        }
    }

    fn map(&mut self, map: &ContextMap, path: &str) -> Result<ValidatedContext, ValidationError> {
        let mut seen: HashSet<String> = HashSet::with_capacity(map.len());
        let mut entries = Vec::with_capacity(map.len());

        for (position, (raw_key, value)) in map.iter().enumerate() {
            let key = self.key(raw_key, path, position)?;
            let key_path = join(path, &key);
            if !seen.insert(key.clone()) {
                return Err(ValidationError::DuplicateKey { path: key_path });
            }
            let field = self.field(value, &key_path)?;
            entries.push((key, field));
        }
        Ok(ValidatedContext { entries })
    }

    /// Clean a key. Invalid keys are reported by position, since the key text
    /// itself may be what is wrong with it.
    fn key(&self, raw: &str, path: &str, position: usize) -> Result<String, ValidationError> {
        // Sentinel keys keep their upper-case spelling.
        if raw == DEPTH_LIMIT_MARKER || raw == CIRCULAR_REFERENCE_MARKER {
            return Ok(raw.to_string());
        }
        let key = normalize::fold_key(raw);
        let at = || join(path, &format!("#{position}"));
        if key.is_empty() {
            return Err(ValidationError::EmptyKey { path: at() });
        }
        if self.rules.forbidden_chars.is_match(&key) {
            return Err(ValidationError::KeyForbiddenCharacters { path: at() });
        }
        if normalize::char_len(&key) > self.rules.max_context_key_length {
            return Err(ValidationError::KeyTooLong {
                path: at(),
                max: self.rules.max_context_key_length,
            });
        }
        Ok(key)
    }

    fn field(&mut self, value: &ContextValue, path: &str) -> Result<ContextField, ValidationError> {
        let text = match value {
            ContextValue::Map(_) | ContextValue::List(_) | ContextValue::Shared(_) => {
                return Ok(ContextField::Nested(self.container(value, path)?));
            }
            ContextValue::Null => "null".to_string(),
            // `false` and `0` are meaningful values, never "empty".
            ContextValue::Bool(b) => b.to_string(),
            ContextValue::Int(i) => i.to_string(),
            ContextValue::Float(f) => f.to_string(),
            ContextValue::String(s) | ContextValue::Masked(s) => s.clone(),
        };
        self.text(&text, path).map(ContextField::Text)
    }

    fn text(&self, raw: &str, path: &str) -> Result<String, ValidationError> {
        let value = normalize::clean(raw);
        if value.is_empty() {
            return Err(ValidationError::EmptyValue {
                path: display_path(path),
            });
        }
        if self.rules.forbidden_chars.is_match(value) {
            return Err(ValidationError::ValueForbiddenCharacters {
                path: display_path(path),
            });
        }
        if normalize::char_len(value) > self.rules.max_context_value_length {
            return Err(ValidationError::ValueTooLong {
                path: display_path(path),
                max: self.rules.max_context_value_length,
            });
        }
        Ok(value.to_string())
    }
}

fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

fn display_path(path: &str) -> String {
    if path.is_empty() {
        "(root)".to_string()
    } else {
        path.to_string()
    }
}
