//! The nested value model carried in a log entry's context.
//!
//! Context values are trees of scalars, lists and ordered maps. A map can also
//! be shared through [`SharedMap`], which is the only way to build a graph that
//! contains itself; the sanitizer uses the shared map's address to detect
//! such cycles.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::error::Result;

/// A single context value.
#[derive(Debug, Clone)]
pub enum ContextValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<ContextValue>),
    Map(ContextMap),
    /// A map reachable from more than one place, possibly from itself.
    Shared(SharedMap),
    /// Content replaced by the sanitizer. Serializes as the mask token.
    Masked(String),
}

impl ContextValue {
    /// Convert any serializable value through its serde representation.
    ///
    /// This is how structs without a dedicated conversion enter a context:
    /// their serialized fields become map entries.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        Ok(serde_json::to_value(value)?.into())
    }

    pub fn is_container(&self) -> bool {
        matches!(
            self,
            ContextValue::List(_) | ContextValue::Map(_) | ContextValue::Shared(_)
        )
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ContextValue::String(s) | ContextValue::Masked(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&ContextMap> {
        match self {
            ContextValue::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a key when this value is a map.
    pub fn get(&self, key: &str) -> Option<&ContextValue> {
        self.as_map().and_then(|m| m.get(key))
    }
}

impl PartialEq for ContextValue {
    fn eq(&self, other: &Self) -> bool {
        use ContextValue::*;
        match (self, other) {
            (Null, Null) => true,
            (Bool(a), Bool(b)) => a == b,
            (Int(a), Int(b)) => a == b,
            (Float(a), Float(b)) => a == b,
            (String(a), String(b)) => a == b,
            (Masked(a), Masked(b)) => a == b,
            (List(a), List(b)) => a == b,
            (Map(a), Map(b)) => a == b,
            // Structural comparison could loop forever on a cycle.
            (Shared(a), Shared(b)) => a.identity() == b.identity(),
            _ => false,
        }
    }
}

impl From<&str> for ContextValue {
    fn from(value: &str) -> Self {
        ContextValue::String(value.to_string())
    }
}

impl From<String> for ContextValue {
    fn from(value: String) -> Self {
        ContextValue::String(value)
    }
}

impl From<bool> for ContextValue {
    fn from(value: bool) -> Self {
        ContextValue::Bool(value)
    }
}

impl From<i64> for ContextValue {
    fn from(value: i64) -> Self {
        ContextValue::Int(value)
    }
}

impl From<i32> for ContextValue {
    fn from(value: i32) -> Self {
        ContextValue::Int(value.into())
    }
}

impl From<f64> for ContextValue {
    fn from(value: f64) -> Self {
        ContextValue::Float(value)
    }
}

impl From<ContextMap> for ContextValue {
    fn from(value: ContextMap) -> Self {
        ContextValue::Map(value)
    }
}

impl From<SharedMap> for ContextValue {
    fn from(value: SharedMap) -> Self {
        ContextValue::Shared(value)
    }
}

impl<T: Into<ContextValue>> From<Vec<T>> for ContextValue {
    fn from(value: Vec<T>) -> Self {
        ContextValue::List(value.into_iter().map(Into::into).collect())
    }
}

impl From<serde_json::Value> for ContextValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => ContextValue::Null,
            Value::Bool(b) => ContextValue::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => ContextValue::Int(i),
                None => ContextValue::Float(n.as_f64().unwrap_or_default()),
            },
            Value::String(s) => ContextValue::String(s),
            Value::Array(items) => {
                ContextValue::List(items.into_iter().map(ContextValue::from).collect())
            }
            Value::Object(map) => ContextValue::Map(
                map.into_iter()
                    .map(|(k, v)| (k, ContextValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl Serialize for ContextValue {
    /// Shared maps serialize their current content, so a cyclic graph must be
    /// sanitized before it is serialized.
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            ContextValue::Null => serializer.serialize_unit(),
            ContextValue::Bool(b) => serializer.serialize_bool(*b),
            ContextValue::Int(i) => serializer.serialize_i64(*i),
            ContextValue::Float(f) => serializer.serialize_f64(*f),
            ContextValue::String(s) | ContextValue::Masked(s) => serializer.serialize_str(s),
            ContextValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            ContextValue::Map(map) => map.serialize(serializer),
            ContextValue::Shared(shared) => shared.borrow().serialize(serializer),
        }
    }
}

/// An insertion-ordered map with unique keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContextMap {
    entries: Vec<(String, ContextValue)>,
}

impl ContextMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, replacing (in place) any entry with the same key.
    /// Returns the replaced value.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<ContextValue>,
    ) -> Option<ContextValue> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ContextValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&ContextValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ContextValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl<K: Into<String>, V: Into<ContextValue>> FromIterator<(K, V)> for ContextMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = ContextMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl IntoIterator for ContextMap {
    type Item = (String, ContextValue);
    type IntoIter = std::vec::IntoIter<(String, ContextValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for ContextMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// A map with reference identity.
///
/// Cloning a `SharedMap` clones the handle, not the content. Inserting a
/// clone of a map into itself produces a cycle.
#[derive(Clone, Default)]
pub struct SharedMap(Rc<RefCell<ContextMap>>);

impl SharedMap {
    pub fn new(map: ContextMap) -> Self {
        Self(Rc::new(RefCell::new(map)))
    }

    pub fn insert(&self, key: impl Into<String>, value: impl Into<ContextValue>) {
        self.0.borrow_mut().insert(key, value);
    }

    pub fn borrow(&self) -> Ref<'_, ContextMap> {
        self.0.borrow()
    }

    /// Address of the underlying map; equal for every handle to the same map.
    pub fn identity(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }
}

impl std::fmt::Debug for SharedMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SharedMap({:#x})", self.identity())
    }
}
