//! Tagged value tree for decoded content
//!
//! A [`Value`] is a primitive, an ordered array, an insertion-ordered field
//! mapping, or a tagged composite that pairs a [`TypeTag`] with a payload.
//! Tagged composites are an explicit variant; the `{type, data}` object shape
//! only exists at the text boundary (see [`text`]).

pub mod text;


use std::fmt;

pub use text::{parse, stringify};

/// Type name carried by a tagged composite
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeTag {
    /// Raster texture whose pixels are moved to a PNG sidecar
    Texture2D,
    /// Any other reader type, carried through unchanged
    Other(String),
}

impl TypeTag {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Texture2D => "Texture2D",
            Self::Other(name) => name,
        }
    }
}

impl From<&str> for TypeTag {
    fn from(name: &str) -> Self {
        match name {
            "Texture2D" => Self::Texture2D,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for TypeTag {
    fn from(name: String) -> Self {
        match name.as_str() {
            "Texture2D" => Self::Texture2D,
            _ => Self::Other(name),
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node of the content tree
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Array(Vec<Value>),
    Map(Fields),
    Tagged { tag: TypeTag, payload: Box<Value> },
}

impl Value {
    pub fn tagged(tag: impl Into<TypeTag>, payload: Value) -> Self {
        Self::Tagged {
            tag: tag.into(),
            payload: Box::new(payload),
        }
    }

    /// Strip every tagged-composite layer around this node
    pub fn untagged(&self) -> &Value {
        let mut node = self;
        while let Value::Tagged { payload, .. } = node {
            node = payload;
        }
        node
    }

    pub fn untagged_mut(&mut self) -> &mut Value {
        match self {
            Value::Tagged { payload, .. } => payload.untagged_mut(),
            node => node,
        }
    }

    pub fn tag(&self) -> Option<&TypeTag> {
        match self {
            Value::Tagged { tag, .. } => Some(tag),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Fields> {
        match self {
            Value::Map(fields) => Some(fields),
            _ => None,
        }
    }

    pub fn as_map_mut(&mut self) -> Option<&mut Fields> {
        match self {
            Value::Map(fields) => Some(fields),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// True iff `value` is a tagged composite
pub fn is_tagged(value: &Value) -> bool {
    matches!(value, Value::Tagged { .. })
}

/// Field mapping with unique keys, kept in insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields {
    entries: Vec<(String, Value)>,
}

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Set `key`, replacing in place when present, appending otherwise.
    /// Returns the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        let key = key.into();
        match self.position(&key) {
            Some(i) => Some(std::mem::replace(&mut self.entries[i].1, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Position of `key` in insertion order
    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.position(key)
    }

    /// Set `key` at `index` (clamped to the end) when absent, or replace its
    /// value in place when present. Returns the previous value.
    pub fn insert_at(
        &mut self,
        index: usize,
        key: impl Into<String>,
        value: Value,
    ) -> Option<Value> {
        let key = key.into();
        match self.position(&key) {
            Some(i) => Some(std::mem::replace(&mut self.entries[i].1, value)),
            None => {
                let index = index.min(self.entries.len());
                self.entries.insert(index, (key, value));
                None
            }
        }
    }

    /// Remove `key`, keeping the order of the remaining fields
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let i = self.position(key)?;
        Some(self.entries.remove(i).1)
    }

    /// Swap the entry `old_key` for `new_key = value` at the same position.
    ///
    /// Returns the old value, or `None` (and changes nothing) if `old_key` is
    /// absent. Any other entry already named `new_key` is dropped.
    pub fn replace_entry(
        &mut self,
        old_key: &str,
        new_key: impl Into<String>,
        value: Value,
    ) -> Option<Value> {
        let i = self.position(old_key)?;
        let new_key = new_key.into();
        let old = std::mem::replace(&mut self.entries[i], (new_key.clone(), value)).1;
        let mut index = 0;
        self.entries.retain(|(k, _)| {
            let keep = index == i || *k != new_key;
            index += 1;
            keep
        });
        Some(old)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut Value)> {
        self.entries.iter_mut().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Fields {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut fields = Fields::new();
        for (k, v) in iter {
            fields.insert(k, v);
        }
        fields
    }
}

impl IntoIterator for Fields {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
