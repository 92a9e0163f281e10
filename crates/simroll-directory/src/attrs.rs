//! Attribute values for directory add operations.
//!
//! A closed set of variants rather than an untyped map: text, ordered
//! sequences, nested maps, and passthrough scalars. The provisioning
//! sanitizer walks this shape recursively, and the LDAP client flattens
//! it to the string values the wire protocol expects.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    /// A text value.
    Text(String),
    /// An ordered sequence of values.
    Seq(Vec<AttrValue>),
    /// A nested mapping of values.
    Map(BTreeMap<String, AttrValue>),
    /// An integer value, rendered as its decimal string on the wire.
    Int(i64),
    /// A boolean value, rendered as "TRUE"/"FALSE" on the wire.
    Bool(bool),
}

impl AttrValue {
    /// Get the text content if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Flatten this value into the leaf strings submitted to the
    /// directory. Sequences contribute one string per element, maps one
    /// per leaf in key order.
    pub fn wire_values(&self) -> Vec<String> {
        match self {
            AttrValue::Text(s) => vec![s.clone()],
            AttrValue::Int(i) => vec![i.to_string()],
            AttrValue::Bool(b) => vec![if *b { "TRUE" } else { "FALSE" }.to_string()],
            AttrValue::Seq(items) => items.iter().flat_map(AttrValue::wire_values).collect(),
            AttrValue::Map(map) => map.values().flat_map(AttrValue::wire_values).collect(),
        }
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::Text(s)
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::Text(s.to_string())
    }
}

impl From<i64> for AttrValue {
    fn from(i: i64) -> Self {
        AttrValue::Int(i)
    }
}

impl From<bool> for AttrValue {
    fn from(b: bool) -> Self {
        AttrValue::Bool(b)
    }
}

impl From<Vec<String>> for AttrValue {
    fn from(items: Vec<String>) -> Self {
        AttrValue::Seq(items.into_iter().map(AttrValue::Text).collect())
    }
}

/// An ordered set of named attributes for an add operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attributes {
    #[serde(flatten)]
    attributes: BTreeMap<String, AttrValue>,
}

impl Attributes {
    /// Create a new empty attribute set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an attribute value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// Set an attribute using the builder pattern.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Get an attribute value.
    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.attributes.get(name)
    }

    /// Get a single-valued text attribute.
    pub fn get_text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(AttrValue::as_text)
    }

    /// Check if an attribute exists.
    pub fn has(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Iterate over all attributes in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &AttrValue)> {
        self.attributes.iter()
    }

    /// Consume the set, yielding owned pairs in name order.
    pub fn into_iter_pairs(self) -> impl Iterator<Item = (String, AttrValue)> {
        self.attributes.into_iter()
    }
}

impl FromIterator<(String, AttrValue)> for Attributes {
    fn from_iter<T: IntoIterator<Item = (String, AttrValue)>>(iter: T) -> Self {
        Self {
            attributes: iter.into_iter().collect(),
        }
    }
}
