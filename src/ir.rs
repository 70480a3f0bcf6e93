//! Core data model shared by the selection store, compiler and matcher.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::HashMap;

/// Category name used when a demographic group has no sub-categories.
pub const OPTIONS_CATEGORY: &str = "options";

/// A single user selection: `value` within `category` within `group`.
///
/// Persisted filters name the group `demo`. That key is written when
/// serializing, and `group` is also accepted when reading.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DemographicOption {
    pub category: String,
    pub value: String,
    #[serde(rename = "demo", alias = "group")]
    pub group: String,
}

impl DemographicOption {
    pub fn new(
        category: impl Into<String>,
        value: impl Into<String>,
        group: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            value: value.into(),
            group: group.into(),
        }
    }

    /// Shorthand for a selection in the generic `options` category.
    pub fn option(group: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(OPTIONS_CATEGORY, value, group)
    }

    pub fn same_triple(&self, category: &str, value: &str, group: &str) -> bool {
        self.category == category && self.value == value && self.group == group
    }
}

/// Reference data for one demographic group.
///
/// Values per category are kept sorted and de-duplicated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemographicGroup {
    #[serde(alias = "demo")]
    pub group: String,
    pub options: BTreeMap<String, Vec<String>>,
}

impl DemographicGroup {
    pub fn new(group: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            options: BTreeMap::new(),
        }
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.options.keys().map(String::as_str)
    }

    pub fn values(&self, category: &str) -> &[String] {
        self.options
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn has_options_category(&self) -> bool {
        self.options.contains_key(OPTIONS_CATEGORY)
    }
}

/// A record tested against a filter, typically a user profile.
///
/// Fields map to nullable scalar strings. Empty strings are treated the same
/// as missing values by [`CandidateRecord::get`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateRecord {
    fields: HashMap<String, Option<String>>,
}

impl CandidateRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), Some(value.into()));
        self
    }

    pub fn with_null(mut self, name: impl Into<String>) -> Self {
        self.fields.insert(name.into(), None);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Option<String>) {
        self.fields.insert(name.into(), value);
    }

    /// Value of `field`, or `None` when absent, null or empty.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .get(field)
            .and_then(|v| v.as_deref())
            .filter(|v| !v.is_empty())
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Build a record from a JSON object.
    ///
    /// Strings are kept as-is, numbers and booleans use their textual form,
    /// arrays and objects become JSON text, and `null` is stored as absent.
    /// Non-object values yield an empty record.
    pub fn from_json(value: &serde_json::Value) -> Self {
        let mut record = Self::new();
        if let serde_json::Value::Object(map) = value {
            for (key, v) in map {
                record.insert(key.clone(), scalar_to_string(v));
            }
        }
        record
    }
}

impl<K, V> FromIterator<(K, V)> for CandidateRecord
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), Some(v.into())))
                .collect(),
        }
    }
}

pub(crate) fn scalar_to_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}
