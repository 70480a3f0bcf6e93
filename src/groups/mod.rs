//! Reference demographic groups.
//!
//! Groups arrive as rows of `(demo, demo_options)` from an external table.
//! The options payload is loosely typed, so it is coerced here:
//! - a JSON array becomes a single `options` category
//! - a JSON object becomes one category per key
//! - a JSON string is parsed as JSON first
//! - anything else contributes no categories
//!
//! Values are stringified, de-duplicated and sorted per category.
//! [`GroupCatalog`] fetches rows through a [`GroupSource`] and keeps the
//! result in a [`GroupCache`] with a time-to-live.

pub mod cache;
pub mod catalog;

pub use cache::{CacheStats, Clock, GroupCache, ManualClock, SystemClock};
pub use catalog::{GroupCatalog, GroupSource};

use crate::ir::{DemographicGroup, OPTIONS_CATEGORY};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

/// One raw row of the reference table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupRow {
    pub demo: Option<String>,
    pub demo_options: Option<Value>,
}

impl GroupRow {
    pub fn new(demo: impl Into<String>, demo_options: Value) -> Self {
        Self {
            demo: Some(demo.into()),
            demo_options: Some(demo_options),
        }
    }
}

fn option_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Coerce an options payload into `category -> sorted values`.
///
/// Returns `None` when a string payload is not valid JSON.
pub fn parse_options(payload: &Value) -> Option<BTreeMap<String, Vec<String>>> {
    let mut categories: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

    match payload {
        Value::String(raw) => {
            let parsed: Value = match serde_json::from_str(raw) {
                Ok(parsed) => parsed,
                Err(err) => {
                    warn!(error = %err, "options payload is not valid JSON");
                    return None;
                }
            };
            // A string that parses to another string is not unwrapped again.
            if parsed.is_string() {
                return Some(BTreeMap::new());
            }
            return parse_options(&parsed);
        }
        Value::Array(items) => {
            let bucket = categories.entry(OPTIONS_CATEGORY.to_string()).or_default();
            bucket.extend(items.iter().map(option_text));
        }
        Value::Object(map) => {
            for (category, values) in map {
                let bucket = categories.entry(category.clone()).or_default();
                match values {
                    Value::Array(items) => bucket.extend(items.iter().map(option_text)),
                    other if is_truthy(other) => {
                        bucket.insert(option_text(other));
                    }
                    _ => {}
                }
            }
        }
        _ => {}
    }

    Some(
        categories
            .into_iter()
            .map(|(category, values)| (category, values.into_iter().collect()))
            .collect(),
    )
}

/// Turn raw rows into groups, skipping rows without a name or payload.
pub fn process_rows(rows: &[GroupRow]) -> Vec<DemographicGroup> {
    let mut groups = Vec::with_capacity(rows.len());
    for row in rows {
        let (Some(demo), Some(payload)) = (row.demo.as_deref(), row.demo_options.as_ref()) else {
            continue;
        };
        if demo.is_empty() || !is_truthy(payload) {
            continue;
        }
        match parse_options(payload) {
            Some(options) => groups.push(DemographicGroup {
                group: demo.to_string(),
                options,
            }),
            None => warn!(group = demo, "skipping group with malformed options"),
        }
    }
    groups
}
