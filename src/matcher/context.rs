//! Field access for candidate records.

use crate::ir::{scalar_to_string, CandidateRecord};
use std::borrow::Cow;
use std::collections::HashMap;

/// Anything the matcher can look fields up on.
///
/// Implementations return `None` for absent, null or empty values; the
/// matcher treats all three as "no value".
pub trait Candidate {
    fn field(&self, name: &str) -> Option<Cow<'_, str>>;
}

impl Candidate for CandidateRecord {
    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name).map(Cow::Borrowed)
    }
}

/// JSON objects, e.g. profile rows returned by the data store.
impl Candidate for serde_json::Value {
    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        match self.get(name)? {
            serde_json::Value::String(s) if s.is_empty() => None,
            serde_json::Value::String(s) => Some(Cow::Borrowed(s.as_str())),
            other => scalar_to_string(other).map(Cow::Owned),
        }
    }
}

impl Candidate for HashMap<String, String> {
    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name)
            .filter(|v| !v.is_empty())
            .map(|v| Cow::Borrowed(v.as_str()))
    }
}

impl Candidate for HashMap<String, Option<String>> {
    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name)
            .and_then(|v| v.as_deref())
            .filter(|v| !v.is_empty())
            .map(Cow::Borrowed)
    }
}

impl<T: Candidate + ?Sized> Candidate for &T {
    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        (**self).field(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_candidate() {
        let record = CandidateRecord::new()
            .with_field("gender", "Female")
            .with_field("race", "");
        assert_eq!(record.field("gender").as_deref(), Some("Female"));
        assert_eq!(record.field("race"), None);
        assert_eq!(record.field("income"), None);
    }

    #[test]
    fn test_json_candidate() {
        let profile = json!({
            "gender": "Male",
            "age_group": "",
            "household_size": 4,
            "income": null
        });
        assert_eq!(profile.field("gender").as_deref(), Some("Male"));
        assert_eq!(profile.field("age_group"), None);
        assert_eq!(profile.field("household_size").as_deref(), Some("4"));
        assert_eq!(profile.field("income"), None);
        assert_eq!(profile.field("race"), None);
    }

    #[test]
    fn test_json_non_object_has_no_fields() {
        assert_eq!(json!("gender").field("gender"), None);
    }

    #[test]
    fn test_hashmap_candidates() {
        let mut plain = HashMap::new();
        plain.insert("race".to_string(), "Asian".to_string());
        assert_eq!(plain.field("race").as_deref(), Some("Asian"));

        let mut nullable: HashMap<String, Option<String>> = HashMap::new();
        nullable.insert("race".to_string(), None);
        assert_eq!(nullable.field("race"), None);
    }
}
