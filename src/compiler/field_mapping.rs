//! Field mapping from selection categories to candidate record fields.
//!
//! Selections in the generic `options` category name no field of their own;
//! the field is looked up by group in an explicit table. Any other category
//! name is already the record's field name and resolves verbatim.

use crate::config::FilterConfig;
use crate::error::{FilterError, Result};
use crate::ir::{DemographicGroup, OPTIONS_CATEGORY};
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Groups whose `options` category maps onto a profile field of the same name.
pub const DEFAULT_OPTION_FIELDS: [&str; 5] = ["age_group", "gender", "race", "education", "income"];

/// Explicit `group -> field` table for `options` selections.
///
/// # Examples
///
/// ```rust
/// use demographic_filter::compiler::FieldMapping;
///
/// let mapping = FieldMapping::with_defaults();
/// assert_eq!(mapping.resolve("gender", "options").unwrap(), "gender");
/// assert_eq!(mapping.resolve("education", "degree").unwrap(), "degree");
/// assert!(mapping.resolve("religion", "options").is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMapping {
    option_fields: BTreeMap<String, String>,
}

impl FieldMapping {
    /// Create an empty mapping. Every `options` selection will be unmapped.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the built-in table for the standard profile demographics.
    pub fn with_defaults() -> Self {
        Self {
            option_fields: DEFAULT_OPTION_FIELDS
                .iter()
                .map(|g| (g.to_string(), g.to_string()))
                .collect(),
        }
    }

    /// Built-in table with the configuration's extra entries laid over it.
    pub fn from_config(config: &FilterConfig) -> Self {
        let mut mapping = Self::with_defaults();
        for (group, field) in &config.field_mappings {
            mapping.set_mapping(group.clone(), field.clone());
        }
        mapping
    }

    /// Add a mapping for a group not yet in the table.
    ///
    /// Re-adding the same `group -> field` pair is accepted; mapping a group
    /// to a different field is a [`FilterError::DuplicateMapping`].
    pub fn add_mapping(&mut self, group: impl Into<String>, field: impl Into<String>) -> Result<()> {
        let group = group.into();
        let field = field.into();
        match self.option_fields.get(&group) {
            Some(existing) if *existing != field => Err(FilterError::DuplicateMapping(group)),
            _ => {
                self.option_fields.insert(group, field);
                Ok(())
            }
        }
    }

    /// Insert or replace a mapping.
    pub fn set_mapping(&mut self, group: impl Into<String>, field: impl Into<String>) {
        self.option_fields.insert(group.into(), field.into());
    }

    pub fn has_mapping(&self, group: &str) -> bool {
        self.option_fields.contains_key(group)
    }

    pub fn mappings(&self) -> &BTreeMap<String, String> {
        &self.option_fields
    }

    /// Record field holding the value for `category` within `group`.
    pub fn resolve<'a>(&'a self, group: &str, category: &'a str) -> Result<Cow<'a, str>> {
        if category != OPTIONS_CATEGORY {
            return Ok(Cow::Borrowed(category));
        }
        self.option_fields
            .get(group)
            .map(|field| Cow::Borrowed(field.as_str()))
            .ok_or_else(|| FilterError::UnmappedField {
                group: group.to_string(),
                category: category.to_string(),
            })
    }

    /// Check that every reference group offering an `options` category can
    /// be resolved.
    pub fn validate(&self, groups: &[DemographicGroup]) -> Result<()> {
        for group in groups {
            if group.has_options_category() {
                self.resolve(&group.group, OPTIONS_CATEGORY)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_mapping() {
        let mapping = FieldMapping::new();
        assert!(mapping.mappings().is_empty());
        assert!(matches!(
            mapping.resolve("gender", "options"),
            Err(FilterError::UnmappedField { .. })
        ));
    }

    #[test]
    fn test_defaults_map_to_same_name() {
        let mapping = FieldMapping::with_defaults();
        for group in DEFAULT_OPTION_FIELDS {
            assert!(mapping.has_mapping(group));
            assert_eq!(mapping.resolve(group, "options").unwrap(), group);
        }
    }

    #[test]
    fn test_named_category_resolves_verbatim() {
        let mapping = FieldMapping::new();
        assert_eq!(mapping.resolve("anything", "zip_code").unwrap(), "zip_code");
    }

    #[test]
    fn test_unmapped_error_names_group() {
        let mapping = FieldMapping::with_defaults();
        match mapping.resolve("religion", "options") {
            Err(FilterError::UnmappedField { group, category }) => {
                assert_eq!(group, "religion");
                assert_eq!(category, "options");
            }
            other => panic!("Expected UnmappedField, got {other:?}"),
        }
    }

    #[test]
    fn test_add_mapping_rejects_conflict() {
        let mut mapping = FieldMapping::with_defaults();
        assert!(mapping.add_mapping("religion", "faith").is_ok());
        assert!(mapping.add_mapping("religion", "faith").is_ok());
        assert_eq!(
            mapping.add_mapping("gender", "sex"),
            Err(FilterError::DuplicateMapping("gender".to_string()))
        );
        assert_eq!(mapping.resolve("gender", "options").unwrap(), "gender");
    }

    #[test]
    fn test_from_config_overrides_defaults() {
        let config = FilterConfig::new()
            .with_field_mapping("gender", "gender_identity")
            .with_field_mapping("religion", "faith");
        let mapping = FieldMapping::from_config(&config);

        assert_eq!(mapping.resolve("gender", "options").unwrap(), "gender_identity");
        assert_eq!(mapping.resolve("religion", "options").unwrap(), "faith");
        assert_eq!(mapping.resolve("race", "options").unwrap(), "race");
    }

    #[test]
    fn test_validate_against_groups() {
        let mut gender = DemographicGroup::new("gender");
        gender.options.insert("options".to_string(), vec!["Female".to_string()]);
        let mut employment = DemographicGroup::new("employment");
        employment
            .options
            .insert("status".to_string(), vec!["Employed".to_string()]);

        let mapping = FieldMapping::with_defaults();
        assert!(mapping.validate(&[gender.clone(), employment]).is_ok());

        let mut religion = DemographicGroup::new("religion");
        religion.options.insert("options".to_string(), vec!["None".to_string()]);
        assert!(matches!(
            mapping.validate(&[gender, religion]),
            Err(FilterError::UnmappedField { .. })
        ));
    }
}
