//! Builder turning selection lists into [`CompiledFilter`]s.

use crate::compiler::{group, FieldMapping};
use crate::config::FilterConfig;
use crate::error::Result;
use crate::ir::{DemographicGroup, DemographicOption};
use crate::matcher::{CompiledCategory, CompiledFilter, CompiledGroup, MatchStrategy};
use tracing::debug;

/// Builder for compiled filters.
///
/// Holds the field mapping and the set of categories compared exactly. Field
/// names are resolved once at compile time, so an `options` selection in a
/// group without a mapping fails here rather than silently matching nothing.
///
/// # Example
/// ```rust
/// use demographic_filter::{CandidateRecord, DemographicOption, MatcherBuilder};
///
/// let filter = MatcherBuilder::new()
///     .compile(&[DemographicOption::option("gender", "Female")])
///     .unwrap();
///
/// let profile = CandidateRecord::new().with_field("gender", "Female, Non-binary");
/// assert!(filter.matches(&profile));
/// ```
#[derive(Debug, Clone)]
pub struct MatcherBuilder {
    field_mapping: FieldMapping,
    exact_categories: Vec<String>,
}

impl MatcherBuilder {
    /// Builder with the default field table and `age_group` compared exactly.
    pub fn new() -> Self {
        Self::from_config(&FilterConfig::default())
    }

    pub fn from_config(config: &FilterConfig) -> Self {
        Self {
            field_mapping: FieldMapping::from_config(config),
            exact_categories: config.exact_match_categories.clone(),
        }
    }

    pub fn with_field_mapping(mut self, field_mapping: FieldMapping) -> Self {
        self.field_mapping = field_mapping;
        self
    }

    /// Compare `category` with exact equality instead of substring matching.
    pub fn exact_match_category(mut self, category: impl Into<String>) -> Self {
        let category = category.into();
        if !self.exact_categories.contains(&category) {
            self.exact_categories.push(category);
        }
        self
    }

    pub fn field_mapping(&self) -> &FieldMapping {
        &self.field_mapping
    }

    /// Strategy for a raw category name.
    pub fn strategy_for(&self, category: &str) -> MatchStrategy {
        if self.exact_categories.iter().any(|c| c == category) {
            MatchStrategy::Exact
        } else {
            MatchStrategy::BidirectionalContains
        }
    }

    /// Check the field mapping covers every reference group.
    pub fn validate_groups(&self, groups: &[DemographicGroup]) -> Result<()> {
        self.field_mapping.validate(groups)
    }

    /// Compile a selection list. An empty list compiles to a match-all filter.
    pub fn compile(&self, selections: &[DemographicOption]) -> Result<CompiledFilter> {
        let grouped = group(selections);
        let mut groups = Vec::with_capacity(grouped.group_count());

        for g in grouped.groups() {
            let mut categories = Vec::with_capacity(g.categories.len());
            for c in &g.categories {
                let field = self.field_mapping.resolve(&g.group, &c.category)?;
                categories.push(CompiledCategory::new(
                    c.category.clone(),
                    field.into_owned(),
                    self.strategy_for(&c.category),
                    c.values.clone(),
                ));
            }
            groups.push(CompiledGroup {
                group: g.group.clone(),
                categories,
            });
        }

        debug!(
            selections = selections.len(),
            groups = groups.len(),
            "compiled demographic filter"
        );
        Ok(CompiledFilter::new(groups))
    }
}

impl Default for MatcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FilterError;

    #[test]
    fn test_compile_empty_is_match_all() {
        let filter = MatcherBuilder::new().compile(&[]).unwrap();
        assert!(filter.is_empty());
        assert_eq!(filter, CompiledFilter::match_all());
    }

    #[test]
    fn test_compile_resolves_option_fields() {
        let filter = MatcherBuilder::new()
            .compile(&[
                DemographicOption::option("age_group", "18-24"),
                DemographicOption::new("degree", "BA", "education"),
            ])
            .unwrap();

        assert_eq!(filter.groups().len(), 2);
        let age = &filter.groups()[0].categories[0];
        assert_eq!(age.category, "options");
        assert_eq!(age.field, "age_group");
        let degree = &filter.groups()[1].categories[0];
        assert_eq!(degree.field, "degree");
    }

    #[test]
    fn test_strategy_keyed_on_raw_category() {
        let builder = MatcherBuilder::new();
        assert_eq!(builder.strategy_for("age_group"), MatchStrategy::Exact);
        assert_eq!(
            builder.strategy_for("options"),
            MatchStrategy::BidirectionalContains
        );

        let builder = builder.exact_match_category("options");
        assert_eq!(builder.strategy_for("options"), MatchStrategy::Exact);
    }

    #[test]
    fn test_compile_unmapped_group_fails() {
        let result = MatcherBuilder::new().compile(&[DemographicOption::option("religion", "None")]);
        assert!(matches!(result, Err(FilterError::UnmappedField { .. })));
    }

    #[test]
    fn test_custom_field_mapping() {
        let mut mapping = FieldMapping::with_defaults();
        mapping.set_mapping("religion", "faith");
        let filter = MatcherBuilder::new()
            .with_field_mapping(mapping)
            .compile(&[DemographicOption::option("religion", "None")])
            .unwrap();
        assert_eq!(filter.groups()[0].categories[0].field, "faith");
    }

    #[test]
    fn test_from_config() {
        let config = FilterConfig::new()
            .with_field_mapping("gender", "gender_identity")
            .with_exact_match_category("income");
        let builder = MatcherBuilder::from_config(&config);
        assert_eq!(builder.strategy_for("income"), MatchStrategy::Exact);
        assert!(builder.field_mapping().has_mapping("gender"));
        let filter = builder
            .compile(&[DemographicOption::option("gender", "Female")])
            .unwrap();
        assert_eq!(filter.groups()[0].categories[0].field, "gender_identity");
    }
}
