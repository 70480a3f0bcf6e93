//! Predicate compilation for demographic selections.
//!
//! The flat selection list is grouped into a [`GroupedPredicate`]: one clause
//! per demographic group, one clause per category within a group, and the
//! selected values of each category. Groups and categories are combined with
//! AND, values within a category with OR.
//!
//! The grouped form feeds three consumers:
//! - [`crate::matcher::MatcherBuilder`] resolves fields and builds a
//!   [`crate::matcher::CompiledFilter`] for in-memory evaluation
//! - [`label::FilterSummary`] renders the applied-filters summary
//! - [`query::build_query`] produces a parameterised SQL restriction

pub mod field_mapping;
pub mod label;
pub mod query;

pub use field_mapping::FieldMapping;
pub use label::{describe, format_label, FilterSummary};
pub use query::{build_query, FilterQuery};

use crate::ir::DemographicOption;

/// Selected values of one category, in selection order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryClause {
    pub category: String,
    pub values: Vec<String>,
}

/// Categories of one demographic group, in order of first appearance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupClause {
    pub group: String,
    pub categories: Vec<CategoryClause>,
}

impl GroupClause {
    pub fn category(&self, category: &str) -> Option<&CategoryClause> {
        self.categories.iter().find(|c| c.category == category)
    }
}

/// Selections grouped by group, then category.
///
/// Always rebuilt from the flat list; never edited in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupedPredicate {
    groups: Vec<GroupClause>,
}

impl GroupedPredicate {
    pub fn groups(&self) -> &[GroupClause] {
        &self.groups
    }

    pub fn group(&self, group: &str) -> Option<&GroupClause> {
        self.groups.iter().find(|g| g.group == group)
    }

    /// Selected values for `(group, category)`.
    pub fn values(&self, group: &str, category: &str) -> Option<&[String]> {
        self.group(group)
            .and_then(|g| g.category(category))
            .map(|c| c.values.as_slice())
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }
}

/// Group a flat selection list by group and category.
///
/// Buckets are created on first encounter and values appended in list order.
pub fn group(selections: &[DemographicOption]) -> GroupedPredicate {
    let mut groups: Vec<GroupClause> = Vec::new();

    for selection in selections {
        let group_idx = match groups.iter().position(|g| g.group == selection.group) {
            Some(idx) => idx,
            None => {
                groups.push(GroupClause {
                    group: selection.group.clone(),
                    categories: Vec::new(),
                });
                groups.len() - 1
            }
        };

        let categories = &mut groups[group_idx].categories;
        match categories
            .iter_mut()
            .find(|c| c.category == selection.category)
        {
            Some(clause) => clause.values.push(selection.value.clone()),
            None => categories.push(CategoryClause {
                category: selection.category.clone(),
                values: vec![selection.value.clone()],
            }),
        }
    }

    GroupedPredicate { groups }
}
