//! Display helpers for the applied-filters summary.
//!
//! Labels are cosmetic only; matching always uses the raw names.

use super::{group, GroupedPredicate};
use crate::ir::{DemographicOption, OPTIONS_CATEGORY};
use regex::{Captures, Regex};
use std::fmt;
use std::sync::OnceLock;

fn word_start() -> &'static Regex {
    static WORD_START: OnceLock<Regex> = OnceLock::new();
    WORD_START.get_or_init(|| Regex::new(r"(?-u:\b\w)").expect("static pattern is valid"))
}

/// Replace underscores with spaces and upper-case the first character of
/// every word.
///
/// ```rust
/// use demographic_filter::compiler::format_label;
///
/// assert_eq!(format_label("age_group"), "Age Group");
/// assert_eq!(format_label("non-binary"), "Non-Binary");
/// ```
pub fn format_label(category: &str) -> String {
    let spaced = category.replace('_', " ");
    word_start()
        .replace_all(&spaced, |caps: &Captures| caps[0].to_ascii_uppercase())
        .into_owned()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySummary {
    pub label: String,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSummary {
    pub label: String,
    pub categories: Vec<CategorySummary>,
}

/// Human-readable form of a [`GroupedPredicate`].
///
/// `Display` joins groups and categories with `AND` and values with `OR`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSummary {
    pub groups: Vec<GroupSummary>,
}

impl FilterSummary {
    pub fn from_grouped(grouped: &GroupedPredicate) -> Self {
        let groups = grouped
            .groups()
            .iter()
            .map(|g| {
                let group_label = format_label(&g.group);
                let categories = g
                    .categories
                    .iter()
                    .map(|c| CategorySummary {
                        label: if c.category == OPTIONS_CATEGORY {
                            group_label.clone()
                        } else {
                            format!("{group_label} / {}", format_label(&c.category))
                        },
                        values: c.values.clone(),
                    })
                    .collect();
                GroupSummary {
                    label: group_label,
                    categories,
                }
            })
            .collect();
        Self { groups }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl fmt::Display for FilterSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (gi, group) in self.groups.iter().enumerate() {
            if gi > 0 {
                f.write_str(" AND ")?;
            }
            let wrap = group.categories.len() > 1;
            if wrap {
                f.write_str("(")?;
            }
            for (ci, category) in group.categories.iter().enumerate() {
                if ci > 0 {
                    f.write_str(" AND ")?;
                }
                write!(f, "{}: {}", category.label, category.values.join(" OR "))?;
            }
            if wrap {
                f.write_str(")")?;
            }
        }
        Ok(())
    }
}

/// Render the applied-filters summary for a selection list.
///
/// Returns an empty string when nothing is selected.
pub fn describe(selections: &[DemographicOption]) -> String {
    FilterSummary::from_grouped(&group(selections)).to_string()
}
