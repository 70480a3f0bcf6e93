//! The user's current demographic selections.
//!
//! [`SelectionStore`] owns an ordered list of [`DemographicOption`]s with no
//! duplicate `(category, value, group)` triple, optionally capped at a
//! maximum number of entries.

use crate::config::FilterConfig;
use crate::ir::DemographicOption;
use tracing::debug;

/// Result of [`SelectionStore::toggle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The triple was appended.
    Added,
    /// The triple was already selected and has been removed.
    Removed,
    /// The triple was not selected and the store is full. Nothing changed.
    RejectedAtCap { limit: usize },
}

impl ToggleOutcome {
    pub fn is_rejected(self) -> bool {
        matches!(self, ToggleOutcome::RejectedAtCap { .. })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionStore {
    selections: Vec<DemographicOption>,
    max_selections: Option<usize>,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store capped at `max_selections`. A cap of zero means no cap.
    pub fn with_max_selections(max_selections: Option<usize>) -> Self {
        Self {
            selections: Vec::new(),
            max_selections: max_selections.filter(|&limit| limit > 0),
        }
    }

    pub fn from_config(config: &FilterConfig) -> Self {
        Self::with_max_selections(config.max_selections)
    }

    /// Select the triple if it is not selected, otherwise deselect it.
    ///
    /// Removal is always allowed. Adding when the store already holds
    /// `max_selections` entries leaves it unchanged.
    pub fn toggle(&mut self, category: &str, value: &str, group: &str) -> ToggleOutcome {
        if let Some(pos) = self
            .selections
            .iter()
            .position(|s| s.same_triple(category, value, group))
        {
            self.selections.remove(pos);
            return ToggleOutcome::Removed;
        }

        if let Some(limit) = self.max_selections {
            if self.selections.len() >= limit {
                debug!(group, category, value, limit, "selection rejected at cap");
                return ToggleOutcome::RejectedAtCap { limit };
            }
        }

        self.selections
            .push(DemographicOption::new(category, value, group));
        ToggleOutcome::Added
    }

    pub fn clear(&mut self) {
        self.selections.clear();
    }

    /// Whether any entry, in any group, has this category and value.
    ///
    /// Group-agnostic: a value selected under one group also reports as
    /// selected when a different group renders the same category/value pair.
    pub fn is_selected(&self, category: &str, value: &str) -> bool {
        self.selections
            .iter()
            .any(|s| s.category == category && s.value == value)
    }

    /// Number of entries across all groups with this category name.
    pub fn count_for_category(&self, category: &str) -> usize {
        self.selections
            .iter()
            .filter(|s| s.category == category)
            .count()
    }

    /// Replace the whole selection list, e.g. when editing a stored alert.
    ///
    /// Duplicate triples keep their first occurrence and entries beyond the
    /// cap are dropped. Returns how many entries were discarded.
    pub fn set_selections(&mut self, selections: Vec<DemographicOption>) -> usize {
        let incoming = selections.len();
        self.selections.clear();
        for option in selections {
            if self.selections.contains(&option) {
                continue;
            }
            if matches!(self.max_selections, Some(limit) if self.selections.len() >= limit) {
                break;
            }
            self.selections.push(option);
        }
        incoming - self.selections.len()
    }

    pub fn selections(&self) -> &[DemographicOption] {
        &self.selections
    }

    pub fn max_selections(&self) -> Option<usize> {
        self.max_selections
    }

    pub fn len(&self) -> usize {
        self.selections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }
}
