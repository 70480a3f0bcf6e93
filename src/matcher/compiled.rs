//! Compiled demographic filter.

use super::context::Candidate;
use super::defaults::{bidirectional_contains_match, exact_match, MatchStrategy};
use rayon::prelude::*;
use tracing::{debug, trace};

/// One category of a compiled group: the record field to read and the
/// values any of which satisfies it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledCategory {
    pub category: String,
    pub field: String,
    pub strategy: MatchStrategy,
    values: Vec<String>,
    lowered: Vec<String>,
}

impl CompiledCategory {
    pub fn new(
        category: impl Into<String>,
        field: impl Into<String>,
        strategy: MatchStrategy,
        values: Vec<String>,
    ) -> Self {
        let lowered = values.iter().map(|v| v.to_lowercase()).collect();
        Self {
            category: category.into(),
            field: field.into(),
            strategy,
            values,
            lowered,
        }
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Whether the candidate's value for this category matches any selected
    /// value. A missing value never matches.
    pub fn matches<C: Candidate + ?Sized>(&self, candidate: &C) -> bool {
        let Some(field_value) = candidate.field(&self.field) else {
            debug!(category = %self.category, field = %self.field, "candidate has no value");
            return false;
        };

        let matched = match self.strategy {
            MatchStrategy::Exact => exact_match(&field_value, &self.values),
            MatchStrategy::BidirectionalContains => {
                bidirectional_contains_match(&field_value, &self.lowered)
            }
        };
        debug!(
            category = %self.category,
            field = %self.field,
            value = %field_value,
            strategy = self.strategy.name(),
            matched,
            "category evaluated"
        );
        matched
    }
}

/// All categories of one demographic group. Every category must match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledGroup {
    pub group: String,
    pub categories: Vec<CompiledCategory>,
}

impl CompiledGroup {
    pub fn matches<C: Candidate + ?Sized>(&self, candidate: &C) -> bool {
        self.categories.iter().all(|c| c.matches(candidate))
    }
}

/// Outcome of one category in a [`MatchReport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryOutcome {
    pub group: String,
    pub category: String,
    pub field: String,
    pub candidate_value: Option<String>,
    pub matched: bool,
}

/// Per-category explanation of a match decision.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchReport {
    pub matched: bool,
    pub outcomes: Vec<CategoryOutcome>,
}

impl MatchReport {
    pub fn failed_groups(&self) -> Vec<&str> {
        let mut groups: Vec<&str> = Vec::new();
        for outcome in self.outcomes.iter().filter(|o| !o.matched) {
            if !groups.contains(&outcome.group.as_str()) {
                groups.push(&outcome.group);
            }
        }
        groups
    }
}

/// A selection list compiled for evaluation.
///
/// Groups are combined with AND, categories within a group with AND, and the
/// values of a category with OR. An empty filter matches every candidate.
/// Built by [`super::MatcherBuilder::compile`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompiledFilter {
    groups: Vec<CompiledGroup>,
}

impl CompiledFilter {
    pub fn new(groups: Vec<CompiledGroup>) -> Self {
        Self { groups }
    }

    /// A filter with no criteria.
    pub fn match_all() -> Self {
        Self::default()
    }

    pub fn groups(&self) -> &[CompiledGroup] {
        &self.groups
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn matches<C: Candidate + ?Sized>(&self, candidate: &C) -> bool {
        self.groups.iter().all(|g| g.matches(candidate))
    }

    /// Evaluate every category without short-circuiting and record why the
    /// candidate passed or failed.
    pub fn explain<C: Candidate + ?Sized>(&self, candidate: &C) -> MatchReport {
        let mut outcomes = Vec::new();
        for group in &self.groups {
            for category in &group.categories {
                outcomes.push(CategoryOutcome {
                    group: group.group.clone(),
                    category: category.category.clone(),
                    field: category.field.clone(),
                    candidate_value: candidate.field(&category.field).map(|v| v.into_owned()),
                    matched: category.matches(candidate),
                });
            }
        }
        MatchReport {
            matched: outcomes.iter().all(|o| o.matched),
            outcomes,
        }
    }

    /// Keep the candidates that match, in their original order.
    pub fn filter_candidates<'a, C: Candidate>(&self, candidates: &'a [C]) -> Vec<&'a C> {
        let kept: Vec<&C> = candidates.iter().filter(|c| self.matches(*c)).collect();
        trace!(total = candidates.len(), kept = kept.len(), "filtered candidates");
        kept
    }

    /// Same as [`CompiledFilter::filter_candidates`], spread over the rayon
    /// pool. Output order matches input order.
    pub fn par_filter_candidates<'a, C: Candidate + Sync>(&self, candidates: &'a [C]) -> Vec<&'a C> {
        let kept: Vec<&C> = candidates.par_iter().filter(|c| self.matches(*c)).collect();
        trace!(total = candidates.len(), kept = kept.len(), "filtered candidates in parallel");
        kept
    }

    /// Consume `candidates` and keep the matching ones in order.
    pub fn retain<C: Candidate>(&self, candidates: Vec<C>) -> Vec<C> {
        candidates.into_iter().filter(|c| self.matches(c)).collect()
    }
}
