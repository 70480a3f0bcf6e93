//! Call sites that act on filtered candidates.
//!
//! Both access-code assignment and alert targeting evaluate selections with
//! the same [`CompiledFilter`] rules.

use crate::error::Result;
use crate::ir::DemographicOption;
use crate::matcher::{Candidate, CompiledFilter, MatcherBuilder};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use tracing::{debug, warn};

/// Outcome of [`AccessCodeAssignment::assign_all`].
///
/// Indices refer to positions in the candidate slice that was passed in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkAssignReport<E> {
    pub attempted: usize,
    pub assigned: Vec<usize>,
    pub failed: Vec<(usize, E)>,
}

impl<E> BulkAssignReport<E> {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Assigns access codes to every candidate matching a selection list.
#[derive(Debug, Clone)]
pub struct AccessCodeAssignment {
    filter: CompiledFilter,
}

impl AccessCodeAssignment {
    pub fn new(builder: &MatcherBuilder, selections: &[DemographicOption]) -> Result<Self> {
        Ok(Self {
            filter: builder.compile(selections)?,
        })
    }

    pub fn filter(&self) -> &CompiledFilter {
        &self.filter
    }

    pub fn eligible<'a, C: Candidate>(&self, candidates: &'a [C]) -> Vec<&'a C> {
        self.filter.filter_candidates(candidates)
    }

    /// Run `assign` once per matching candidate, in order.
    ///
    /// Each call is independent: a failure is recorded and the remaining
    /// candidates are still attempted. Nothing is rolled back.
    pub fn assign_all<C, E, F>(&self, candidates: &[C], mut assign: F) -> BulkAssignReport<E>
    where
        C: Candidate,
        E: Display,
        F: FnMut(&C) -> std::result::Result<(), E>,
    {
        let mut report = BulkAssignReport {
            attempted: 0,
            assigned: Vec::new(),
            failed: Vec::new(),
        };

        for (idx, candidate) in candidates.iter().enumerate() {
            if !self.filter.matches(candidate) {
                continue;
            }
            report.attempted += 1;
            match assign(candidate) {
                Ok(()) => report.assigned.push(idx),
                Err(err) => {
                    warn!(index = idx, error = %err, "access code assignment failed");
                    report.failed.push((idx, err));
                }
            }
        }

        debug!(
            candidates = candidates.len(),
            attempted = report.attempted,
            failed = report.failed.len(),
            "bulk access code assignment finished"
        );
        report
    }
}

/// An alert shown only to users matching its demographic filter.
///
/// A missing or empty filter targets everyone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetedAlert {
    pub id: i64,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub filter: Option<Vec<DemographicOption>>,
}

impl TargetedAlert {
    pub fn selections(&self) -> &[DemographicOption] {
        self.filter.as_deref().unwrap_or(&[])
    }

    pub fn applies_to<C: Candidate + ?Sized>(
        &self,
        builder: &MatcherBuilder,
        candidate: &C,
    ) -> Result<bool> {
        Ok(builder.compile(self.selections())?.matches(candidate))
    }
}

/// Alerts applying to `candidate`, in their original order.
///
/// An alert whose filter cannot be compiled is left out and logged.
pub fn visible_alerts<'a, C: Candidate + ?Sized>(
    alerts: &'a [TargetedAlert],
    builder: &MatcherBuilder,
    candidate: &C,
) -> Vec<&'a TargetedAlert> {
    alerts
        .iter()
        .filter(|alert| match alert.applies_to(builder, candidate) {
            Ok(applies) => applies,
            Err(err) => {
                warn!(alert_id = alert.id, error = %err, "skipping alert with invalid filter");
                false
            }
        })
        .collect()
}
