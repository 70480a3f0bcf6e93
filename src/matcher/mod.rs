//! Demographic filter evaluation.
//!
//! Matching separates compilation from evaluation:
//! - **Compilation**: [`MatcherBuilder`] groups the selection list, resolves
//!   each category to a record field and picks its comparison rule
//! - **Evaluation**: [`CompiledFilter`] tests candidates without further
//!   lookups or allocation beyond lower-casing the candidate value
//!
//! ## Matching rules
//!
//! - No selections: every candidate matches
//! - Every group must match (AND)
//! - Every category within a group must match (AND)
//! - A category matches when the candidate's value matches any selected value
//!   (OR). `age_group` uses exact equality; other categories use a
//!   case-insensitive substring test in either direction
//! - A candidate without a value for the field fails that category
//!
//! ## Example Usage
//!
//! ```rust
//! use demographic_filter::matcher::matches;
//! use demographic_filter::{CandidateRecord, DemographicOption};
//!
//! let selections = vec![
//!     DemographicOption::option("age_group", "18-24"),
//!     DemographicOption::option("gender", "Female"),
//! ];
//! let profile = CandidateRecord::new()
//!     .with_field("age_group", "18-24")
//!     .with_field("gender", "Female, Non-binary");
//!
//! assert!(matches(&selections, &profile).unwrap());
//! ```

pub mod builder;
pub mod compiled;
pub mod context;
pub mod defaults;

pub use builder::MatcherBuilder;
pub use compiled::{
    CategoryOutcome, CompiledCategory, CompiledFilter, CompiledGroup, MatchReport,
};
pub use context::Candidate;
pub use defaults::{bidirectional_contains_match, exact_match, MatchStrategy};

use crate::error::Result;
use crate::ir::DemographicOption;

/// Compile `selections` with the default builder and test one candidate.
pub fn matches<C: Candidate + ?Sized>(
    selections: &[DemographicOption],
    candidate: &C,
) -> Result<bool> {
    if selections.is_empty() {
        return Ok(true);
    }
    Ok(MatcherBuilder::new().compile(selections)?.matches(candidate))
}

/// Compile `selections` with the default builder and keep matching
/// candidates in their original order.
pub fn filter_candidates<'a, C: Candidate>(
    selections: &[DemographicOption],
    candidates: &'a [C],
) -> Result<Vec<&'a C>> {
    Ok(MatcherBuilder::new()
        .compile(selections)?
        .filter_candidates(candidates))
}
