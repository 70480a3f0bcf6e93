//! # Demographic Filter
//!
//! Compiles user-selected demographic criteria into a predicate and evaluates
//! it against candidate records such as user profiles.
//!
//! A selection is a `(group, category, value)` triple. Selections are grouped
//! by demographic group and then by category; a candidate matches when it
//! satisfies every group, every category within each group, and at least one
//! selected value within each category.
//!
//! ## Quick Start
//!
//! ```rust
//! use demographic_filter::{CandidateRecord, MatcherBuilder, SelectionStore};
//!
//! let mut store = SelectionStore::new();
//! store.toggle("options", "18-24", "age_group");
//! store.toggle("options", "Female", "gender");
//!
//! let filter = MatcherBuilder::new().compile(store.selections())?;
//!
//! let profile = CandidateRecord::new()
//!     .with_field("age_group", "18-24")
//!     .with_field("gender", "Female, Non-binary");
//! assert!(filter.matches(&profile));
//!
//! let other = CandidateRecord::new()
//!     .with_field("age_group", "25-34")
//!     .with_field("gender", "Female");
//! assert!(!filter.matches(&other));
//! # Ok::<(), demographic_filter::FilterError>(())
//! ```
//!
//! ### Applied-filters summary
//!
//! ```rust
//! use demographic_filter::{compiler::describe, DemographicOption};
//!
//! let selections = vec![
//!     DemographicOption::option("age_group", "18-24"),
//!     DemographicOption::option("age_group", "25-34"),
//!     DemographicOption::option("gender", "Female"),
//! ];
//! assert_eq!(describe(&selections), "Age Group: 18-24 OR 25-34 AND Gender: Female");
//! ```
//!
//! ### Filtering a candidate list
//!
//! ```rust
//! use demographic_filter::{CandidateRecord, DemographicOption, MatcherBuilder};
//!
//! let filter = MatcherBuilder::new()
//!     .compile(&[DemographicOption::option("race", "Asian")])?;
//! let candidates = vec![
//!     CandidateRecord::new().with_field("race", "Asian"),
//!     CandidateRecord::new().with_field("race", "White"),
//!     CandidateRecord::new().with_field("race", "Asian, White"),
//! ];
//! assert_eq!(filter.filter_candidates(&candidates).len(), 2);
//! # Ok::<(), demographic_filter::FilterError>(())
//! ```

pub mod compiler;
pub mod config;
pub mod error;
pub mod groups;
pub mod ir;
pub mod matcher;
pub mod selection;
pub mod targeting;

// Configuration
pub use config::FilterConfig;

// Core types and errors
pub use error::{FilterError, Result};
pub use ir::{CandidateRecord, DemographicGroup, DemographicOption, OPTIONS_CATEGORY};

// Selection and compilation
pub use compiler::{FieldMapping, FilterQuery, FilterSummary, GroupedPredicate};
pub use selection::{SelectionStore, ToggleOutcome};

// Matcher system
pub use matcher::{Candidate, CompiledFilter, MatchReport, MatchStrategy, MatcherBuilder};

// Reference groups and call sites
pub use groups::{GroupCache, GroupCatalog, GroupRow, GroupSource};
pub use targeting::{AccessCodeAssignment, BulkAssignReport, TargetedAlert};
