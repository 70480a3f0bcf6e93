//! Value comparison rules used by compiled categories.

/// How a category compares a candidate value against its selected values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStrategy {
    /// Byte-for-byte equality with any selected value.
    Exact,
    /// Case-insensitive containment in either direction.
    BidirectionalContains,
}

impl MatchStrategy {
    pub fn name(self) -> &'static str {
        match self {
            MatchStrategy::Exact => "exact",
            MatchStrategy::BidirectionalContains => "contains",
        }
    }
}

/// Exact match against any of `values`.
///
/// # Example
/// ```rust
/// use demographic_filter::matcher::exact_match;
///
/// assert!(exact_match("25-34", &["18-24".to_string(), "25-34".to_string()]));
/// assert!(!exact_match("18-25-34", &["25-34".to_string()]));
/// ```
pub fn exact_match(field_value: &str, values: &[String]) -> bool {
    values.iter().any(|v| v == field_value)
}

/// Case-insensitive substring match against any of `values`, in either
/// direction.
///
/// `lowered_values` must hold the lower-cased selected values.
///
/// # Example
/// ```rust
/// use demographic_filter::matcher::bidirectional_contains_match;
///
/// let values = vec!["female".to_string()];
/// assert!(bidirectional_contains_match("Female, Non-binary", &values));
/// assert!(bidirectional_contains_match("fem", &values));
/// assert!(!bidirectional_contains_match("Other", &values));
/// ```
pub fn bidirectional_contains_match(field_value: &str, lowered_values: &[String]) -> bool {
    let candidate = field_value.to_lowercase();
    lowered_values
        .iter()
        .any(|v| candidate.contains(v.as_str()) || v.contains(candidate.as_str()))
}
