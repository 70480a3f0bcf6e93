//! Configuration for demographic filtering.
//!
//! [`FilterConfig`] controls where reference groups come from, how long they
//! are cached, how many selections a user may make, and how categories map
//! onto candidate record fields. It can be built in code with the `with_*`
//! setters or loaded from YAML.
//!
//! ```rust
//! use demographic_filter::FilterConfig;
//! use std::time::Duration;
//!
//! let config = FilterConfig::from_yaml_str(
//!     r#"
//! data_source: demo_prelim
//! max_selections: 5
//! cache_ttl: 120
//! "#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.max_selections, Some(5));
//! assert_eq!(config.cache_ttl, Duration::from_secs(120));
//! ```

use crate::error::{FilterError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

/// Default table holding demographic option rows.
pub const DEFAULT_DATA_SOURCE: &str = "demo_prelim";

/// Default lifetime of cached reference groups.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Filter configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Name of the table reference groups are loaded from.
    ///
    /// **Default**: `demo_prelim`
    pub data_source: String,

    /// Maximum number of selections a user may hold at once.
    ///
    /// `None` disables the cap. Zero is rejected by [`FilterConfig::validate`].
    ///
    /// **Default**: `None`
    pub max_selections: Option<usize>,

    /// Cache fetched reference groups per data source.
    ///
    /// **Default**: true
    pub enable_caching: bool,

    /// How long cached reference groups stay fresh (seconds in YAML).
    ///
    /// Zero falls back to the default, see [`FilterConfig::effective_cache_ttl`].
    ///
    /// **Default**: 5 minutes
    #[serde(with = "duration_secs")]
    pub cache_ttl: Duration,

    /// Extra `group -> record field` entries used when a selection is in the
    /// generic `options` category. Merged over the built-in table.
    pub field_mappings: BTreeMap<String, String>,

    /// Categories compared with exact equality instead of substring matching.
    ///
    /// **Default**: `["age_group"]`
    pub exact_match_categories: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            data_source: DEFAULT_DATA_SOURCE.to_string(),
            max_selections: None,
            enable_caching: true,
            cache_ttl: DEFAULT_CACHE_TTL,
            field_mappings: BTreeMap::new(),
            exact_match_categories: vec!["age_group".to_string()],
        }
    }
}

impl FilterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data_source(mut self, data_source: impl Into<String>) -> Self {
        self.data_source = data_source.into();
        self
    }

    pub fn with_max_selections(mut self, max: usize) -> Self {
        self.max_selections = Some(max);
        self
    }

    pub fn with_caching(mut self, enable: bool) -> Self {
        self.enable_caching = enable;
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn with_field_mapping(mut self, group: impl Into<String>, field: impl Into<String>) -> Self {
        self.field_mappings.insert(group.into(), field.into());
        self
    }

    pub fn with_exact_match_category(mut self, category: impl Into<String>) -> Self {
        let category = category.into();
        if !self.exact_match_categories.contains(&category) {
            self.exact_match_categories.push(category);
        }
        self
    }

    /// Parse and validate a YAML configuration.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML configuration file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        if self.data_source.trim().is_empty() {
            return Err(FilterError::InvalidConfig(
                "data_source must not be empty".to_string(),
            ));
        }
        if self.max_selections == Some(0) {
            return Err(FilterError::InvalidConfig(
                "max_selections must be greater than zero".to_string(),
            ));
        }
        if let Some((group, _)) = self
            .field_mappings
            .iter()
            .find(|(group, field)| group.is_empty() || field.is_empty())
        {
            return Err(FilterError::InvalidConfig(format!(
                "field mapping for group '{group}' has an empty name"
            )));
        }
        Ok(())
    }

    /// Cache lifetime actually applied, with zero replaced by
    /// [`DEFAULT_CACHE_TTL`].
    pub fn effective_cache_ttl(&self) -> Duration {
        if self.cache_ttl.is_zero() {
            DEFAULT_CACHE_TTL
        } else {
            self.cache_ttl
        }
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = FilterConfig::default();
        assert_eq!(config.data_source, "demo_prelim");
        assert_eq!(config.max_selections, None);
        assert!(config.enable_caching);
        assert_eq!(config.cache_ttl, Duration::from_secs(300));
        assert_eq!(config.exact_match_categories, vec!["age_group"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_setters() {
        let config = FilterConfig::new()
            .with_data_source("demo_final")
            .with_max_selections(3)
            .with_caching(false)
            .with_cache_ttl(Duration::from_secs(10))
            .with_field_mapping("religion", "religion")
            .with_exact_match_category("income")
            .with_exact_match_category("income");

        assert_eq!(config.data_source, "demo_final");
        assert_eq!(config.max_selections, Some(3));
        assert!(!config.enable_caching);
        assert_eq!(config.cache_ttl, Duration::from_secs(10));
        assert_eq!(config.field_mappings.get("religion").unwrap(), "religion");
        assert_eq!(config.exact_match_categories, vec!["age_group", "income"]);
    }

    #[test]
    fn test_yaml_partial_config_uses_defaults() {
        let config = FilterConfig::from_yaml_str("max_selections: 4\n").unwrap();
        assert_eq!(config.max_selections, Some(4));
        assert_eq!(config.data_source, DEFAULT_DATA_SOURCE);
        assert_eq!(config.cache_ttl, DEFAULT_CACHE_TTL);
    }

    #[test]
    fn test_yaml_field_mappings() {
        let config = FilterConfig::from_yaml_str(
            r#"
field_mappings:
  religion: faith
exact_match_categories: [age_group, zip]
"#,
        )
        .unwrap();
        assert_eq!(config.field_mappings.get("religion").unwrap(), "faith");
        assert_eq!(config.exact_match_categories, vec!["age_group", "zip"]);
    }

    #[test]
    fn test_zero_cache_ttl_uses_default() {
        let config = FilterConfig::from_yaml_str("cache_ttl: 0\n").unwrap();
        assert_eq!(config.cache_ttl, Duration::ZERO);
        assert_eq!(config.effective_cache_ttl(), DEFAULT_CACHE_TTL);

        let config = FilterConfig::new().with_cache_ttl(Duration::from_secs(45));
        assert_eq!(config.effective_cache_ttl(), Duration::from_secs(45));
    }

    #[test]
    fn test_validation_rejects_zero_cap() {
        let result = FilterConfig::from_yaml_str("max_selections: 0\n");
        assert!(matches!(result, Err(FilterError::InvalidConfig(_))));
    }

    #[test]
    fn test_validation_rejects_empty_data_source() {
        let config = FilterConfig::new().with_data_source("  ");
        assert!(matches!(config.validate(), Err(FilterError::InvalidConfig(_))));
    }

    #[test]
    fn test_validation_rejects_empty_mapping() {
        let config = FilterConfig::new().with_field_mapping("religion", "");
        assert!(matches!(config.validate(), Err(FilterError::InvalidConfig(_))));
    }

    #[test]
    fn test_invalid_yaml() {
        let result = FilterConfig::from_yaml_str("max_selections: [");
        assert!(matches!(result, Err(FilterError::Yaml(_))));
    }

    #[test]
    fn test_from_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "data_source: demo_final\ncache_ttl: 60").unwrap();

        let config = FilterConfig::from_yaml_file(file.path()).unwrap();
        assert_eq!(config.data_source, "demo_final");
        assert_eq!(config.cache_ttl, Duration::from_secs(60));
    }

    #[test]
    fn test_from_missing_file() {
        let result = FilterConfig::from_yaml_file("/nonexistent/filter.yaml");
        assert!(matches!(result, Err(FilterError::Io(_))));
    }
}
