//! Error types for the demographic filter crate.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, FilterError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    #[error("No field mapping for category '{category}' in group '{group}'")]
    UnmappedField { group: String, category: String },
    #[error("Duplicate field mapping for group '{0}'")]
    DuplicateMapping(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Group source error: {0}")]
    SourceError(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("YAML parsing error: {0}")]
    Yaml(String),
    #[error("JSON parsing error: {0}")]
    Json(String),
}

impl From<std::io::Error> for FilterError {
    fn from(err: std::io::Error) -> Self {
        FilterError::Io(err.to_string())
    }
}

impl From<serde_yaml::Error> for FilterError {
    fn from(err: serde_yaml::Error) -> Self {
        FilterError::Yaml(err.to_string())
    }
}

impl From<serde_json::Error> for FilterError {
    fn from(err: serde_json::Error) -> Self {
        FilterError::Json(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_unmapped_field_display() {
        let error = FilterError::UnmappedField {
            group: "religion".to_string(),
            category: "options".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "No field mapping for category 'options' in group 'religion'"
        );
        assert!(error.source().is_none());
    }

    #[test]
    fn test_invalid_config_display() {
        let error = FilterError::InvalidConfig("max_selections must be positive".to_string());
        assert_eq!(
            error.to_string(),
            "Invalid configuration: max_selections must be positive"
        );
    }

    #[test]
    fn test_from_io_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let filter_error: FilterError = io_error.into();

        match filter_error {
            FilterError::Io(msg) => assert!(msg.contains("file not found")),
            _ => panic!("Expected Io variant"),
        }
    }

    #[test]
    fn test_from_yaml_error() {
        let yaml_err = serde_yaml::from_str::<serde_yaml::Value>("invalid: yaml: [").unwrap_err();
        let filter_error: FilterError = yaml_err.into();
        assert!(matches!(filter_error, FilterError::Yaml(_)));
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let filter_error: FilterError = json_err.into();
        assert!(matches!(filter_error, FilterError::Json(_)));
    }

    #[test]
    fn test_error_equality() {
        let error1 = FilterError::SourceError("timeout".to_string());
        let error2 = FilterError::SourceError("timeout".to_string());
        let error3 = FilterError::SourceError("refused".to_string());

        assert_eq!(error1, error2);
        assert_ne!(error1, error3);
        assert_eq!(error1.clone(), error1);
    }

    #[test]
    fn test_result_type_alias() {
        fn failing() -> Result<i32> {
            Err(FilterError::DuplicateMapping("gender".to_string()))
        }

        match failing().unwrap_err() {
            FilterError::DuplicateMapping(group) => assert_eq!(group, "gender"),
            _ => panic!("Expected DuplicateMapping"),
        }
    }
}
