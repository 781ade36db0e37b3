//! Configuration error types

use thiserror::Error;

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Range validation error
    #[error("Invalid range for field '{field}': {value} not in {min}..={max}")]
    Range {
        field: String,
        value: String,
        min: String,
        max: String,
    },

    /// Required text field is blank
    #[error("Field '{field}' must not be empty")]
    Empty { field: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Configuration result type
pub type ConfigResult<T> = Result<T, ConfigError>;

impl ConfigError {
    pub fn range(
        field: impl Into<String>,
        value: impl ToString,
        min: impl ToString,
        max: impl ToString,
    ) -> Self {
        Self::Range {
            field: field.into(),
            value: value.to_string(),
            min: min.to_string(),
            max: max.to_string(),
        }
    }

    pub fn empty(field: impl Into<String>) -> Self {
        Self::Empty {
            field: field.into(),
        }
    }
}

impl From<ConfigError> for crate::HeroesError {
    fn from(err: ConfigError) -> Self {
        crate::HeroesError::config(err.to_string()).with_source(err)
    }
}
