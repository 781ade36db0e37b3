//! Configuration validation helpers

use super::error::{ConfigError, ConfigResult};

/// Trait for validatable configuration sections
pub trait Validatable {
    /// Returns `Ok(())` if valid, `Err(ConfigError)` with details if invalid.
    fn validate(&self) -> ConfigResult<()>;

    /// Section name used as the prefix of field paths in errors
    fn config_name(&self) -> &'static str {
        "config"
    }

    /// `<config_name>.<field>`, as reported in [`ConfigError`] variants
    fn field_path(&self, field: &str) -> String {
        format!("{}.{}", self.config_name(), field)
    }
}

pub(crate) fn check_range<T>(field: &str, value: T, min: T, max: T) -> ConfigResult<()>
where
    T: PartialOrd + ToString,
{
    if value < min || value > max {
        return Err(ConfigError::range(field, value, min, max));
    }
    Ok(())
}

pub(crate) fn check_not_blank(field: &str, value: &str) -> ConfigResult<()> {
    if value.trim().is_empty() {
        return Err(ConfigError::empty(field));
    }
    Ok(())
}
