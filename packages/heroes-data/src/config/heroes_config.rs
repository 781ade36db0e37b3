//! Top-level configuration and YAML/env loading

use super::error::ConfigResult;
use super::sections::{DocumentsConfig, RankingConfig, SearchConfig};
use super::validation::Validatable;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variables read by [`HeroesConfig::apply_env_overrides`]
pub const ENV_SEARCH_URI: &str = "HEROES_SEARCH_URI";
pub const ENV_SEARCH_INDEX: &str = "HEROES_SEARCH_INDEX";
pub const ENV_DOCUMENTS_COLLECTION: &str = "HEROES_DOCUMENTS_COLLECTION";

/// Complete data-layer configuration
///
/// ```rust,ignore
/// let config = HeroesConfig::from_yaml_file("heroes.yaml")?
///     .apply_env_overrides()
///     .validated()?;
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HeroesConfig {
    pub search: SearchConfig,
    pub documents: DocumentsConfig,
    pub ranking: RankingConfig,
}

impl HeroesConfig {
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn to_yaml(&self) -> ConfigResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Override connection settings from the process environment
    pub fn apply_env_overrides(self) -> Self {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Override connection settings from an arbitrary lookup
    pub fn apply_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(uri) = lookup(ENV_SEARCH_URI) {
            self.search.uri = uri;
        }
        if let Some(index) = lookup(ENV_SEARCH_INDEX) {
            self.search.index = index;
        }
        if let Some(collection) = lookup(ENV_DOCUMENTS_COLLECTION) {
            self.documents.collection = collection;
        }
        self
    }

    pub fn validated(self) -> ConfigResult<Self> {
        self.validate()?;
        Ok(self)
    }
}

impl Validatable for HeroesConfig {
    fn validate(&self) -> ConfigResult<()> {
        self.search.validate()?;
        self.documents.validate()?;
        self.ranking.validate()
    }

    fn config_name(&self) -> &'static str {
        "heroes"
    }
}
