//! Per-backend configuration sections
//!
//! Each section maps to one repository and carries its own validation.

use super::error::ConfigResult;
use super::validation::{check_not_blank, check_range, Validatable};
use serde::{Deserialize, Serialize};

/// Upper bound on completion suggestions per request
pub const MAX_SUGGESTIONS: usize = 7;

// ============================================================================
// Search engine
// ============================================================================

/// Search engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// Base URI of the search engine (no trailing index)
    pub uri: String,

    /// Index holding hero documents
    pub index: String,

    /// Request timeout in milliseconds (1..=60000)
    pub timeout_ms: u64,

    /// Completion suggestions per request (1..=7)
    pub suggestion_size: usize,

    /// Name of the completion suggester in requests and responses
    pub suggester_name: String,

    /// Field pre-indexed for completion
    pub completion_field: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            uri: "http://localhost:9200".to_string(),
            index: "heroes".to_string(),
            timeout_ms: 5_000,
            suggestion_size: MAX_SUGGESTIONS,
            suggester_name: "hero-suggest".to_string(),
            completion_field: "suggest".to_string(),
        }
    }
}

impl Validatable for SearchConfig {
    fn validate(&self) -> ConfigResult<()> {
        check_not_blank(&self.field_path("uri"), &self.uri)?;
        check_not_blank(&self.field_path("index"), &self.index)?;
        check_range(&self.field_path("timeout_ms"), self.timeout_ms, 1, 60_000)?;
        check_range(&self.field_path("suggestion_size"), self.suggestion_size, 1, MAX_SUGGESTIONS)?;
        check_not_blank(&self.field_path("suggester_name"), &self.suggester_name)?;
        check_not_blank(&self.field_path("completion_field"), &self.completion_field)
    }

    fn config_name(&self) -> &'static str {
        "search"
    }
}

// ============================================================================
// Document store
// ============================================================================

/// Document store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DocumentsConfig {
    /// Collection holding hero documents
    pub collection: String,
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            collection: "heroes".to_string(),
        }
    }
}

impl Validatable for DocumentsConfig {
    fn validate(&self) -> ConfigResult<()> {
        check_not_blank(&self.field_path("collection"), &self.collection)
    }

    fn config_name(&self) -> &'static str {
        "documents"
    }
}

// ============================================================================
// Ranking cache
// ============================================================================

/// Ranking cache configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RankingConfig {
    /// Sorted set holding the most recent visits
    pub recent_key: String,

    /// Sorted set holding visit counts
    pub top_key: String,

    /// Number of distinct recent visits kept (1..=100)
    pub recent_window: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            recent_key: "viewed-heroes".to_string(),
            top_key: "top-heroes".to_string(),
            recent_window: 5,
        }
    }
}

impl Validatable for RankingConfig {
    fn validate(&self) -> ConfigResult<()> {
        check_not_blank(&self.field_path("recent_key"), &self.recent_key)?;
        check_not_blank(&self.field_path("top_key"), &self.top_key)?;
        check_range(&self.field_path("recent_window"), self.recent_window, 1, 100)
    }

    fn config_name(&self) -> &'static str {
        "ranking"
    }
}
