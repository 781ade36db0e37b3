//! Domain Models
//!
//! Value objects produced by the repositories. They are immutable after
//! construction and owned by the caller that received them.

use serde::{Deserialize, Serialize};

use crate::error::{HeroesError, Result};

/// Id carried by every placeholder entity
pub const SENTINEL_ID: &str = "-1";

/// Name carried by every placeholder entity
pub const SENTINEL_NAME: &str = "No result";

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Search
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Hero surfaced by a search or a suggestion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchedHero {
    /// Search engine document id (`"-1"` for the placeholder)
    pub id: String,

    pub name: String,

    pub image_url: Option<String>,

    pub universe: Option<String>,

    /// Comma-separated alias summary as indexed
    pub aliases: Option<String>,

    pub description: Option<String>,
}

impl SearchedHero {
    /// Placeholder returned when a search could not be served
    pub fn no_result() -> Self {
        Self {
            id: SENTINEL_ID.to_string(),
            name: SENTINEL_NAME.to_string(),
            image_url: None,
            universe: None,
            aliases: None,
            description: None,
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.id == SENTINEL_ID
    }
}

/// One page of results
///
/// Invariants: `page >= 1`, `total_pages = max(1, ceil(total / page_size))`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResults<T> {
    pub total: u64,
    pub page: u32,
    pub total_pages: u32,
    pub items: Vec<T>,
}

impl<T> PaginatedResults<T> {
    pub fn new(total: u64, page: u32, page_size: u32, items: Vec<T>) -> Self {
        Self {
            total,
            page: page.max(1),
            total_pages: total_pages(total, page_size),
            items,
        }
    }

    /// Single-item, single-page result
    pub fn single(item: T) -> Self {
        Self {
            total: 1,
            page: 1,
            total_pages: 1,
            items: vec![item],
        }
    }
}

impl PaginatedResults<SearchedHero> {
    /// Degraded page: one placeholder hero
    pub fn no_result() -> Self {
        Self::single(SearchedHero::no_result())
    }

    pub fn is_sentinel(&self) -> bool {
        self.items.len() == 1 && self.items[0].is_sentinel()
    }
}

/// `max(1, ceil(total / page_size))`; a zero page size counts as one.
pub fn total_pages(total: u64, page_size: u32) -> u32 {
    let size = u64::from(page_size.max(1));
    let pages = total.div_ceil(size).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Documents
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Identity block of a hero document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    #[serde(default)]
    pub secret_identities: Vec<String>,
    pub birth_place: Option<String>,
    pub occupation: Option<String>,
    #[serde(default)]
    pub aliases: Vec<String>,
    pub alignment: Option<String>,
    pub first_appearance: Option<String>,
    /// Stored as text by the import; empty when unknown
    pub year_appearance: Option<String>,
    pub universe: Option<String>,
}

/// Full hero document, only produced by a lookup on the domain id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hero {
    pub id: String,
    pub name: String,
    pub image_url: Option<String>,
    pub background_image_url: Option<String>,
    pub external_link: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub identity: Identity,
    #[serde(default)]
    pub powers: Vec<String>,
    #[serde(default)]
    pub partners: Vec<String>,
    #[serde(default)]
    pub skills: Option<serde_json::Value>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Statistics
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Label + count for any grouped statistic
///
/// `name` is `None` for the group of documents that lack the grouped field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemCount {
    pub name: Option<String>,
    pub count: u64,
}

impl ItemCount {
    pub fn new(name: impl Into<String>, count: u64) -> Self {
        Self {
            name: Some(name.into()),
            count,
        }
    }

    pub fn unlabelled(count: u64) -> Self {
        Self { name: None, count }
    }
}

/// Per-year breakdown across universes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearAndUniverseStat {
    pub year_appearance: i32,
    pub by_universe: Vec<ItemCount>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Visits
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Visit event payload
///
/// Its JSON encoding is the sorted-set member, so the field order here is
/// part of the cache format: two visits of the same hero must encode to the
/// same bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatItem {
    pub id: String,
    pub name: String,
    pub image_url: String,
    pub alias: String,
}

impl StatItem {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        image_url: impl Into<String>,
        alias: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            image_url: image_url.into(),
            alias: alias.into(),
        }
    }

    pub fn no_result() -> Self {
        Self::new(SENTINEL_ID, SENTINEL_NAME, "", "")
    }

    pub fn is_sentinel(&self) -> bool {
        self.id == SENTINEL_ID
    }

    /// Canonical sorted-set member
    pub fn to_member(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_member(member: &str) -> Result<Self> {
        serde_json::from_str(member).map_err(|e| {
            HeroesError::decode(format!("invalid visit member: {}", e))
                .with_node(serde_json::Value::String(member.to_string()))
                .with_source(e)
        })
    }
}

/// Ranked visit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopStatItem {
    pub hero: StatItem,
    /// Visit count; `-1` on the placeholder
    pub score: i64,
}

impl TopStatItem {
    pub fn no_result() -> Self {
        Self {
            hero: StatItem::no_result(),
            score: -1,
        }
    }
}
