//! Backend Ports (Trait Interfaces)
//!
//! One port per backend. Connection handles behind these traits are shared
//! read-only across concurrent calls; implementations enforce their own
//! request timeouts and report them as transport errors.
//!
//! - Search engine: JSON query document in, JSON response out
//! - Document store: point query and aggregation pipeline
//! - Sorted-set cache: the five primitives the ranking cache composes

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// Full-text search engine port
#[async_trait]
pub trait SearchClient: Send + Sync {
    /// Run a query document against an index and return the raw response
    async fn search(&self, index: &str, body: &Value) -> Result<Value>;
}

/// Document store port
#[async_trait]
pub trait DocumentStoreClient: Send + Sync {
    /// First document matching an equality filter
    async fn find_one(&self, collection: &str, filter: &Value) -> Result<Option<Value>>;

    /// Run an ordered pipeline of stage documents and collect the results
    async fn aggregate(&self, collection: &str, pipeline: &[Value]) -> Result<Vec<Value>>;
}

/// Sorted-set cache port
///
/// Rank arguments follow sorted-set conventions: `stop` is inclusive and
/// negative indices count from the end (`-1` is the last member).
#[async_trait]
pub trait SortedSetClient: Send + Sync {
    /// Add `delta` to a member's score, creating it at `delta` if absent.
    /// Returns the new score.
    async fn increment_or_create(&self, set: &str, member: &str, delta: f64) -> Result<f64>;

    /// Insert or re-score a member. Returns how many members were newly added.
    async fn insert_with_score(&self, set: &str, member: &str, score: f64) -> Result<i64>;

    /// Remove members by ascending rank. Returns how many were removed.
    async fn trim_by_rank(&self, set: &str, start: i64, stop: i64) -> Result<i64>;

    /// Members by ascending score
    async fn range_ascending(&self, set: &str, start: i64, stop: i64) -> Result<Vec<String>>;

    /// Members and scores by descending score
    async fn range_descending_with_scores(
        &self,
        set: &str,
        start: i64,
        stop: i64,
    ) -> Result<Vec<(String, f64)>>;
}
