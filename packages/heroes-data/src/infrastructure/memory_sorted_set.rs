//! In-Memory Sorted-Set Store
//!
//! Members are ordered by score, ties by member bytes. Ranks follow the
//! usual sorted-set rules: inclusive `stop`, negative indices from the end,
//! out-of-range windows clamped or empty.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::domain::SortedSetClient;
use crate::error::{Backend, HeroesError, Result};

#[derive(Debug, Default)]
struct SortedSet {
    scores: HashMap<String, f64>,
}

impl SortedSet {
    /// Ascending by (score, member)
    fn ordered(&self) -> Vec<(&str, f64)> {
        let mut entries: Vec<(&str, f64)> = self
            .scores
            .iter()
            .map(|(member, score)| (member.as_str(), *score))
            .collect();
        entries.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(b.0)));
        entries
    }
}

#[derive(Clone, Default)]
pub struct InMemorySortedSetStore {
    sets: Arc<RwLock<HashMap<String, SortedSet>>>,
}

impl InMemorySortedSetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self, set: &str, member: &str) -> Option<f64> {
        self.sets
            .read()
            .get(set)
            .and_then(|s| s.scores.get(member).copied())
    }

    pub fn len(&self, set: &str) -> usize {
        self.sets.read().get(set).map_or(0, |s| s.scores.len())
    }
}

fn not_a_number(set: &str) -> HeroesError {
    HeroesError::internal(format!("score for '{}' is not a number", set))
        .with_backend(Backend::SortedSetCache)
}

/// Resolve a rank window against `len` members; `None` when it selects nothing
pub fn rank_window(len: usize, start: i64, stop: i64) -> Option<(usize, usize)> {
    let len = i64::try_from(len).unwrap_or(i64::MAX);
    let start = if start < 0 { (len + start).max(0) } else { start };
    let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };
    if start > stop || start >= len {
        return None;
    }
    Some((start as usize, stop as usize))
}

fn slice<T>(entries: Vec<T>, start: i64, stop: i64) -> Vec<T> {
    match rank_window(entries.len(), start, stop) {
        Some((from, to)) => entries.into_iter().skip(from).take(to - from + 1).collect(),
        None => Vec::new(),
    }
}

#[async_trait]
impl SortedSetClient for InMemorySortedSetStore {
    async fn increment_or_create(&self, set: &str, member: &str, delta: f64) -> Result<f64> {
        let mut sets = self.sets.write();
        let scores = &mut sets.entry(set.to_string()).or_default().scores;
        let next = scores.get(member).copied().unwrap_or(0.0) + delta;
        if next.is_nan() {
            return Err(not_a_number(set));
        }
        scores.insert(member.to_string(), next);
        Ok(next)
    }

    async fn insert_with_score(&self, set: &str, member: &str, score: f64) -> Result<i64> {
        if score.is_nan() {
            return Err(not_a_number(set));
        }
        let mut sets = self.sets.write();
        let scores = &mut sets.entry(set.to_string()).or_default().scores;
        Ok(match scores.insert(member.to_string(), score) {
            Some(_) => 0,
            None => 1,
        })
    }

    async fn trim_by_rank(&self, set: &str, start: i64, stop: i64) -> Result<i64> {
        let mut sets = self.sets.write();
        let Some(sorted) = sets.get_mut(set) else {
            return Ok(0);
        };
        let doomed: Vec<String> = slice(sorted.ordered(), start, stop)
            .into_iter()
            .map(|(member, _)| member.to_string())
            .collect();
        for member in &doomed {
            sorted.scores.remove(member);
        }
        if sorted.scores.is_empty() {
            sets.remove(set);
        }
        Ok(doomed.len() as i64)
    }

    async fn range_ascending(&self, set: &str, start: i64, stop: i64) -> Result<Vec<String>> {
        let sets = self.sets.read();
        Ok(sets
            .get(set)
            .map(|sorted| {
                slice(sorted.ordered(), start, stop)
                    .into_iter()
                    .map(|(member, _)| member.to_string())
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn range_descending_with_scores(
        &self,
        set: &str,
        start: i64,
        stop: i64,
    ) -> Result<Vec<(String, f64)>> {
        let sets = self.sets.read();
        Ok(sets
            .get(set)
            .map(|sorted| {
                let mut entries = sorted.ordered();
                entries.reverse();
                slice(entries, start, stop)
                    .into_iter()
                    .map(|(member, score)| (member.to_string(), score))
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_window() {
        assert_eq!(rank_window(5, 0, -1), Some((0, 4)));
        assert_eq!(rank_window(5, 0, 99), Some((0, 4)));
        assert_eq!(rank_window(5, -2, -1), Some((3, 4)));
        assert_eq!(rank_window(5, -99, 1), Some((0, 1)));
        assert_eq!(rank_window(5, 5, -1), None);
        assert_eq!(rank_window(8, 5, -1), Some((5, 7)));
        assert_eq!(rank_window(0, 0, -1), None);
        assert_eq!(rank_window(5, 3, 1), None);
    }

    #[tokio::test]
    async fn test_insert_reports_new_members_only() {
        let store = InMemorySortedSetStore::new();
        assert_eq!(store.insert_with_score("s", "a", 1.0).await.unwrap(), 1);
        assert_eq!(store.insert_with_score("s", "a", 2.0).await.unwrap(), 0);
        assert_eq!(store.score("s", "a"), Some(2.0));
        assert_eq!(store.len("s"), 1);
    }

    #[tokio::test]
    async fn test_increment_creates_then_adds() {
        let store = InMemorySortedSetStore::new();
        assert_eq!(store.increment_or_create("s", "a", 1.0).await.unwrap(), 1.0);
        assert_eq!(store.increment_or_create("s", "a", 2.5).await.unwrap(), 3.5);
    }

    #[tokio::test]
    async fn test_nan_score_is_rejected() {
        let store = InMemorySortedSetStore::new();
        assert!(store.insert_with_score("s", "a", f64::NAN).await.is_err());
        store.increment_or_create("s", "a", f64::INFINITY).await.unwrap();
        assert!(store
            .increment_or_create("s", "a", f64::NEG_INFINITY)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_ties_order_by_member() {
        let store = InMemorySortedSetStore::new();
        for member in ["c", "a", "b"] {
            store.insert_with_score("s", member, 1.0).await.unwrap();
        }
        assert_eq!(store.range_ascending("s", 0, -1).await.unwrap(), vec!["a", "b", "c"]);
        let desc: Vec<String> = store
            .range_descending_with_scores("s", 0, -1)
            .await
            .unwrap()
            .into_iter()
            .map(|(m, _)| m)
            .collect();
        assert_eq!(desc, vec!["c", "b", "a"]);
    }

    #[tokio::test]
    async fn test_trim_keeps_lowest_ranks() {
        let store = InMemorySortedSetStore::new();
        for (i, member) in ["a", "b", "c", "d"].iter().enumerate() {
            store.insert_with_score("s", member, i as f64).await.unwrap();
        }
        assert_eq!(store.trim_by_rank("s", 2, -1).await.unwrap(), 2);
        assert_eq!(store.range_ascending("s", 0, -1).await.unwrap(), vec!["a", "b"]);
        assert_eq!(store.trim_by_rank("missing", 0, -1).await.unwrap(), 0);
    }
}
