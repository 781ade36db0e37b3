//! Visit ranking cache
//!
//! Two sorted sets share one member encoding (the canonical JSON of a
//! [`StatItem`]) but order it differently:
//!
//! ```text
//! recent (viewed-heroes)  score = -visit_millis   ascending read = newest first
//!                         trimmed to the window after every insert
//! top    (top-heroes)     score = visit count     descending read = most visited first
//!                         never trimmed
//! ```
//!
//! A visit writes both sets as two independent calls. There is no
//! transaction across them: a failure between the two can leave one set
//! updated and not the other. Concurrent visits can also leave the recent
//! set briefly past the window until the next trim.

use std::sync::Arc;

use crate::config::RankingConfig;
use crate::domain::{SortedSetClient, StatItem, TopStatItem};
use crate::error::{Backend, HeroesError, Result};
use crate::telemetry::{Telemetry, TracingTelemetry};

use super::clock::{SystemClock, VisitClock};

const ADD_NEW_HERO_VISITED: &str = "add_new_hero_visited";
const RECORD_RECENT: &str = "record_recent_visit";
const INCREMENT_TOP: &str = "increment_top_visit";
const LAST_HEROES_VISITED: &str = "last_heroes_visited";
const TOP_HEROES_VISITED: &str = "top_heroes_visited";

pub struct RankingCache {
    client: Arc<dyn SortedSetClient>,
    recent_key: String,
    top_key: String,
    window: usize,
    clock: Arc<dyn VisitClock>,
    telemetry: Arc<dyn Telemetry>,
}

impl RankingCache {
    pub fn new(client: Arc<dyn SortedSetClient>, config: &RankingConfig) -> Self {
        Self {
            client,
            recent_key: config.recent_key.clone(),
            top_key: config.top_key.clone(),
            window: config.recent_window.max(1),
            clock: Arc::new(SystemClock),
            telemetry: Arc::new(TracingTelemetry),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn VisitClock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_telemetry(mut self, telemetry: Arc<dyn Telemetry>) -> Self {
        self.telemetry = telemetry;
        self
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // Writes
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// Record one visit in both sets.
    ///
    /// `Ok(true)` when the counter came back finite and the recent insert
    /// reported a non-negative count. Either sub-call failing is an error.
    pub async fn try_add_new_hero_visited(&self, item: &StatItem) -> Result<bool> {
        self.telemetry
            .operation(Backend::SortedSetCache, ADD_NEW_HERO_VISITED);
        tracing::debug!(hero = %item.name, "hero visited");

        let member = self.observe(ADD_NEW_HERO_VISITED, item.to_member())?;
        let (recent, top) = tokio::join!(
            self.record_recent(&member),
            self.increment_top(&member)
        );
        let added = recent?;
        let score = top?;
        Ok(score.is_finite() && added >= 0)
    }

    /// [`try_add_new_hero_visited`](Self::try_add_new_hero_visited), `false` on failure
    pub async fn add_new_hero_visited(&self, item: &StatItem) -> bool {
        self.try_add_new_hero_visited(item).await.unwrap_or(false)
    }

    /// Insert with a negated timestamp, then drop everything past the window
    async fn record_recent(&self, member: &str) -> Result<i64> {
        let score = -(self.clock.now_millis() as f64);
        let result = async {
            let added = self
                .client
                .insert_with_score(&self.recent_key, member, score)
                .await?;
            self.client
                .trim_by_rank(&self.recent_key, self.window as i64, -1)
                .await?;
            Ok::<_, HeroesError>(added)
        }
        .await;
        self.observe(RECORD_RECENT, result)
    }

    async fn increment_top(&self, member: &str) -> Result<f64> {
        let result = self
            .client
            .increment_or_create(&self.top_key, member, 1.0)
            .await;
        self.observe(INCREMENT_TOP, result)
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // Reads
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// Up to `count` most recent distinct visits, newest first
    pub async fn try_last_heroes_visited(&self, count: usize) -> Result<Vec<StatItem>> {
        self.telemetry
            .operation(Backend::SortedSetCache, LAST_HEROES_VISITED);
        if count == 0 {
            return Ok(Vec::new());
        }
        let result = async {
            self.client
                .range_ascending(&self.recent_key, 0, last_rank(count))
                .await?
                .iter()
                .map(|member| StatItem::from_member(member))
                .collect::<Result<Vec<_>>>()
        }
        .await;
        self.observe(LAST_HEROES_VISITED, result)
    }

    /// [`try_last_heroes_visited`](Self::try_last_heroes_visited), placeholder list on failure
    pub async fn last_heroes_visited(&self, count: usize) -> Vec<StatItem> {
        self.try_last_heroes_visited(count)
            .await
            .unwrap_or_else(|_| vec![StatItem::no_result()])
    }

    /// Up to `count` most visited heroes with their visit counts
    pub async fn try_top_heroes_visited(&self, count: usize) -> Result<Vec<TopStatItem>> {
        self.telemetry
            .operation(Backend::SortedSetCache, TOP_HEROES_VISITED);
        if count == 0 {
            return Ok(Vec::new());
        }
        let result = async {
            self.client
                .range_descending_with_scores(&self.top_key, 0, last_rank(count))
                .await?
                .iter()
                .map(|(member, score)| {
                    if !score.is_finite() {
                        return Err(HeroesError::decode(format!(
                            "visit score is not finite: {}",
                            score
                        )));
                    }
                    Ok(TopStatItem {
                        hero: StatItem::from_member(member)?,
                        score: *score as i64,
                    })
                })
                .collect::<Result<Vec<_>>>()
        }
        .await;
        self.observe(TOP_HEROES_VISITED, result)
    }

    /// [`try_top_heroes_visited`](Self::try_top_heroes_visited), placeholder list on failure
    pub async fn top_heroes_visited(&self, count: usize) -> Vec<TopStatItem> {
        self.try_top_heroes_visited(count)
            .await
            .unwrap_or_else(|_| vec![TopStatItem::no_result()])
    }

    fn observe<T>(&self, operation: &'static str, result: Result<T>) -> Result<T> {
        result.map_err(|e| {
            let e = e.or_backend(Backend::SortedSetCache);
            self.telemetry.failure(Backend::SortedSetCache, operation, &e);
            e
        })
    }
}

fn last_rank(count: usize) -> i64 {
    i64::try_from(count).unwrap_or(i64::MAX) - 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::RecordingTelemetry;
    use async_trait::async_trait;

    /// Counter works, recent set is down
    struct HalfDown;

    #[async_trait]
    impl SortedSetClient for HalfDown {
        async fn increment_or_create(&self, _set: &str, _member: &str, delta: f64) -> Result<f64> {
            Ok(delta)
        }

        async fn insert_with_score(&self, _set: &str, _member: &str, _score: f64) -> Result<i64> {
            Err(HeroesError::transport("connection reset"))
        }

        async fn trim_by_rank(&self, _set: &str, _start: i64, _stop: i64) -> Result<i64> {
            Ok(0)
        }

        async fn range_ascending(&self, _set: &str, _start: i64, _stop: i64) -> Result<Vec<String>> {
            Ok(vec!["{broken".to_string()])
        }

        async fn range_descending_with_scores(
            &self,
            _set: &str,
            _start: i64,
            _stop: i64,
        ) -> Result<Vec<(String, f64)>> {
            Ok(vec![(StatItem::new("1", "Thor", "", "").to_member()?, f64::NAN)])
        }
    }

    #[tokio::test]
    async fn test_partial_write_failure_reports_false_and_logs_sub_operation() {
        let telemetry = Arc::new(RecordingTelemetry::new());
        let cache = RankingCache::new(Arc::new(HalfDown), &RankingConfig::default())
            .with_telemetry(telemetry.clone());

        assert!(!cache.add_new_hero_visited(&StatItem::new("1", "Thor", "", "")).await);

        let failures = telemetry.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].operation, "record_recent_visit");
        assert_eq!(failures[0].backend, Backend::SortedSetCache);
    }

    #[tokio::test]
    async fn test_undecodable_member_degrades_to_placeholder() {
        let cache = RankingCache::new(Arc::new(HalfDown), &RankingConfig::default());
        assert!(cache.try_last_heroes_visited(5).await.unwrap_err().is_decode());
        assert_eq!(cache.last_heroes_visited(5).await, vec![StatItem::no_result()]);
    }

    #[tokio::test]
    async fn test_non_finite_score_degrades_to_placeholder() {
        let cache = RankingCache::new(Arc::new(HalfDown), &RankingConfig::default());
        assert_eq!(cache.top_heroes_visited(3).await, vec![TopStatItem::no_result()]);
    }

    #[tokio::test]
    async fn test_zero_count_reads_nothing() {
        let cache = RankingCache::new(Arc::new(HalfDown), &RankingConfig::default());
        assert!(cache.last_heroes_visited(0).await.is_empty());
        assert!(cache.top_heroes_visited(0).await.is_empty());
    }

    #[test]
    fn test_last_rank() {
        assert_eq!(last_rank(1), 0);
        assert_eq!(last_rank(5), 4);
    }
}
