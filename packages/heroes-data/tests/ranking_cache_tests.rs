//! Ranking cache against the in-memory sorted-set store

mod common;

use std::sync::Arc;

use common::*;
use heroes_data::config::{HeroesConfig, RankingConfig};
use heroes_data::{InMemorySortedSetStore, RankingCache, StatItem, SteppingClock};
use pretty_assertions::assert_eq;

const RECENT: &str = "viewed-heroes";
const TOP: &str = "top-heroes";

/// Every visit reads a clock one second later than the previous one
fn cache() -> (RankingCache, InMemorySortedSetStore) {
    let store = InMemorySortedSetStore::new();
    let cache = RankingCache::new(Arc::new(store.clone()), &RankingConfig::default())
        .with_clock(Arc::new(SteppingClock::new(1_700_000_000_000, 1_000)));
    (cache, store)
}

async fn visit(cache: &RankingCache, item: &StatItem) {
    assert!(cache.add_new_hero_visited(item).await);
}

fn names(items: &[StatItem]) -> Vec<&str> {
    items.iter().map(|i| i.name.as_str()).collect()
}

// ============================================================================
// Recency
// ============================================================================

#[tokio::test]
async fn test_last_visited_most_recent_first() {
    let (cache, _) = cache();
    for (id, name) in [("1", "Thor"), ("2", "Hulk"), ("3", "Storm"), ("4", "Loki"), ("5", "Vision")] {
        visit(&cache, &stat_item(id, name)).await;
    }

    let last = cache.last_heroes_visited(5).await;

    assert_eq!(names(&last), vec!["Vision", "Loki", "Storm", "Hulk", "Thor"]);
}

#[tokio::test]
async fn test_recency_window_is_bounded() {
    let (cache, store) = cache();
    for i in 0..12 {
        visit(&cache, &stat_item(&i.to_string(), &format!("Hero {i}"))).await;
        assert!(store.len(RECENT) <= 5);
    }

    let last = cache.last_heroes_visited(10).await;
    assert_eq!(
        names(&last),
        vec!["Hero 11", "Hero 10", "Hero 9", "Hero 8", "Hero 7"]
    );
}

#[tokio::test]
async fn test_revisit_moves_to_front_without_duplicate() {
    let (cache, store) = cache();
    let thor = stat_item("1", "Thor");
    visit(&cache, &thor).await;
    visit(&cache, &stat_item("2", "Hulk")).await;
    visit(&cache, &stat_item("3", "Storm")).await;
    visit(&cache, &thor).await;

    assert_eq!(store.len(RECENT), 3);
    assert_eq!(
        names(&cache.last_heroes_visited(5).await),
        vec!["Thor", "Storm", "Hulk"]
    );
}

#[tokio::test]
async fn test_last_visited_returns_at_most_count() {
    let (cache, _) = cache();
    for i in 0..4 {
        visit(&cache, &stat_item(&i.to_string(), &format!("Hero {i}"))).await;
    }

    assert_eq!(cache.last_heroes_visited(2).await.len(), 2);
    assert!(cache.last_heroes_visited(0).await.is_empty());
}

#[tokio::test]
async fn test_configured_window() {
    let config = HeroesConfig::from_yaml_str("ranking:\n  recent_window: 3\n")
        .unwrap()
        .validated()
        .unwrap();
    let store = InMemorySortedSetStore::new();
    let cache = RankingCache::new(Arc::new(store.clone()), &config.ranking)
        .with_clock(Arc::new(SteppingClock::new(0, 1)));

    for i in 0..6 {
        visit(&cache, &stat_item(&i.to_string(), &format!("Hero {i}"))).await;
    }

    assert_eq!(store.len(RECENT), 3);
}

// ============================================================================
// Popularity
// ============================================================================

#[tokio::test]
async fn test_top_visited_by_count() {
    let (cache, _) = cache();
    let a = stat_item("1", "Thor");
    let b = stat_item("2", "Hulk");
    visit(&cache, &a).await;
    visit(&cache, &b).await;
    visit(&cache, &a).await;
    visit(&cache, &a).await;

    let top = cache.top_heroes_visited(5).await;

    assert_eq!(top.len(), 2);
    assert_eq!(top[0].hero, a);
    assert_eq!(top[0].score, 3);
    assert_eq!(top[1].hero, b);
    assert_eq!(top[1].score, 1);
}

#[tokio::test]
async fn test_popularity_is_never_trimmed() {
    let (cache, store) = cache();
    for i in 0..9 {
        visit(&cache, &stat_item(&i.to_string(), &format!("Hero {i}"))).await;
    }

    assert_eq!(store.len(TOP), 9);
    assert_eq!(cache.top_heroes_visited(3).await.len(), 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_visits_settle_within_window() {
    let (cache, store) = cache();
    let cache = Arc::new(cache);

    let mut handles = Vec::new();
    for i in 0..40 {
        let cache = cache.clone();
        handles.push(tokio::spawn(async move {
            let item = stat_item(&(i % 8).to_string(), &format!("Hero {}", i % 8));
            cache.add_new_hero_visited(&item).await
        }));
    }
    for handle in handles {
        assert!(handle.await.unwrap());
    }

    assert!(store.len(RECENT) <= 5);
    let total: i64 = cache.top_heroes_visited(8).await.iter().map(|t| t.score).sum();
    assert_eq!(total, 40);
}
