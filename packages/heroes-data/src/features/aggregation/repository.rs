//! Aggregation Repository
//!
//! Read-only statistics and point lookups over the hero collection.
//! `try_*` operations propagate failures; the plain operations log them and
//! return an empty optional or an empty list.

use std::sync::Arc;

use crate::config::DocumentsConfig;
use crate::domain::{DocumentStoreClient, Hero, ItemCount, YearAndUniverseStat};
use crate::error::{Backend, HeroesError, Result};
use crate::features::mapping::{map_document, map_item_count, map_year_and_universe};
use crate::telemetry::{Telemetry, TracingTelemetry};

use super::pipeline::{
    by_universe_pipeline, hero_by_id_filter, render, top_powers_pipeline,
    year_and_universe_pipeline, Stage,
};

const HERO_BY_ID: &str = "hero_by_id";
const COUNT_BY_YEAR_AND_UNIVERSE: &str = "count_by_year_and_universe";
const TOP_POWERS: &str = "top_powers";
const BY_UNIVERSE: &str = "by_universe";

pub struct AggregationRepository {
    client: Arc<dyn DocumentStoreClient>,
    collection: String,
    telemetry: Arc<dyn Telemetry>,
}

impl AggregationRepository {
    pub fn new(client: Arc<dyn DocumentStoreClient>, config: &DocumentsConfig) -> Self {
        Self {
            client,
            collection: config.collection.clone(),
            telemetry: Arc::new(TracingTelemetry),
        }
    }

    pub fn with_telemetry(mut self, telemetry: Arc<dyn Telemetry>) -> Self {
        self.telemetry = telemetry;
        self
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // Point lookup
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// Hero whose domain `id` equals `id`; absence is `Ok(None)`
    pub async fn try_hero_by_id(&self, id: &str) -> Result<Option<Hero>> {
        self.telemetry.operation(Backend::DocumentStore, HERO_BY_ID);
        let result = async {
            let filter = hero_by_id_filter(id);
            match self.client.find_one(&self.collection, &filter).await? {
                Some(document) => map_document::<Hero>(document).map(Some),
                None => Ok(None),
            }
        }
        .await;
        self.observe(HERO_BY_ID, result)
    }

    pub async fn hero_by_id(&self, id: &str) -> Option<Hero> {
        self.try_hero_by_id(id).await.ok().flatten()
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // Statistics
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// Heroes per (year, universe), years ascending.
    ///
    /// Within a year, universes keep the order the store grouped them in.
    pub async fn try_count_by_year_and_universe(&self) -> Result<Vec<YearAndUniverseStat>> {
        self.telemetry
            .operation(Backend::DocumentStore, COUNT_BY_YEAR_AND_UNIVERSE);
        let result = async {
            let mut stats = self
                .run(&year_and_universe_pipeline())
                .await?
                .iter()
                .map(map_year_and_universe)
                .collect::<Result<Vec<_>>>()?;
            // the store sorts the text year
            stats.sort_by_key(|stat| stat.year_appearance);
            Ok::<_, HeroesError>(stats)
        }
        .await;
        self.observe(COUNT_BY_YEAR_AND_UNIVERSE, result)
    }

    pub async fn count_by_year_and_universe(&self) -> Vec<YearAndUniverseStat> {
        self.try_count_by_year_and_universe()
            .await
            .unwrap_or_default()
    }

    /// The `top` most frequent powers, most frequent first.
    ///
    /// Ties at the cutoff keep the store's order.
    pub async fn try_top_powers(&self, top: usize) -> Result<Vec<ItemCount>> {
        self.telemetry.operation(Backend::DocumentStore, TOP_POWERS);
        if top == 0 {
            return Ok(Vec::new());
        }
        let result = async {
            let mut powers = self.item_counts(&top_powers_pipeline(top as u64)).await?;
            powers.truncate(top);
            Ok::<_, HeroesError>(powers)
        }
        .await;
        self.observe(TOP_POWERS, result)
    }

    pub async fn top_powers(&self, top: usize) -> Vec<ItemCount> {
        self.try_top_powers(top).await.unwrap_or_default()
    }

    /// Heroes per universe, in store order
    pub async fn try_by_universe(&self) -> Result<Vec<ItemCount>> {
        self.telemetry.operation(Backend::DocumentStore, BY_UNIVERSE);
        let result = self.item_counts(&by_universe_pipeline()).await;
        self.observe(BY_UNIVERSE, result)
    }

    pub async fn by_universe(&self) -> Vec<ItemCount> {
        self.try_by_universe().await.unwrap_or_default()
    }

    async fn run(&self, stages: &[Stage]) -> Result<Vec<serde_json::Value>> {
        self.client
            .aggregate(&self.collection, &render(stages))
            .await
    }

    async fn item_counts(&self, stages: &[Stage]) -> Result<Vec<ItemCount>> {
        self.run(stages).await?.iter().map(map_item_count).collect()
    }

    fn observe<T>(&self, operation: &'static str, result: Result<T>) -> Result<T> {
        result.map_err(|e| {
            let e = e.or_backend(Backend::DocumentStore);
            self.telemetry.failure(Backend::DocumentStore, operation, &e);
            e
        })
    }
}
