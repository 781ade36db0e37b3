//! Search Repository
//!
//! Scored, paginated hero search and type-ahead suggestions over the search
//! engine port. Both operations are read-only and safe to retry.
//!
//! Each operation comes in two flavours:
//! - `try_*` returns `Result` and lets the caller see transport/decode errors
//! - the plain name never fails and degrades instead:
//!   `search_heroes` to a one-item page holding the `"-1"` placeholder,
//!   `suggest` to an empty list

use std::sync::Arc;

use crate::config::SearchConfig;
use crate::domain::{PaginatedResults, SearchClient, SearchedHero};
use crate::error::{Backend, HeroesError, Result};
use crate::features::mapping::{
    hits_container, map_shape, suggestion_container, total_hits, HitShape,
};
use crate::features::query::{Page, QueryBuilder};
use crate::telemetry::{Telemetry, TracingTelemetry};

const SEARCH_HEROES: &str = "search_heroes";
const SUGGEST: &str = "suggest";

pub struct SearchRepository {
    client: Arc<dyn SearchClient>,
    index: String,
    queries: QueryBuilder,
    telemetry: Arc<dyn Telemetry>,
}

impl SearchRepository {
    pub fn new(client: Arc<dyn SearchClient>, config: &SearchConfig) -> Self {
        Self {
            client,
            index: config.index.clone(),
            queries: QueryBuilder::from_config(config),
            telemetry: Arc::new(TracingTelemetry),
        }
    }

    pub fn with_telemetry(mut self, telemetry: Arc<dyn Telemetry>) -> Self {
        self.telemetry = telemetry;
        self
    }

    /// One page of heroes matching `term`, in backend relevance order.
    ///
    /// `page_size` and `page` are 1-based and validated by the caller.
    pub async fn try_search_heroes(
        &self,
        term: &str,
        page_size: u32,
        page: u32,
    ) -> Result<PaginatedResults<SearchedHero>> {
        self.telemetry.operation(Backend::SearchEngine, SEARCH_HEROES);
        let request = Page::new(page_size, page);
        let body = self.queries.search(term, request);

        let result = async {
            let response = self.client.search(&self.index, &body).await?;
            let total = total_hits(&response)?;
            let mut items: Vec<SearchedHero> =
                map_shape(hits_container(&response)?, HitShape::Hits)?;
            items.truncate(page_size.max(1) as usize);
            Ok::<_, HeroesError>(PaginatedResults::new(total, page, page_size, items))
        }
        .await;

        self.observe(SEARCH_HEROES, result)
    }

    /// [`try_search_heroes`](Self::try_search_heroes), degrading to the placeholder page
    pub async fn search_heroes(
        &self,
        term: &str,
        page_size: u32,
        page: u32,
    ) -> PaginatedResults<SearchedHero> {
        self.try_search_heroes(term, page_size, page)
            .await
            .unwrap_or_else(|_| PaginatedResults::no_result())
    }

    /// Completion suggestions for a prefix, at most 7, in suggestion rank order
    pub async fn try_suggest(&self, term: &str) -> Result<Vec<SearchedHero>> {
        self.telemetry.operation(Backend::SearchEngine, SUGGEST);
        let body = self.queries.suggest(term);

        let result = async {
            let response = self.client.search(&self.index, &body).await?;
            let container = suggestion_container(&response, self.queries.suggester_name())?;
            let mut heroes: Vec<SearchedHero> = map_shape(container, HitShape::Options)?;
            heroes.truncate(self.queries.suggestion_size());
            Ok::<_, HeroesError>(heroes)
        }
        .await;

        self.observe(SUGGEST, result)
    }

    /// [`try_suggest`](Self::try_suggest), degrading to an empty list
    pub async fn suggest(&self, term: &str) -> Vec<SearchedHero> {
        self.try_suggest(term).await.unwrap_or_default()
    }

    fn observe<T>(&self, operation: &'static str, result: Result<T>) -> Result<T> {
        result.map_err(|e| {
            let e = e.or_backend(Backend::SearchEngine);
            self.telemetry.failure(Backend::SearchEngine, operation, &e);
            e
        })
    }
}
