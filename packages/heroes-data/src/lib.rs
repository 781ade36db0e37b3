//! heroes-data: data-access layer for the heroes service
//!
//! Three repositories over three backends, one domain model:
//!
//! | Repository              | Backend port            | Operations                                   |
//! |-------------------------|-------------------------|----------------------------------------------|
//! | [`SearchRepository`]    | [`SearchClient`]        | `search_heroes`, `suggest`                   |
//! | [`AggregationRepository`] | [`DocumentStoreClient`] | `hero_by_id`, `count_by_year_and_universe`, `top_powers`, `by_universe` |
//! | [`RankingCache`]        | [`SortedSetClient`]     | `add_new_hero_visited`, `last_heroes_visited`, `top_heroes_visited` |
//!
//! ## Failure modes
//!
//! Every operation has a `try_*` form returning [`Result`]. The plain form
//! never fails: it logs through the injected [`Telemetry`] sink and returns
//! a placeholder (`"-1"` / `"No result"` entries, empty lists, `None`,
//! `false`) that callers already key UI states on.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use heroes_data::{HeroesConfig, HttpSearchClient, SearchRepository};
//!
//! let config = HeroesConfig::default().apply_env_overrides().validated()?;
//! let client = Arc::new(HttpSearchClient::new(&config.search)?);
//! let search = SearchRepository::new(client, &config.search);
//!
//! let page = search.search_heroes("spider", 20, 1).await;
//! let names = search.suggest("spi").await;
//! ```

pub mod config;
pub mod domain;
pub mod error;
pub mod features;
pub mod infrastructure;
pub mod shared;
pub mod telemetry;

pub use config::{ConfigError, HeroesConfig, Validatable};
pub use domain::{
    DocumentStoreClient, Hero, Identity, ItemCount, PaginatedResults, SearchClient, SearchedHero,
    SortedSetClient, StatItem, TopStatItem, YearAndUniverseStat,
};
pub use error::{Backend, ErrorKind, HeroesError, Result};
pub use features::aggregation::AggregationRepository;
pub use features::query::{MatchMode, Page, QueryBuilder};
pub use features::ranking::{RankingCache, SteppingClock, SystemClock, VisitClock};
pub use features::search::SearchRepository;
pub use infrastructure::{HttpSearchClient, InMemoryDocumentStore, InMemorySortedSetStore};
pub use shared::DocumentNode;
pub use telemetry::{init_subscriber, Telemetry, TracingTelemetry};
