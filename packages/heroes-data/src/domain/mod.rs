//! Domain Layer
//!
//! Port/Adapter pattern: entities the repositories return, and the traits
//! the backends are reached through.

pub mod models;
pub mod ports;

pub use models::{
    Hero, Identity, ItemCount, PaginatedResults, SearchedHero, StatItem, TopStatItem,
    YearAndUniverseStat, SENTINEL_ID, SENTINEL_NAME,
};
pub use ports::{DocumentStoreClient, SearchClient, SortedSetClient};
