//! Query construction for the search engine

pub mod builder;

pub use builder::{BoostedField, MatchMode, Page, QueryBuilder, HERO_FIELDS};
