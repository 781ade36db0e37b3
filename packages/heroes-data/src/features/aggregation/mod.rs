//! Document-store statistics

pub mod pipeline;
pub mod repository;

pub use pipeline::{Accumulator, GroupKey, SortOrder, Stage};
pub use repository::AggregationRepository;
