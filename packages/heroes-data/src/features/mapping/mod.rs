//! Result mapping from backend response trees to domain records

pub mod mapper;

pub use mapper::{
    hits_container, map_document, map_hits, map_item_count, map_shape, map_year_and_universe,
    suggestion_container, total_hits, HitShape,
};
