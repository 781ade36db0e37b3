//! Recency and popularity ranking of hero visits

pub mod cache;
pub mod clock;

pub use cache::RankingCache;
pub use clock::{SteppingClock, SystemClock, VisitClock};
