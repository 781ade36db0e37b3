//! Features
//!
//! ```text
//! query ─┐
//!        ├─> search ──────┐
//! mapping┼─> aggregation ─┼─> domain ports ─> infrastructure adapters
//!        └   ranking ─────┘
//! ```

pub mod aggregation;
pub mod mapping;
pub mod query;
pub mod ranking;
pub mod search;
