//! Infrastructure layer - backend adapters
//!
//! - `http_search`: search engine over HTTP (reqwest)
//! - `memory_document_store`: in-process document store with pipeline evaluation
//! - `memory_sorted_set`: in-process sorted-set cache

pub mod http_search;
pub mod memory_document_store;
pub mod memory_sorted_set;

pub use http_search::HttpSearchClient;
pub use memory_document_store::InMemoryDocumentStore;
pub use memory_sorted_set::{rank_window, InMemorySortedSetStore};
