//! Hero search and suggestions

pub mod repository;

pub use repository::SearchRepository;
