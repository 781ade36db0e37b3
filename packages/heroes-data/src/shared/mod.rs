//! Cross-feature building blocks

pub mod document;

pub use document::DocumentNode;
