//! Common test utilities for heroes-data
//!
//! Shared fixtures and backend stubs for the integration tests.

#![allow(dead_code)]

mod fixtures;
mod stubs;

pub use fixtures::*;
pub use stubs::*;
