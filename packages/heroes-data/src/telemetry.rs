//! Operation logging
//!
//! Repositories report through an injected [`Telemetry`] sink instead of a
//! process-wide logger. [`TracingTelemetry`] forwards to `tracing`; hosts
//! install a subscriber once with [`init_subscriber`].

use parking_lot::Mutex;
use tracing_subscriber::EnvFilter;

use crate::error::{Backend, ErrorKind, HeroesError};

/// Structured logging sink for repository operations
pub trait Telemetry: Send + Sync {
    /// An operation is about to call its backend
    fn operation(&self, backend: Backend, operation: &'static str);

    /// A backend call failed; the caller will degrade or propagate
    fn failure(&self, backend: Backend, operation: &'static str, error: &HeroesError);
}

/// Default sink: `tracing` events with `backend`/`operation`/`kind` fields
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingTelemetry;

impl Telemetry for TracingTelemetry {
    fn operation(&self, backend: Backend, operation: &'static str) {
        tracing::info!(backend = backend.as_str(), operation, "backend call");
    }

    fn failure(&self, backend: Backend, operation: &'static str, error: &HeroesError) {
        tracing::error!(
            backend = backend.as_str(),
            operation,
            kind = error.kind.as_str(),
            "error while contacting backend: {}",
            error
        );
    }
}

/// One recorded failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureRecord {
    pub backend: Backend,
    pub operation: &'static str,
    pub kind: ErrorKind,
}

/// Sink that keeps every event in memory, for assertions in tests
#[derive(Debug, Default)]
pub struct RecordingTelemetry {
    operations: Mutex<Vec<(Backend, &'static str)>>,
    failures: Mutex<Vec<FailureRecord>>,
}

impl RecordingTelemetry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn operations(&self) -> Vec<(Backend, &'static str)> {
        self.operations.lock().clone()
    }

    pub fn failures(&self) -> Vec<FailureRecord> {
        self.failures.lock().clone()
    }
}

impl Telemetry for RecordingTelemetry {
    fn operation(&self, backend: Backend, operation: &'static str) {
        self.operations.lock().push((backend, operation));
    }

    fn failure(&self, backend: Backend, operation: &'static str, error: &HeroesError) {
        self.failures.lock().push(FailureRecord {
            backend,
            operation,
            kind: error.kind,
        });
    }
}

/// Install a global fmt subscriber; `RUST_LOG` wins over `default_directive`.
///
/// Fails instead of panicking when a subscriber is already installed.
pub fn init_subscriber(default_directive: &str) -> Result<(), HeroesError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive))
        .map_err(|e| HeroesError::config(format!("invalid log filter: {}", e)))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| HeroesError::internal(format!("tracing subscriber: {}", e)))
}
