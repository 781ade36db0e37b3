//! Error types for heroes-data
//!
//! Every backend failure is classified by [`ErrorKind`] and tagged with the
//! [`Backend`] it came from, so repositories can log it with both names
//! before applying their degrade policy.

use std::fmt;
use thiserror::Error;

/// Error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network or timeout failure talking to a backend
    Transport,
    /// Malformed or unexpected response shape
    Decode,
    /// Point lookup found nothing (typed callers only)
    NotFound,
    /// Configuration errors
    Config,
    /// Internal errors (bugs)
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Transport => "transport",
            ErrorKind::Decode => "decode",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Config => "config",
            ErrorKind::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Backend a call was issued against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    SearchEngine,
    DocumentStore,
    SortedSetCache,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::SearchEngine => "search_engine",
            Backend::DocumentStore => "document_store",
            Backend::SortedSetCache => "sorted_set_cache",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Data-access error type
#[derive(Debug, Error)]
#[error("[{kind}] {message}")]
pub struct HeroesError {
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
    pub kind: ErrorKind,
    pub backend: Option<Backend>,
    pub message: String,
    /// Offending response node for decode failures
    pub node: Option<serde_json::Value>,
}

impl HeroesError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            backend: None,
            message: message.into(),
            node: None,
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Tag with `backend` unless an adapter already did
    pub fn or_backend(mut self, backend: Backend) -> Self {
        self.backend.get_or_insert(backend);
        self
    }

    pub fn with_node(mut self, node: serde_json::Value) -> Self {
        self.node = Some(node);
        self
    }

    // Convenience constructors
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transport, message)
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Decode, message)
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, format!("Not found: {}", what.into()))
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Decode failure that keeps a copy of the node that could not be read
    pub fn malformed(message: impl Into<String>, node: &serde_json::Value) -> Self {
        Self::decode(message).with_node(node.clone())
    }

    pub fn is_transport(&self) -> bool {
        self.kind == ErrorKind::Transport
    }

    pub fn is_decode(&self) -> bool {
        self.kind == ErrorKind::Decode
    }
}

// JSON error conversions
impl From<serde_json::Error> for HeroesError {
    fn from(err: serde_json::Error) -> Self {
        HeroesError::decode(format!("JSON error: {}", err)).with_source(err)
    }
}

// HTTP error conversions
impl From<reqwest::Error> for HeroesError {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_decode() {
            ErrorKind::Decode
        } else {
            ErrorKind::Transport
        };
        HeroesError::new(kind, format!("HTTP error: {}", err))
            .with_backend(Backend::SearchEngine)
            .with_source(err)
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, HeroesError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::error::Error;

    #[test]
    fn test_error_display() {
        let err = HeroesError::transport("connection refused");
        assert_eq!(format!("{}", err), "[transport] connection refused");
    }

    #[test]
    fn test_decode_error_keeps_node() {
        let node = json!({ "_id": 42 });
        let err = HeroesError::malformed("hit id is not a string", &node);

        assert_eq!(err.kind, ErrorKind::Decode);
        assert!(err.is_decode());
        assert_eq!(err.node, Some(node));
    }

    #[test]
    fn test_not_found() {
        let err = HeroesError::not_found("hero 1009610");
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert!(err.message.contains("1009610"));
        assert!(format!("{}", err).starts_with("[not_found]"));
    }

    #[test]
    fn test_with_backend() {
        let err = HeroesError::transport("timeout").with_backend(Backend::SortedSetCache);
        assert_eq!(err.backend, Some(Backend::SortedSetCache));
        assert!(err.is_transport());
    }

    #[test]
    fn test_with_source() {
        use std::io;

        let io_err = io::Error::new(io::ErrorKind::TimedOut, "socket timed out");
        let err = HeroesError::transport("search failed").with_source(io_err);

        let source = err.source().unwrap();
        assert!(source.to_string().contains("socket timed out"));
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{ not json")
            .err()
            .unwrap();
        let err: HeroesError = json_err.into();

        assert_eq!(err.kind, ErrorKind::Decode);
        assert!(err.message.contains("JSON error"));
        assert!(err.source.is_some());
    }

    #[test]
    fn test_kind_and_backend_names() {
        assert_eq!(ErrorKind::Transport.as_str(), "transport");
        assert_eq!(ErrorKind::Decode.as_str(), "decode");
        assert_eq!(ErrorKind::NotFound.as_str(), "not_found");
        assert_eq!(ErrorKind::Config.as_str(), "config");
        assert_eq!(ErrorKind::Internal.as_str(), "internal");
        assert_eq!(Backend::SearchEngine.as_str(), "search_engine");
        assert_eq!(Backend::DocumentStore.as_str(), "document_store");
        assert_eq!(Backend::SortedSetCache.as_str(), "sorted_set_cache");
    }

    #[test]
    fn test_result_propagation() {
        fn inner() -> Result<()> {
            Err(HeroesError::decode("bad shape"))
        }

        fn outer() -> Result<()> {
            inner()?;
            Ok(())
        }

        let err = outer().unwrap_err();
        assert_eq!(err.kind, ErrorKind::Decode);
    }
}
