//! Structural access to backend response trees
//!
//! Mapping and aggregation code never indexes a JSON tree directly; it goes
//! through [`DocumentNode`] so the path syntax and the numeric leniency
//! (numbers stored as text by the import scripts) live in one place.

use serde_json::Value;

use crate::error::{HeroesError, Result};

/// Read-only, path-addressed view over a response node
pub trait DocumentNode: Sized {
    /// Resolve a dot-separated path (`identity.universe`, `suggest.hero-suggest.0`).
    ///
    /// Numeric segments index into arrays.
    fn get_field(&self, path: &str) -> Option<&Self>;

    fn as_text(&self) -> Option<&str>;

    /// Integer value; numeric strings are accepted
    fn as_integer(&self) -> Option<i64>;

    fn as_list(&self) -> Option<&[Self]>;

    fn is_null(&self) -> bool;
}

impl DocumentNode for Value {
    fn get_field(&self, path: &str) -> Option<&Value> {
        if path.is_empty() {
            return Some(self);
        }
        path.split('.').try_fold(self, |node, segment| match node {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
    }

    fn as_text(&self) -> Option<&str> {
        self.as_str()
    }

    fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Number(n) => n.as_i64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && f.is_finite())
                    .map(|f| f as i64)
            }),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        }
    }

    fn as_list(&self) -> Option<&[Value]> {
        self.as_array().map(Vec::as_slice)
    }

    fn is_null(&self) -> bool {
        Value::is_null(self)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Required-field helpers (decode failures carry the offending node)
// ═══════════════════════════════════════════════════════════════════════════

pub fn required<'a>(node: &'a Value, path: &str) -> Result<&'a Value> {
    node.get_field(path)
        .ok_or_else(|| HeroesError::malformed(format!("missing field '{}'", path), node))
}

pub fn required_text<'a>(node: &'a Value, path: &str) -> Result<&'a str> {
    required(node, path)?
        .as_text()
        .ok_or_else(|| HeroesError::malformed(format!("field '{}' is not text", path), node))
}

pub fn required_integer(node: &Value, path: &str) -> Result<i64> {
    required(node, path)?
        .as_integer()
        .ok_or_else(|| HeroesError::malformed(format!("field '{}' is not an integer", path), node))
}

pub fn required_list<'a>(node: &'a Value, path: &str) -> Result<&'a [Value]> {
    required(node, path)?
        .as_list()
        .ok_or_else(|| HeroesError::malformed(format!("field '{}' is not a list", path), node))
}
