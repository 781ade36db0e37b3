//! Aggregation pipeline stages
//!
//! Typed stages rendered to the document store's stage documents, plus the
//! fixed pipelines behind the statistics endpoints.

use serde_json::{json, Map, Value};

/// Year of first appearance, stored as text
pub const YEAR_FIELD: &str = "identity.yearAppearance";
pub const UNIVERSE_FIELD: &str = "identity.universe";
pub const POWERS_FIELD: &str = "powers";
/// Domain id (the storage key `_id` is never queried)
pub const ID_FIELD: &str = "id";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    fn as_i32(self) -> i32 {
        match self {
            SortOrder::Ascending => 1,
            SortOrder::Descending => -1,
        }
    }
}

/// Grouping key
#[derive(Debug, Clone, PartialEq)]
pub enum GroupKey {
    /// `"$path"`
    Field(String),
    /// `{ name: "$path", .. }`, in declaration order
    Compound(Vec<(String, String)>),
}

/// Per-group accumulator
#[derive(Debug, Clone, PartialEq)]
pub enum Accumulator {
    /// `{ "$sum": 1 }`
    Count,
    /// `{ "$push": { name: "$path", .. } }`
    Push(Vec<(String, String)>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    /// Keep documents whose `path` is none of `values`; a missing field reads as null
    MatchNotIn { path: String, values: Vec<Value> },
    Group {
        key: GroupKey,
        accumulators: Vec<(String, Accumulator)>,
    },
    /// One output document per element of the array at `path`
    Unwind(String),
    Sort(Vec<(String, SortOrder)>),
    Limit(u64),
}

fn reference(path: &str) -> Value {
    Value::String(format!("${}", path))
}

fn projection(fields: &[(String, String)]) -> Value {
    let map: Map<String, Value> = fields
        .iter()
        .map(|(name, path)| (name.clone(), reference(path)))
        .collect();
    Value::Object(map)
}

impl Stage {
    pub fn to_document(&self) -> Value {
        match self {
            Stage::MatchNotIn { path, values } => {
                json!({ "$match": { path.as_str(): { "$nin": values } } })
            }
            Stage::Group { key, accumulators } => {
                let mut group = Map::new();
                let id = match key {
                    GroupKey::Field(path) => reference(path),
                    GroupKey::Compound(fields) => projection(fields),
                };
                group.insert("_id".to_string(), id);
                for (name, accumulator) in accumulators {
                    let value = match accumulator {
                        Accumulator::Count => json!({ "$sum": 1 }),
                        Accumulator::Push(fields) => json!({ "$push": projection(fields) }),
                    };
                    group.insert(name.clone(), value);
                }
                json!({ "$group": Value::Object(group) })
            }
            Stage::Unwind(path) => json!({ "$unwind": reference(path) }),
            Stage::Sort(keys) => {
                let map: Map<String, Value> = keys
                    .iter()
                    .map(|(path, order)| (path.clone(), json!(order.as_i32())))
                    .collect();
                json!({ "$sort": Value::Object(map) })
            }
            Stage::Limit(n) => json!({ "$limit": n }),
        }
    }
}

pub fn render(stages: &[Stage]) -> Vec<Value> {
    stages.iter().map(Stage::to_document).collect()
}

fn pairs(fields: &[(&str, &str)]) -> Vec<(String, String)> {
    fields
        .iter()
        .map(|(name, path)| (name.to_string(), path.to_string()))
        .collect()
}

// ═══════════════════════════════════════════════════════════════════════════
// Fixed pipelines
// ═══════════════════════════════════════════════════════════════════════════

/// Point-lookup filter on the domain id
pub fn hero_by_id_filter(id: &str) -> Value {
    json!({ ID_FIELD: id })
}

/// filter empty/missing years → group (year, universe) → regroup by year → sort by year
///
/// The year is stored as text, so the final `$sort` is lexicographic. That
/// matches numeric order only for years of equal width; the repository
/// re-sorts on the decoded integer year.
pub fn year_and_universe_pipeline() -> Vec<Stage> {
    vec![
        Stage::MatchNotIn {
            path: YEAR_FIELD.to_string(),
            values: vec![json!(""), Value::Null],
        },
        Stage::Group {
            key: GroupKey::Compound(pairs(&[
                ("yearAppearance", YEAR_FIELD),
                ("universe", UNIVERSE_FIELD),
            ])),
            accumulators: vec![("count".to_string(), Accumulator::Count)],
        },
        Stage::Group {
            key: GroupKey::Field("_id.yearAppearance".to_string()),
            accumulators: vec![(
                "byUniverse".to_string(),
                Accumulator::Push(pairs(&[("universe", "_id.universe"), ("count", "count")])),
            )],
        },
        Stage::Sort(vec![("_id".to_string(), SortOrder::Ascending)]),
    ]
}

/// unwind powers → count per power → most frequent first → first `top`
pub fn top_powers_pipeline(top: u64) -> Vec<Stage> {
    vec![
        Stage::Unwind(POWERS_FIELD.to_string()),
        Stage::Group {
            key: GroupKey::Field(POWERS_FIELD.to_string()),
            accumulators: vec![("count".to_string(), Accumulator::Count)],
        },
        Stage::Sort(vec![("count".to_string(), SortOrder::Descending)]),
        Stage::Limit(top),
    ]
}

/// count per universe, backend order
pub fn by_universe_pipeline() -> Vec<Stage> {
    vec![Stage::Group {
        key: GroupKey::Field(UNIVERSE_FIELD.to_string()),
        accumulators: vec![("count".to_string(), Accumulator::Count)],
    }]
}
