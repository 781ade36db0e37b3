//! In-Memory Document Store
//!
//! Evaluates the subset of stage documents the aggregation pipelines emit:
//!
//! | Stage     | Supported form                                        |
//! |-----------|-------------------------------------------------------|
//! | `$match`  | `{ path: value }`, `$ne: value`, `$nin: [values]`     |
//! | `$group`  | `_id` as `"$path"`, literal or object; `$sum`, `$push` |
//! | `$unwind` | `"$path"`                                             |
//! | `$sort`   | `{ path: 1 \| -1, .. }`, stable                        |
//! | `$limit`  | non-negative integer                                  |
//!
//! Groups come out in the order their key was first seen. Documents
//! without `_id` get a generated one on insert.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::{json, Map, Value};

use crate::domain::DocumentStoreClient;
use crate::error::{Backend, HeroesError, Result};
use crate::shared::DocumentNode;

#[derive(Clone, Default)]
pub struct InMemoryDocumentStore {
    collections: Arc<RwLock<HashMap<String, Vec<Value>>>>,
    next_id: Arc<AtomicU64>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_documents(self, collection: &str, documents: impl IntoIterator<Item = Value>) -> Self {
        for document in documents {
            self.insert(collection, document);
        }
        self
    }

    pub fn insert(&self, collection: &str, mut document: Value) {
        if let Value::Object(map) = &mut document {
            if !map.contains_key("_id") {
                let seq = self.next_id.fetch_add(1, AtomicOrdering::SeqCst);
                map.insert("_id".to_string(), json!(format!("{:024x}", seq)));
            }
        }
        self.collections
            .write()
            .entry(collection.to_string())
            .or_default()
            .push(document);
    }

    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .get(collection)
            .map_or(0, Vec::len)
    }

    fn snapshot(&self, collection: &str) -> Vec<Value> {
        self.collections
            .read()
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl DocumentStoreClient for InMemoryDocumentStore {
    async fn find_one(&self, collection: &str, filter: &Value) -> Result<Option<Value>> {
        let conditions = filter.as_object().ok_or_else(|| unsupported("filter must be an object", filter))?;
        let guard = self.collections.read();
        let found = guard.get(collection).and_then(|documents| {
            documents.iter().find(|document| {
                conditions
                    .iter()
                    .all(|(path, condition)| matches_condition(document, path, condition))
            })
        });
        Ok(found.cloned())
    }

    async fn aggregate(&self, collection: &str, pipeline: &[Value]) -> Result<Vec<Value>> {
        pipeline
            .iter()
            .try_fold(self.snapshot(collection), |documents, stage| apply_stage(documents, stage))
    }
}

fn unsupported(message: &str, node: &Value) -> HeroesError {
    HeroesError::malformed(message, node).with_backend(Backend::DocumentStore)
}

// ═══════════════════════════════════════════════════════════════════════════
// Stage evaluation
// ═══════════════════════════════════════════════════════════════════════════

fn apply_stage(documents: Vec<Value>, stage: &Value) -> Result<Vec<Value>> {
    let (operator, operand) = match stage.as_object() {
        Some(map) if map.len() == 1 => map.iter().next().ok_or_else(|| unsupported("empty stage", stage))?,
        _ => return Err(unsupported("stage must have exactly one operator", stage)),
    };

    match operator.as_str() {
        "$match" => {
            let conditions = operand.as_object().ok_or_else(|| unsupported("$match needs an object", stage))?;
            Ok(documents
                .into_iter()
                .filter(|document| {
                    conditions
                        .iter()
                        .all(|(path, condition)| matches_condition(document, path, condition))
                })
                .collect())
        }
        "$group" => group(documents, operand, stage),
        "$unwind" => {
            let path = field_reference(operand).ok_or_else(|| unsupported("$unwind needs a field path", stage))?;
            Ok(unwind(documents, path))
        }
        "$sort" => {
            let keys = operand.as_object().ok_or_else(|| unsupported("$sort needs an object", stage))?;
            let keys = keys
                .iter()
                .map(|(path, order)| match order.as_integer() {
                    Some(1) => Ok((path.as_str(), false)),
                    Some(-1) => Ok((path.as_str(), true)),
                    _ => Err(unsupported("sort order must be 1 or -1", stage)),
                })
                .collect::<Result<Vec<_>>>()?;
            let mut documents = documents;
            documents.sort_by(|a, b| {
                keys.iter()
                    .map(|(path, descending)| {
                        let ordering = compare_values(a.get_field(path), b.get_field(path));
                        if *descending {
                            ordering.reverse()
                        } else {
                            ordering
                        }
                    })
                    .find(|ordering| *ordering != Ordering::Equal)
                    .unwrap_or(Ordering::Equal)
            });
            Ok(documents)
        }
        "$limit" => {
            let limit = operand
                .as_u64()
                .ok_or_else(|| unsupported("$limit needs a non-negative integer", stage))?;
            let mut documents = documents;
            documents.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
            Ok(documents)
        }
        _ => Err(unsupported("unsupported stage operator", stage)),
    }
}

static NULL: Value = Value::Null;

/// Missing fields compare as null, so `{ "$nin": [null] }` drops them too
fn matches_condition(document: &Value, path: &str, condition: &Value) -> bool {
    let actual = document.get_field(path).unwrap_or(&NULL);
    let operators = condition.as_object();
    if let Some(excluded) = operators.and_then(|c| c.get("$ne")) {
        return actual != excluded;
    }
    if let Some(excluded) = operators.and_then(|c| c.get("$nin")).and_then(Value::as_array) {
        return !excluded.contains(actual);
    }
    document.get_field(path) == Some(condition)
}

/// `"$a.b"` → `a.b`
fn field_reference(expr: &Value) -> Option<&str> {
    expr.as_text().and_then(|s| s.strip_prefix('$'))
}

fn evaluate(expr: &Value, document: &Value) -> Value {
    match expr {
        Value::String(_) => match field_reference(expr) {
            Some(path) => document.get_field(path).cloned().unwrap_or(Value::Null),
            None => expr.clone(),
        },
        Value::Object(fields) => Value::Object(
            fields
                .iter()
                .map(|(name, inner)| (name.clone(), evaluate(inner, document)))
                .collect(),
        ),
        _ => expr.clone(),
    }
}

enum GroupOp<'a> {
    Sum(&'a Value),
    Push(&'a Value),
}

fn group(documents: Vec<Value>, operand: &Value, stage: &Value) -> Result<Vec<Value>> {
    let operand = operand.as_object().ok_or_else(|| unsupported("$group needs an object", stage))?;
    let key_expr = operand.get("_id").ok_or_else(|| unsupported("$group needs an _id", stage))?;

    let ops = operand
        .iter()
        .filter(|(name, _)| name.as_str() != "_id")
        .map(|(name, accumulator)| {
            let op = accumulator.as_object().filter(|a| a.len() == 1).and_then(|a| {
                a.get("$sum")
                    .map(GroupOp::Sum)
                    .or_else(|| a.get("$push").map(GroupOp::Push))
            });
            op.map(|op| (name.as_str(), op))
                .ok_or_else(|| unsupported("unsupported accumulator", stage))
        })
        .collect::<Result<Vec<_>>>()?;

    // Linear key lookup keeps first-seen order without hashing JSON values
    let mut groups: Vec<(Value, Map<String, Value>)> = Vec::new();
    for document in &documents {
        let key = evaluate(key_expr, document);
        let position = match groups.iter().position(|(existing, _)| *existing == key) {
            Some(position) => position,
            None => {
                let mut output = Map::new();
                output.insert("_id".to_string(), key.clone());
                for (name, op) in &ops {
                    let initial = match op {
                        GroupOp::Sum(_) => json!(0),
                        GroupOp::Push(_) => json!([]),
                    };
                    output.insert(name.to_string(), initial);
                }
                groups.push((key, output));
                groups.len() - 1
            }
        };

        let output = &mut groups[position].1;
        for (name, op) in &ops {
            let slot = output.entry(name.to_string()).or_insert(Value::Null);
            match op {
                GroupOp::Sum(expr) => {
                    let addend = evaluate(expr, document);
                    *slot = add_numbers(slot, &addend);
                }
                GroupOp::Push(expr) => {
                    if let Value::Array(items) = slot {
                        items.push(evaluate(expr, document));
                    }
                }
            }
        }
    }

    Ok(groups.into_iter().map(|(_, output)| Value::Object(output)).collect())
}

/// Integer sum when both sides are integers; non-numeric addends count as zero
fn add_numbers(total: &Value, addend: &Value) -> Value {
    match (total.as_i64(), addend.as_i64()) {
        (Some(a), Some(b)) => json!(a.saturating_add(b)),
        _ => {
            let a = total.as_f64().unwrap_or(0.0);
            match addend.as_f64() {
                Some(b) => json!(a + b),
                None => total.clone(),
            }
        }
    }
}

fn unwind(documents: Vec<Value>, path: &str) -> Vec<Value> {
    let mut output = Vec::with_capacity(documents.len());
    for document in documents {
        match document.get_field(path).cloned() {
            Some(Value::Array(items)) => {
                for item in items {
                    let mut copy = document.clone();
                    set_field(&mut copy, path, item);
                    output.push(copy);
                }
            }
            None | Some(Value::Null) => {}
            Some(_) => output.push(document),
        }
    }
    output
}

fn set_field(document: &mut Value, path: &str, value: Value) {
    let Value::Object(map) = document else { return };
    match path.split_once('.') {
        None => {
            map.insert(path.to_string(), value);
        }
        Some((head, rest)) => {
            let child = map
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            set_field(child, rest, value);
        }
    }
}

/// Missing < null < numbers < text < anything else
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(value: Option<&Value>) -> u8 {
        match value {
            None => 0,
            Some(Value::Null) => 1,
            Some(Value::Number(_)) => 2,
            Some(Value::String(_)) => 3,
            Some(_) => 4,
        }
    }

    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.total_cmp(&y)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}
