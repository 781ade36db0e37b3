//! Backend stubs implementing the ports

use async_trait::async_trait;
use heroes_data::{
    DocumentStoreClient, HeroesError, Result, SearchClient, SortedSetClient,
};
use parking_lot::Mutex;
use serde_json::Value;

/// Search engine returning one fixed response, recording request bodies
pub struct CannedSearch {
    response: Value,
    bodies: Mutex<Vec<Value>>,
}

impl CannedSearch {
    pub fn new(response: Value) -> Self {
        Self {
            response,
            bodies: Mutex::new(Vec::new()),
        }
    }

    pub fn last_body(&self) -> Option<Value> {
        self.bodies.lock().last().cloned()
    }
}

#[async_trait]
impl SearchClient for CannedSearch {
    async fn search(&self, _index: &str, body: &Value) -> Result<Value> {
        self.bodies.lock().push(body.clone());
        Ok(self.response.clone())
    }
}

/// Backend that is down: every call is a transport error
#[derive(Debug, Default, Clone, Copy)]
pub struct Unreachable;

fn refused() -> HeroesError {
    HeroesError::transport("connection refused")
}

#[async_trait]
impl SearchClient for Unreachable {
    async fn search(&self, _index: &str, _body: &Value) -> Result<Value> {
        Err(refused())
    }
}

#[async_trait]
impl DocumentStoreClient for Unreachable {
    async fn find_one(&self, _collection: &str, _filter: &Value) -> Result<Option<Value>> {
        Err(refused())
    }

    async fn aggregate(&self, _collection: &str, _pipeline: &[Value]) -> Result<Vec<Value>> {
        Err(refused())
    }
}

#[async_trait]
impl SortedSetClient for Unreachable {
    async fn increment_or_create(&self, _set: &str, _member: &str, _delta: f64) -> Result<f64> {
        Err(refused())
    }

    async fn insert_with_score(&self, _set: &str, _member: &str, _score: f64) -> Result<i64> {
        Err(refused())
    }

    async fn trim_by_rank(&self, _set: &str, _start: i64, _stop: i64) -> Result<i64> {
        Err(refused())
    }

    async fn range_ascending(&self, _set: &str, _start: i64, _stop: i64) -> Result<Vec<String>> {
        Err(refused())
    }

    async fn range_descending_with_scores(
        &self,
        _set: &str,
        _start: i64,
        _stop: i64,
    ) -> Result<Vec<(String, f64)>> {
        Err(refused())
    }
}
