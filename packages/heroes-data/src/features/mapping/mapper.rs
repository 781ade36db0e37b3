//! Response normalization
//!
//! Turns backend response trees into domain records. Order is always the
//! backend's order (relevance, suggestion rank, pipeline output); nothing
//! here re-sorts. Missing or mistyped fields fail with a decode error that
//! carries the node; no field is ever filled with a substitute value.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::{ItemCount, YearAndUniverseStat};
use crate::error::{HeroesError, Result};
use crate::shared::document::{required, required_integer, required_list, required_text};
use crate::shared::DocumentNode;

/// Array key holding hit-like nodes in a response container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitShape {
    /// Scored search: `hits.hits[]`
    Hits,
    /// Completion suggester: `suggest.<name>[0].options[]`
    Options,
}

impl HitShape {
    pub fn sub_key(&self) -> &'static str {
        match self {
            HitShape::Hits => "hits",
            HitShape::Options => "options",
        }
    }
}

/// Map every node under `container[sub_key]`, copying each node's `_id`
/// into the `id` field of its `_source` before decoding.
pub fn map_hits<T: DeserializeOwned>(container: &Value, sub_key: &str) -> Result<Vec<T>> {
    required_list(container, sub_key)?
        .iter()
        .map(map_hit)
        .collect()
}

pub fn map_shape<T: DeserializeOwned>(container: &Value, shape: HitShape) -> Result<Vec<T>> {
    map_hits(container, shape.sub_key())
}

fn map_hit<T: DeserializeOwned>(hit: &Value) -> Result<T> {
    let id = required_text(hit, "_id")?;
    let mut source = required(hit, "_source")?.clone();
    let fields = source
        .as_object_mut()
        .ok_or_else(|| HeroesError::malformed("hit '_source' is not an object", hit))?;
    fields.insert("id".to_string(), Value::String(id.to_string()));

    serde_json::from_value(source).map_err(|e| {
        HeroesError::malformed(format!("hit '{}' does not decode: {}", id, e), hit).with_source(e)
    })
}

/// Total hit count, object form (`hits.total.value`) or legacy number (`hits.total`)
pub fn total_hits(response: &Value) -> Result<u64> {
    let total = required(response, "hits.total")?;
    let value = match total.get_field("value") {
        Some(v) => v,
        None => total,
    };
    value
        .as_integer()
        .and_then(|n| u64::try_from(n).ok())
        .ok_or_else(|| HeroesError::malformed("hit total is not a non-negative integer", response))
}

/// The `hits` container of a scored search response
pub fn hits_container(response: &Value) -> Result<&Value> {
    required(response, "hits")
}

/// The first entry of a named suggester, which holds `options`
pub fn suggestion_container<'a>(response: &'a Value, suggester: &str) -> Result<&'a Value> {
    let entries = required(response, "suggest")?
        .get(suggester)
        .ok_or_else(|| {
            HeroesError::malformed(format!("missing suggester '{}'", suggester), response)
        })?;
    entries
        .as_list()
        .and_then(|list| list.first())
        .ok_or_else(|| HeroesError::malformed("suggester entry list is empty", response))
}

/// Decode a stored document, dropping the storage-internal `_id`
pub fn map_document<T: DeserializeOwned>(mut document: Value) -> Result<T> {
    if let Some(fields) = document.as_object_mut() {
        fields.remove("_id");
    }
    serde_json::from_value(document.clone()).map_err(|e| {
        HeroesError::malformed(format!("document does not decode: {}", e), &document)
            .with_source(e)
    })
}

/// `{ "_id": <label>, "count": <n> }`
pub fn map_item_count(document: &Value) -> Result<ItemCount> {
    map_labelled_count(document, "_id", "count")
}

fn map_labelled_count(document: &Value, label_path: &str, count_path: &str) -> Result<ItemCount> {
    let label = required(document, label_path)?;
    let name = match label {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        Value::Number(n) => Some(n.to_string()),
        _ => {
            return Err(HeroesError::malformed(
                format!("field '{}' is not a label", label_path),
                document,
            ))
        }
    };
    let count = required_integer(document, count_path)?;
    let count = u64::try_from(count).map_err(|_| {
        HeroesError::malformed(format!("field '{}' is negative", count_path), document)
    })?;
    Ok(ItemCount { name, count })
}

/// `{ "_id": <year>, "byUniverse": [ { "universe": .., "count": .. } ] }`
pub fn map_year_and_universe(document: &Value) -> Result<YearAndUniverseStat> {
    let year = required_integer(document, "_id")?;
    let year = i32::try_from(year)
        .map_err(|_| HeroesError::malformed("year out of range", document))?;
    let by_universe = required_list(document, "byUniverse")?
        .iter()
        .map(|entry| map_labelled_count(entry, "universe", "count"))
        .collect::<Result<Vec<_>>>()?;

    Ok(YearAndUniverseStat {
        year_appearance: year,
        by_universe,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SearchedHero;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn hit(id: &str, name: &str) -> Value {
        json!({ "_id": id, "_score": 1.0, "_source": { "name": name, "universe": "Earth-616" } })
    }

    #[test]
    fn test_map_hits_copies_id_and_keeps_order() {
        let container = json!({ "hits": [hit("3", "Thor"), hit("1", "Hulk"), hit("2", "Loki")] });
        let heroes: Vec<SearchedHero> = map_hits(&container, "hits").unwrap();

        let ids: Vec<&str> = heroes.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "1", "2"]);
        assert_eq!(heroes[0].name, "Thor");
        assert_eq!(heroes[0].universe.as_deref(), Some("Earth-616"));
    }

    #[test]
    fn test_backend_id_wins_over_source_id() {
        let container = json!({ "options": [
            { "_id": "42", "_source": { "id": "stale", "name": "Vision" } }
        ]});
        let heroes: Vec<SearchedHero> = map_shape(&container, HitShape::Options).unwrap();
        assert_eq!(heroes[0].id, "42");
    }

    #[test]
    fn test_missing_source_fails_with_node() {
        let bad = json!({ "_id": "7" });
        let container = json!({ "hits": [bad.clone()] });
        let err = map_hits::<SearchedHero>(&container, "hits").unwrap_err();
        assert!(err.is_decode());
        assert_eq!(err.node, Some(bad));
    }

    #[test]
    fn test_missing_required_field_is_not_defaulted() {
        let bad = json!({ "_id": "7", "_source": { "universe": "Earth-616" } });
        let container = json!({ "hits": [bad.clone()] });
        let err = map_hits::<SearchedHero>(&container, "hits").unwrap_err();
        assert!(err.is_decode());
        assert_eq!(err.node, Some(bad));
    }

    #[test]
    fn test_missing_sub_key() {
        let err = map_hits::<SearchedHero>(&json!({}), "hits").unwrap_err();
        assert!(err.message.contains("hits"));
    }

    #[test]
    fn test_total_hits_both_shapes() {
        assert_eq!(total_hits(&json!({ "hits": { "total": { "value": 12 } } })).unwrap(), 12);
        assert_eq!(total_hits(&json!({ "hits": { "total": 3 } })).unwrap(), 3);
        assert!(total_hits(&json!({ "hits": { "total": -1 } })).is_err());
        assert!(total_hits(&json!({ "hits": {} })).is_err());
    }

    #[test]
    fn test_suggestion_container() {
        let response = json!({ "suggest": { "hero-suggest": [ { "text": "sp", "options": [] } ] } });
        let container = suggestion_container(&response, "hero-suggest").unwrap();
        assert_eq!(container["text"], json!("sp"));
        assert!(suggestion_container(&response, "other").is_err());
    }

    #[test]
    fn test_map_document_strips_storage_key() {
        let doc = json!({ "_id": { "$oid": "5e1f" }, "id": "1", "name": "Storm" });
        let hero: crate::domain::Hero = map_document(doc).unwrap();
        assert_eq!(hero.id, "1");
        assert_eq!(hero.name, "Storm");
    }

    #[test]
    fn test_map_item_count() {
        let count = map_item_count(&json!({ "_id": "flight", "count": 5 })).unwrap();
        assert_eq!(count, ItemCount::new("flight", 5));

        assert!(map_item_count(&json!({ "_id": "flight", "count": -2 })).is_err());
        assert!(map_item_count(&json!({ "_id": ["x"], "count": 1 })).is_err());
    }

    #[test]
    fn test_null_label_is_unlabelled() {
        let count = map_item_count(&json!({ "_id": null, "count": 3 })).unwrap();
        assert_eq!(count, ItemCount::unlabelled(3));
        assert_eq!(count.name, None);

        // an empty string is still a label
        let count = map_item_count(&json!({ "_id": "", "count": 1 })).unwrap();
        assert_eq!(count.name.as_deref(), Some(""));
    }

    #[test]
    fn test_map_year_and_universe() {
        let doc = json!({
            "_id": "1963",
            "byUniverse": [
                { "universe": "Earth-616", "count": 4 },
                { "universe": "Earth-1610", "count": 1 }
            ]
        });
        let stat = map_year_and_universe(&doc).unwrap();
        assert_eq!(stat.year_appearance, 1963);
        assert_eq!(
            stat.by_universe,
            vec![ItemCount::new("Earth-616", 4), ItemCount::new("Earth-1610", 1)]
        );
    }
}
