//! Response and document fixtures

use heroes_data::StatItem;
use serde_json::{json, Value};

/// One scored-search hit
pub fn fixture_hit(id: &str, name: &str) -> Value {
    json!({
        "_index": "heroes",
        "_id": id,
        "_score": 1.0,
        "_source": {
            "name": name,
            "imageUrl": format!("https://img.local/{id}.jpg"),
            "universe": "Earth-616",
            "aliases": "",
            "description": format!("{name} description"),
        }
    })
}

/// Scored-search response with an object-form total
pub fn fixture_search_response(total: u64, names: &[&str]) -> Value {
    let hits: Vec<Value> = names
        .iter()
        .enumerate()
        .map(|(i, name)| fixture_hit(&(i + 1).to_string(), name))
        .collect();
    json!({
        "took": 3,
        "hits": {
            "total": { "value": total, "relation": "eq" },
            "hits": hits,
        }
    })
}

/// Completion response carrying `n` options under `suggester`
pub fn fixture_suggest_response(suggester: &str, n: usize) -> Value {
    let options: Vec<Value> = (0..n)
        .map(|i| {
            json!({
                "text": format!("Spider {i}"),
                "_id": format!("s{i}"),
                "_score": 1.0,
                "_source": { "name": format!("Spider {i}") },
            })
        })
        .collect();
    json!({
        "suggest": {
            suggester: [{ "text": "spi", "offset": 0, "length": 3, "options": options }]
        }
    })
}

/// Hero document as the import writes it
pub fn fixture_hero_document(id: &str, name: &str, universe: &str, year: &str, powers: &[&str]) -> Value {
    json!({
        "id": id,
        "name": name,
        "imageUrl": format!("https://img.local/{id}.jpg"),
        "description": "",
        "identity": {
            "secretIdentities": [],
            "aliases": [],
            "yearAppearance": year,
            "universe": universe,
        },
        "powers": powers,
        "partners": [],
    })
}

/// flight ×5, strength ×5, telepathy ×2 across three universes and years
pub fn fixture_heroes_collection() -> Vec<Value> {
    vec![
        fixture_hero_document("1", "Thor", "Earth-616", "1962", &["flight", "strength"]),
        fixture_hero_document("2", "Storm", "Earth-616", "1975", &["flight"]),
        fixture_hero_document("3", "Jean Grey", "Earth-616", "1963", &["flight", "telepathy"]),
        fixture_hero_document("4", "Hulk", "Earth-616", "1962", &["strength"]),
        fixture_hero_document("5", "Xavier", "Earth-1610", "1963", &["telepathy"]),
        fixture_hero_document("6", "Vision", "Earth-616", "", &["flight", "strength"]),
        fixture_hero_document("7", "Ultimate Thor", "Earth-1610", "1962", &["flight", "strength"]),
        fixture_hero_document("8", "Colossus", "Earth-1610", "1975", &["strength"]),
    ]
}

pub fn stat_item(id: &str, name: &str) -> StatItem {
    StatItem::new(id, name, format!("https://img.local/{id}.jpg"), "")
}
