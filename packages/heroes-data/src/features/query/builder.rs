//! Search engine query documents
//!
//! Every request body the search repository sends is produced by
//! [`QueryBuilder::build`]; the mode decides the query shape:
//!
//! ```text
//! Wildcard          query_string over keyword fields   "*iron*man*"
//! Fuzzy             multi_match over analyzed fields   fuzziness AUTO
//! PrefixCompletion  completion suggester               pre-indexed field
//! ```

use serde_json::{json, Value};

use crate::config::{SearchConfig, MAX_SUGGESTIONS};

/// A field and its relevance weight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoostedField {
    pub name: &'static str,
    pub boost: u32,
}

/// Scored fields, name > aliases/identities > description > partners
pub const HERO_FIELDS: [BoostedField; 5] = [
    BoostedField { name: "name", boost: 4 },
    BoostedField { name: "aliases", boost: 3 },
    BoostedField { name: "secretIdentities", boost: 3 },
    BoostedField { name: "description", boost: 2 },
    BoostedField { name: "partners", boost: 1 },
];

/// Source fields returned with each suggestion option
const SUGGEST_SOURCE: [&str; 5] = ["name", "imageUrl", "universe", "aliases", "description"];

/// Characters with meaning in `query_string` syntax
const RESERVED: &[char] = &[
    '+', '-', '=', '&', '|', '>', '<', '!', '(', ')', '{', '}', '[', ']', '^', '"', '~', '*',
    '?', ':', '\\', '/',
];

/// Matching strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    Wildcard,
    Fuzzy,
    PrefixCompletion,
}

impl MatchMode {
    /// Scored-search mode for a raw input: blank matches everything.
    pub fn for_term(term: &str) -> Self {
        if term.trim().is_empty() {
            MatchMode::Wildcard
        } else {
            MatchMode::Fuzzy
        }
    }
}

/// Page request, both values 1-based and caller-validated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub size: u32,
    pub number: u32,
}

impl Page {
    pub fn new(size: u32, number: u32) -> Self {
        Self { size, number }
    }

    /// `size * (number - 1)`; page 0 is read as page 1
    pub fn offset(&self) -> u64 {
        u64::from(self.size) * u64::from(self.number.saturating_sub(1))
    }
}

/// Builds request bodies for the hero index
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    suggester_name: String,
    completion_field: String,
    suggestion_size: usize,
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self::from_config(&SearchConfig::default())
    }
}

impl QueryBuilder {
    pub fn from_config(config: &SearchConfig) -> Self {
        Self {
            suggester_name: config.suggester_name.clone(),
            completion_field: config.completion_field.clone(),
            suggestion_size: config.suggestion_size.clamp(1, MAX_SUGGESTIONS),
        }
    }

    pub fn suggester_name(&self) -> &str {
        &self.suggester_name
    }

    pub fn suggestion_size(&self) -> usize {
        self.suggestion_size
    }

    /// Build the request body for `term` in the given mode.
    ///
    /// `page` only applies to the scored modes; completion requests are
    /// bounded by the configured suggestion size.
    pub fn build(&self, mode: MatchMode, term: &str, page: Page) -> Value {
        match mode {
            MatchMode::Wildcard => json!({
                "from": page.offset(),
                "size": page.size,
                "query": {
                    "query_string": {
                        "fields": boosted_fields(".keyword"),
                        "query": wildcard_pattern(term),
                    }
                }
            }),
            MatchMode::Fuzzy => json!({
                "from": page.offset(),
                "size": page.size,
                "query": {
                    "multi_match": {
                        "query": term.trim(),
                        "fields": boosted_fields(""),
                        "fuzziness": "AUTO",
                        "prefix_length": 1,
                    }
                }
            }),
            MatchMode::PrefixCompletion => {
                let mut suggest = serde_json::Map::new();
                suggest.insert(
                    self.suggester_name.clone(),
                    json!({
                        "prefix": term,
                        "completion": {
                            "field": self.completion_field,
                            "size": self.suggestion_size,
                            "skip_duplicates": true,
                        }
                    }),
                );
                json!({
                    "_source": SUGGEST_SOURCE,
                    "suggest": Value::Object(suggest),
                })
            }
        }
    }

    /// Scored search, mode picked from the input
    pub fn search(&self, term: &str, page: Page) -> Value {
        self.build(MatchMode::for_term(term), term, page)
    }

    /// Completion request
    pub fn suggest(&self, term: &str) -> Value {
        self.build(
            MatchMode::PrefixCompletion,
            term,
            Page::new(self.suggestion_size as u32, 1),
        )
    }
}

fn boosted_fields(suffix: &str) -> Vec<String> {
    HERO_FIELDS
        .iter()
        .map(|f| match f.boost {
            1 => format!("{}{}", f.name, suffix),
            boost => format!("{}{}^{}", f.name, suffix, boost),
        })
        .collect()
}

/// `*term*` with inner whitespace runs turned into `*`
fn wildcard_pattern(term: &str) -> String {
    let words: Vec<String> = term.split_whitespace().map(escape_reserved).collect();
    if words.is_empty() {
        return "*".to_string();
    }
    format!("*{}*", words.join("*"))
}

fn escape_reserved(word: &str) -> String {
    let mut escaped = String::with_capacity(word.len());
    for c in word.chars() {
        if RESERVED.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
