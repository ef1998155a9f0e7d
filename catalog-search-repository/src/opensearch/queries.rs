//! OpenSearch query builders.
//!
//! This module provides functions to build search bodies from a
//! [`SearchQuery`], one per matching mode.

use serde_json::{json, Value};

use catalog_search_shared::{SearchMode, SearchQuery};

/// Build the full search body for a query.
///
/// - Relevance mode: weighted `multi_match` across title, brand,
///   category, and description with AUTO fuzziness, ranked by score.
/// - Wildcard mode: case-insensitive substring containment against the
///   raw title and category, no relevance scoring.
pub fn build_search_body(query: &SearchQuery) -> Value {
    let mut body = match query.mode {
        SearchMode::Relevance => build_relevance_query(&query.query),
        SearchMode::Wildcard => build_wildcard_query(&query.query),
    };

    body["size"] = json!(query.size);
    body["sort"] = json!([{ "_score": { "order": "desc" } }]);
    body
}

/// Build the relevance-ranked query.
///
/// Field weights: title is boosted highest, then brand and category,
/// with description unboosted. AUTO fuzziness tolerates minor typos
/// (1-2 chars: 0 edits, 3-4 chars: 1 edit, 5+ chars: 2 edits).
fn build_relevance_query(query_text: &str) -> Value {
    json!({
        "query": {
            "multi_match": {
                "query": query_text,
                "fields": [
                    "title^3",
                    "brand^2",
                    "category^2",
                    "description"
                ],
                "type": "best_fields",
                "fuzziness": "AUTO"
            }
        }
    })
}

/// Build the substring-containment query.
///
/// Matches against the keyword subfields so the pattern spans the whole
/// value rather than individual analyzed tokens. Category matches are
/// boosted above title matches, mirroring the relevance weights.
fn build_wildcard_query(query_text: &str) -> Value {
    let pattern = format!("*{}*", escape_wildcard(query_text));
    json!({
        "query": {
            "bool": {
                "should": [
                    {
                        "wildcard": {
                            "title.raw": {
                                "value": pattern,
                                "case_insensitive": true
                            }
                        }
                    },
                    {
                        "wildcard": {
                            "category.raw": {
                                "value": pattern,
                                "case_insensitive": true,
                                "boost": 2.0
                            }
                        }
                    }
                ],
                "minimum_should_match": 1
            }
        }
    })
}

/// Escape wildcard metacharacters in user input so they match
/// literally.
fn escape_wildcard(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('*', "\\*")
        .replace('?', "\\?")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relevance_body_fields_and_fuzziness() {
        let body = build_search_body(&SearchQuery::relevance("laptop", 20));

        let multi_match = &body["query"]["multi_match"];
        assert_eq!(multi_match["query"], "laptop");
        assert_eq!(multi_match["fuzziness"], "AUTO");

        let fields = multi_match["fields"].as_array().unwrap();
        assert_eq!(fields[0], "title^3");
        assert!(fields.iter().any(|f| f == "brand^2"));
        assert!(fields.iter().any(|f| f == "category^2"));
        assert!(fields.iter().any(|f| f == "description"));
    }

    #[test]
    fn test_body_carries_size_and_score_sort() {
        let body = build_search_body(&SearchQuery::relevance("lamp", 7));

        assert_eq!(body["size"], 7);
        assert_eq!(body["sort"][0]["_score"]["order"], "desc");
    }

    #[test]
    fn test_wildcard_body_targets_raw_fields() {
        let body = build_search_body(&SearchQuery::wildcard("lap", 10));

        let should = body["query"]["bool"]["should"].as_array().unwrap();
        assert_eq!(should.len(), 2);
        assert_eq!(should[0]["wildcard"]["title.raw"]["value"], "*lap*");
        assert_eq!(
            should[0]["wildcard"]["title.raw"]["case_insensitive"],
            true
        );
        assert_eq!(should[1]["wildcard"]["category.raw"]["value"], "*lap*");
        assert_eq!(body["query"]["bool"]["minimum_should_match"], 1);
    }

    #[test]
    fn test_wildcard_escapes_metacharacters() {
        let body = build_search_body(&SearchQuery::wildcard("50*?", 10));

        assert_eq!(
            body["query"]["bool"]["should"][0]["wildcard"]["title.raw"]["value"],
            "*50\\*\\?*"
        );
    }
}
