use serde::{Deserialize, Serialize};

/// One phrasing of a topic query, as sent to the search service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub text: String,
    /// Topic this phrasing was generated for.
    pub topic: String,
    /// Recency window in whole days (at least 1).
    pub days: u32,
    pub max_results: u32,
}

/// Request body for the `/search` endpoint.
#[derive(Debug, Serialize)]
pub(crate) struct SearchRequest<'a> {
    pub query: &'a str,
    pub topic: &'static str,
    pub days: u32,
    pub max_results: u32,
    pub search_depth: &'static str,
    pub include_answer: bool,
    pub include_raw_content: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchHit>,
}

/// A raw search result before normalization and scoring.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchHit {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    /// Snippet or extracted body text.
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub published_date: Option<String>,
    /// Provider relevance score, if any. Informational only.
    #[serde(default)]
    pub score: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_tolerates_missing_fields() {
        let hit: SearchHit = serde_json::from_str(r#"{"title": "Only a title"}"#).unwrap();
        assert_eq!(hit.title, "Only a title");
        assert!(hit.url.is_empty());
        assert!(hit.published_date.is_none());
    }

    #[test]
    fn response_without_results_is_empty() {
        let resp: SearchResponse = serde_json::from_str(r#"{"query": "x"}"#).unwrap();
        assert!(resp.results.is_empty());
    }
}
