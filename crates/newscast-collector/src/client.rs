//! HTTP client for a Tavily-style news search API.
//!
//! One call per query, no internal retry: a query that errors is simply
//! counted as failed by the collector.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::CollectorError;
use crate::types::{SearchHit, SearchQuery, SearchRequest, SearchResponse};

const DEFAULT_BASE_URL: &str = "https://api.tavily.com/";

/// Client for the news search `/search` endpoint.
///
/// Use [`TavilyClient::new`] for production or [`TavilyClient::with_base_url`]
/// to point at a mock server in tests.
pub struct TavilyClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl TavilyClient {
    /// Creates a client pointed at the production search API.
    ///
    /// # Errors
    ///
    /// Returns [`CollectorError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, CollectorError> {
        Self::with_base_url(api_key, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL.
    ///
    /// # Errors
    ///
    /// Returns [`CollectorError::Http`] if the `reqwest::Client` cannot be
    /// constructed, or [`CollectorError::InvalidBaseUrl`] if `base_url` does
    /// not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, CollectorError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.min(5)))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so `join("search")` appends instead of
        // replacing the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| CollectorError::InvalidBaseUrl {
            base_url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
        })
    }

    /// Runs one search query and returns the raw hits.
    ///
    /// # Errors
    ///
    /// - [`CollectorError::Http`] on network failure or timeout.
    /// - [`CollectorError::UnexpectedStatus`] on a non-2xx response.
    /// - [`CollectorError::Deserialize`] if the body does not match the
    ///   expected shape.
    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchHit>, CollectorError> {
        let request = SearchRequest {
            query: &query.text,
            topic: "news",
            days: query.days.max(1),
            max_results: query.max_results,
            search_depth: "basic",
            include_answer: false,
            include_raw_content: false,
        };

        let url = self.endpoint("search")?;
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CollectorError::UnexpectedStatus {
                status: status.as_u16(),
                query: query.text.clone(),
            });
        }

        let body = response.text().await?;
        let parsed: SearchResponse =
            serde_json::from_str(&body).map_err(|e| CollectorError::Deserialize {
                context: format!("search(query={})", query.text),
                source: e,
            })?;

        tracing::debug!(
            query = %query.text,
            topic = %query.topic,
            hits = parsed.results.len(),
            "search query completed"
        );

        Ok(parsed.results)
    }

    /// Cheap reachability probe: a one-result search.
    ///
    /// # Errors
    ///
    /// Same as [`TavilyClient::search`].
    pub async fn ping(&self) -> Result<(), CollectorError> {
        let probe = SearchQuery {
            text: "news".to_string(),
            topic: "health".to_string(),
            days: 1,
            max_results: 1,
        };
        self.search(&probe).await.map(|_| ())
    }

    fn endpoint(&self, path: &str) -> Result<Url, CollectorError> {
        self.base_url
            .join(path)
            .map_err(|e| CollectorError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: e.to_string(),
            })
    }
}
