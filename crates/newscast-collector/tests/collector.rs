//! Integration tests for `TavilyClient` and `NewsCollector` using wiremock.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use newscast_collector::{
    CollectorError, CollectorSettings, NewsCollector, SearchQuery, TavilyClient,
};

fn test_client(base_url: &str) -> TavilyClient {
    TavilyClient::with_base_url("tvly-test", 5, "newscast-test/0.1", base_url)
        .expect("client construction should not fail")
}

fn settings(query_timeout: Duration) -> CollectorSettings {
    CollectorSettings {
        results_per_query: 5,
        query_timeout,
        max_in_flight: 2,
        max_articles: 10,
    }
}

fn topics(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| (*s).to_string()).collect()
}

fn results_body(items: &[(&str, &str)]) -> serde_json::Value {
    let results: Vec<serde_json::Value> = items
        .iter()
        .map(|(title, url)| {
            json!({
                "title": title,
                "url": url,
                "content": format!("{title}. Markets moved sharply as traders reacted."),
                "published_date": "2024-10-15T12:00:00Z",
                "score": 0.8
            })
        })
        .collect();
    json!({ "query": "q", "results": results })
}

#[tokio::test]
async fn search_sends_news_request_with_bearer_auth() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .and(header("authorization", "Bearer tvly-test"))
        .and(body_partial_json(json!({
            "query": "markets breaking news today",
            "topic": "news",
            "days": 2,
            "max_results": 5
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(results_body(&[(
            "Markets rally",
            "https://example.com/rally",
        )])))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let query = SearchQuery {
        text: "markets breaking news today".to_string(),
        topic: "markets".to_string(),
        days: 2,
        max_results: 5,
    };
    let hits = client.search(&query).await.expect("search should succeed");

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "Markets rally");
    assert_eq!(hits[0].published_date.as_deref(), Some("2024-10-15T12:00:00Z"));
}

#[tokio::test]
async fn search_maps_non_success_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let query = SearchQuery {
        text: "markets".to_string(),
        topic: "markets".to_string(),
        days: 1,
        max_results: 5,
    };
    let err = client.search(&query).await.unwrap_err();
    assert!(
        matches!(err, CollectorError::UnexpectedStatus { status: 401, .. }),
        "unexpected error: {err}"
    );
}

#[tokio::test]
async fn search_rejects_malformed_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>nope</html>"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let query = SearchQuery {
        text: "markets".to_string(),
        topic: "markets".to_string(),
        days: 1,
        max_results: 5,
    };
    let err = client.search(&query).await.unwrap_err();
    assert!(matches!(err, CollectorError::Deserialize { .. }), "unexpected error: {err}");
}

#[tokio::test]
async fn collect_merges_and_deduplicates_across_phrasings() {
    let server = MockServer::start().await;

    // Every phrasing returns the same two stories, linked with different
    // tracking parameters.
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(results_body(&[
            ("Markets rally on jobs data", "https://example.com/rally?utm_source=feed"),
            ("Bond yields slip", "https://www.example.com/bonds#top"),
        ])))
        .expect(3)
        .mount(&server)
        .await;

    let collector = NewsCollector::new(test_client(&server.uri()), settings(Duration::from_secs(2)));
    let outcome = collector
        .collect_articles(&topics(&["markets"]), Duration::from_secs(48 * 3600))
        .await;

    assert_eq!(outcome.queries_attempted, 3);
    assert_eq!(outcome.queries_failed, 0);
    assert!(!outcome.source_unavailable());
    assert_eq!(outcome.articles.len(), 2);
    let urls: Vec<&str> = outcome.articles.iter().map(|a| a.url.as_str()).collect();
    assert!(urls.contains(&"https://example.com/rally"));
    assert!(urls.contains(&"https://www.example.com/bonds"));
}

#[tokio::test]
async fn collect_counts_partial_failures_without_flagging_source() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .and(body_partial_json(json!({ "query": "markets breaking news today" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(results_body(&[(
            "Markets rally",
            "https://example.com/rally",
        )])))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let collector = NewsCollector::new(test_client(&server.uri()), settings(Duration::from_secs(2)));
    let outcome = collector
        .collect_articles(&topics(&["markets"]), Duration::from_secs(24 * 3600))
        .await;

    assert_eq!(outcome.queries_attempted, 3);
    assert_eq!(outcome.queries_failed, 2);
    assert!(!outcome.source_unavailable());
    assert_eq!(outcome.articles.len(), 1);
}

#[tokio::test]
async fn collect_degrades_to_empty_set_when_every_query_fails() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let collector = NewsCollector::new(test_client(&server.uri()), settings(Duration::from_secs(2)));
    let outcome = collector
        .collect_articles(&topics(&["markets", "climate"]), Duration::from_secs(24 * 3600))
        .await;

    assert_eq!(outcome.queries_attempted, 6);
    assert_eq!(outcome.queries_failed, 6);
    assert!(outcome.source_unavailable());
    assert!(outcome.articles.is_empty());
}

#[tokio::test]
async fn slow_query_is_cut_off_by_per_query_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(results_body(&[("Late story", "https://example.com/late")]))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let collector =
        NewsCollector::new(test_client(&server.uri()), settings(Duration::from_millis(200)));
    let started = std::time::Instant::now();
    let outcome = collector
        .collect_articles(&topics(&["markets"]), Duration::from_secs(24 * 3600))
        .await;

    // Three queries, two in flight at a time: two timeout windows.
    assert!(
        started.elapsed() < Duration::from_secs(2),
        "collection took {:?}",
        started.elapsed()
    );
    assert_eq!(outcome.queries_failed, 3);
    assert!(outcome.source_unavailable());
    assert!(outcome.articles.is_empty());
}

#[tokio::test]
async fn ping_succeeds_against_healthy_service() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .and(body_partial_json(json!({ "max_results": 1 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
        .expect(1)
        .mount(&server)
        .await;

    test_client(&server.uri())
        .ping()
        .await
        .expect("ping should succeed");
}
