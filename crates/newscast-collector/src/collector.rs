//! Concurrent collection, deduplication, and ranking.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use newscast_core::{Article, ArticleCollector, ArticleSet, CollectionOutcome};

use crate::client::TavilyClient;
use crate::error::CollectorError;
use crate::normalize::{
    canonical_url, clean_text, parse_published, source_host, title_key, url_key,
};
use crate::queries::build_queries;
use crate::scoring::{combined_score, quality_score, recency_score, relevance_score};
use crate::types::{SearchHit, SearchQuery};

/// Tunables for one collector instance.
#[derive(Debug, Clone, Copy)]
pub struct CollectorSettings {
    pub results_per_query: u32,
    /// Hard ceiling for each individual query, including connect time.
    pub query_timeout: Duration,
    /// Maximum concurrent search requests per collection.
    pub max_in_flight: usize,
    /// Size cap of the returned [`ArticleSet`].
    pub max_articles: usize,
}

impl Default for CollectorSettings {
    fn default() -> Self {
        Self {
            results_per_query: 5,
            query_timeout: Duration::from_secs(6),
            max_in_flight: 6,
            max_articles: 12,
        }
    }
}

/// Article collector backed by [`TavilyClient`].
pub struct NewsCollector {
    client: TavilyClient,
    settings: CollectorSettings,
}

impl NewsCollector {
    #[must_use]
    pub fn new(client: TavilyClient, settings: CollectorSettings) -> Self {
        Self { client, settings }
    }

    /// Issue every topic/phrasing query, at most `max_in_flight` at a time,
    /// each bounded by `query_timeout`, then merge and rank.
    ///
    /// Failed or timed-out queries are logged and counted, never propagated.
    pub async fn collect_articles(
        &self,
        topics: &[String],
        recency_window: Duration,
    ) -> CollectionOutcome {
        let queries = build_queries(topics, recency_window, self.settings.results_per_query);
        let queries_attempted = queries.len();
        let timeout = self.settings.query_timeout;

        let results: Vec<(SearchQuery, Result<Vec<SearchHit>, CollectorError>)> =
            stream::iter(queries)
                .map(|query| async move {
                    let outcome =
                        match tokio::time::timeout(timeout, self.client.search(&query)).await {
                            Ok(result) => result,
                            Err(_) => Err(CollectorError::Timeout {
                                query: query.text.clone(),
                                timeout_ms: timeout.as_millis(),
                            }),
                        };
                    (query, outcome)
                })
                .buffer_unordered(self.settings.max_in_flight.max(1))
                .collect()
                .await;

        let mut queries_failed = 0usize;
        let mut hits: Vec<(String, SearchHit)> = Vec::new();
        for (query, outcome) in results {
            match outcome {
                Ok(found) => {
                    hits.extend(found.into_iter().map(|hit| (query.topic.clone(), hit)));
                }
                Err(e) => {
                    queries_failed += 1;
                    tracing::warn!(
                        query = %query.text,
                        topic = %query.topic,
                        error = %e,
                        "search query failed"
                    );
                }
            }
        }

        let raw_hits = hits.len();
        let articles = rank_articles(topics, hits, Utc::now(), self.settings.max_articles);

        if queries_attempted > 0 && queries_failed == queries_attempted {
            tracing::warn!(
                queries = queries_attempted,
                "every search query failed; continuing without sources"
            );
        } else {
            tracing::info!(
                queries = queries_attempted,
                failed = queries_failed,
                raw_hits,
                articles = articles.len(),
                "collected articles"
            );
        }

        CollectionOutcome {
            articles,
            queries_attempted,
            queries_failed,
        }
    }
}

#[async_trait]
impl ArticleCollector for NewsCollector {
    async fn collect(&self, topics: &[String], recency_window: Duration) -> CollectionOutcome {
        self.collect_articles(topics, recency_window).await
    }
}

struct Candidate {
    article: Article,
    url_key: String,
    title_key: String,
}

fn build_candidate(
    topics: &[String],
    topic: String,
    hit: SearchHit,
    now: DateTime<Utc>,
) -> Option<Candidate> {
    let title = clean_text(&hit.title);
    if title.is_empty() {
        return None;
    }
    let url = canonical_url(&hit.url)?;
    let body = clean_text(&hit.content);
    let source = source_host(&url);
    let published_at = hit.published_date.as_deref().and_then(parse_published);

    let relevance = relevance_score(topics, &title, &body);
    let recency = recency_score(published_at, now);
    let quality = quality_score(&title, &body, &source);

    Some(Candidate {
        url_key: url_key(&url),
        title_key: title_key(&title, &source),
        article: Article {
            title,
            body,
            url: url.to_string(),
            source,
            topic,
            published_at,
            relevance_score: relevance,
            recency_score: recency,
            quality_score: quality,
            combined_score: combined_score(relevance, recency, quality),
        },
    })
}

/// Highest combined score first; ties go to the more recent article, then
/// to URL order so the ranking is deterministic.
fn rank_order(a: &Article, b: &Article) -> Ordering {
    b.combined_score
        .total_cmp(&a.combined_score)
        .then_with(|| b.recency_score.total_cmp(&a.recency_score))
        .then_with(|| b.published_at.cmp(&a.published_at))
        .then_with(|| a.url.cmp(&b.url))
}

/// Score, rank, deduplicate, and truncate merged hits.
///
/// Deduplication runs after ranking, so of two hits sharing a URL key or a
/// title key the better-ranked one survives. No two returned articles share
/// either key.
#[must_use]
pub fn rank_articles(
    topics: &[String],
    hits: Vec<(String, SearchHit)>,
    now: DateTime<Utc>,
    max_articles: usize,
) -> ArticleSet {
    let mut candidates: Vec<Candidate> = hits
        .into_iter()
        .filter_map(|(topic, hit)| build_candidate(topics, topic, hit, now))
        .collect();
    candidates.sort_by(|a, b| rank_order(&a.article, &b.article));

    let mut seen_urls: HashSet<String> = HashSet::new();
    let mut seen_titles: HashSet<String> = HashSet::new();
    let mut articles = Vec::new();
    for candidate in candidates {
        if articles.len() >= max_articles {
            break;
        }
        if seen_urls.contains(&candidate.url_key) || seen_titles.contains(&candidate.title_key) {
            continue;
        }
        seen_urls.insert(candidate.url_key);
        seen_titles.insert(candidate.title_key);
        articles.push(candidate.article);
    }

    ArticleSet::new(articles)
}

#[cfg(test)]
mod tests {
    use chrono::Duration as ChronoDuration;

    use super::*;

    fn hit(title: &str, url: &str, content: &str, published: Option<&str>) -> SearchHit {
        SearchHit {
            title: title.to_string(),
            url: url.to_string(),
            content: content.to_string(),
            published_date: published.map(str::to_string),
            score: None,
        }
    }

    fn topics() -> Vec<String> {
        vec!["markets".to_string()]
    }

    #[test]
    fn tracking_variants_collapse_to_one_article() {
        let now = Utc::now();
        let hits = vec![
            (
                "markets".to_string(),
                hit(
                    "Markets rally on jobs data",
                    "https://example.com/a?utm_source=x",
                    "Markets rallied.",
                    None,
                ),
            ),
            (
                "markets".to_string(),
                hit(
                    "Stocks climb after payrolls",
                    "https://www.example.com/a/?fbclid=1",
                    "Markets rallied.",
                    None,
                ),
            ),
        ];
        let set = rank_articles(&topics(), hits, now, 10);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn same_title_different_url_collapses() {
        let now = Utc::now();
        let hits = vec![
            (
                "markets".to_string(),
                hit("Markets rally - Reuters", "https://reuters.com/x", "", None),
            ),
            (
                "markets".to_string(),
                hit("Markets rally", "https://other.example/y", "", None),
            ),
        ];
        let set = rank_articles(&topics(), hits, now, 10);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn distinct_dash_headlines_both_survive() {
        let now = Utc::now();
        let topics = vec!["apple".to_string()];
        let hits = vec![
            (
                "apple".to_string(),
                hit("Apple - Samsung patent deal reached", "https://a.example/1", "", None),
            ),
            (
                "apple".to_string(),
                hit("Apple - Google antitrust ruling appealed", "https://b.example/2", "", None),
            ),
        ];
        let set = rank_articles(&topics, hits, now, 10);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn duplicate_keeps_the_better_ranked_copy() {
        let now = Utc::now();
        let recent = (now - ChronoDuration::hours(1)).to_rfc3339();
        let stale = (now - ChronoDuration::hours(40)).to_rfc3339();
        let hits = vec![
            (
                "markets".to_string(),
                hit("Markets slide", "https://a.example/1", "markets", Some(&stale)),
            ),
            (
                "markets".to_string(),
                hit("Markets slide", "https://b.example/2", "markets", Some(&recent)),
            ),
        ];
        let set = rank_articles(&topics(), hits, now, 10);
        assert_eq!(set.len(), 1);
        assert_eq!(set.as_slice()[0].url, "https://b.example/2");
    }

    #[test]
    fn ranked_descending_and_truncated() {
        let now = Utc::now();
        let hits: Vec<(String, SearchHit)> = (0..8)
            .map(|i| {
                let published = (now - ChronoDuration::hours(i * 6)).to_rfc3339();
                (
                    "markets".to_string(),
                    hit(
                        &format!("Markets story number {i}"),
                        &format!("https://example.com/{i}"),
                        "markets coverage",
                        Some(&published),
                    ),
                )
            })
            .collect();
        let set = rank_articles(&topics(), hits, now, 6);
        assert_eq!(set.len(), 6);
        let scores: Vec<f64> = set.iter().map(|a| a.combined_score).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]), "not descending: {scores:?}");
        assert_eq!(set.as_slice()[0].url, "https://example.com/0");
    }

    #[test]
    fn ties_go_to_more_recent() {
        let now = Utc::now();
        let older = (now - ChronoDuration::hours(5)).to_rfc3339();
        let newer = (now - ChronoDuration::hours(1)).to_rfc3339();
        let a_hit = hit("Alpha story here", "https://x.example/a", "", Some(&older));
        let b_hit = hit("Beta story here", "https://x.example/b", "", Some(&newer));
        let a = build_candidate(&topics(), "markets".into(), a_hit, now).unwrap();
        let mut b = build_candidate(&topics(), "markets".into(), b_hit, now).unwrap();
        b.article.combined_score = a.article.combined_score;
        assert_eq!(rank_order(&a.article, &b.article), Ordering::Greater);
    }

    #[test]
    fn hits_without_title_or_valid_url_are_dropped() {
        let now = Utc::now();
        let hits = vec![
            (
                "markets".to_string(),
                hit("", "https://example.com/a", "body", None),
            ),
            (
                "markets".to_string(),
                hit("Has title", "javascript:void(0)", "body", None),
            ),
        ];
        assert!(rank_articles(&topics(), hits, now, 10).is_empty());
    }

    #[test]
    fn missing_timestamp_does_not_break_scoring() {
        let now = Utc::now();
        let hits = vec![(
            "markets".to_string(),
            hit(
                "Markets open flat",
                "https://example.com/flat",
                "markets",
                Some("not a date"),
            ),
        )];
        let set = rank_articles(&topics(), hits, now, 10);
        let article = &set.as_slice()[0];
        assert!(article.published_at.is_none());
        assert!((article.recency_score - crate::scoring::NEUTRAL_RECENCY).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_input_is_empty_set() {
        assert!(rank_articles(&topics(), Vec::new(), Utc::now(), 10).is_empty());
    }
}
