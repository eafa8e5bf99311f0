use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single collected source item, scored for one briefing request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub body: String,
    /// Canonical (tracking-stripped) source URL.
    pub url: String,
    /// Publisher host, e.g. `reuters.com`.
    pub source: String,
    /// Topic whose query surfaced this article.
    pub topic: String,
    pub published_at: Option<DateTime<Utc>>,
    /// Topic-match relevance in `[0.0, 1.0]`.
    pub relevance_score: f64,
    /// Age-decayed recency in `[0.0, 1.0]`.
    pub recency_score: f64,
    /// Length/source heuristic in `[0.0, 1.0]`.
    pub quality_score: f64,
    /// Weighted combination used for ranking.
    pub combined_score: f64,
}

/// Articles ranked by descending combined score.
///
/// Empty sets are valid: the composer falls back to topic-level commentary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArticleSet {
    articles: Vec<Article>,
}

impl ArticleSet {
    /// Wrap an already ranked, deduplicated list.
    #[must_use]
    pub fn new(articles: Vec<Article>) -> Self {
        Self { articles }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.articles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Article> {
        self.articles.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Article] {
        &self.articles
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<Article> {
        self.articles
    }
}

impl<'a> IntoIterator for &'a ArticleSet {
    type Item = &'a Article;
    type IntoIter = std::slice::Iter<'a, Article>;

    fn into_iter(self) -> Self::IntoIter {
        self.articles.iter()
    }
}

/// Coarse label for how much source material backed a briefing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsQuality {
    High,
    Medium,
    Low,
}

impl NewsQuality {
    #[must_use]
    pub fn from_article_count(count: usize) -> Self {
        if count >= 10 {
            Self::High
        } else if count >= 5 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

impl std::fmt::Display for NewsQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NewsQuality::High => write!(f, "high"),
            NewsQuality::Medium => write!(f, "medium"),
            NewsQuality::Low => write!(f, "low"),
        }
    }
}

/// What the collector produced for one request, including the soft-fail
/// accounting for its search queries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectionOutcome {
    pub articles: ArticleSet,
    pub queries_attempted: usize,
    pub queries_failed: usize,
}

impl CollectionOutcome {
    /// Soft-fail flag: every attempted query errored or timed out.
    #[must_use]
    pub fn source_unavailable(&self) -> bool {
        self.queries_attempted > 0 && self.queries_failed == self.queries_attempted
    }

    #[must_use]
    pub fn news_quality(&self) -> NewsQuality {
        NewsQuality::from_article_count(self.articles.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_thresholds() {
        assert_eq!(NewsQuality::from_article_count(0), NewsQuality::Low);
        assert_eq!(NewsQuality::from_article_count(4), NewsQuality::Low);
        assert_eq!(NewsQuality::from_article_count(5), NewsQuality::Medium);
        assert_eq!(NewsQuality::from_article_count(10), NewsQuality::High);
    }

    #[test]
    fn source_unavailable_only_when_every_query_failed() {
        let mut outcome = CollectionOutcome {
            articles: ArticleSet::empty(),
            queries_attempted: 6,
            queries_failed: 5,
        };
        assert!(!outcome.source_unavailable());
        outcome.queries_failed = 6;
        assert!(outcome.source_unavailable());
    }

    #[test]
    fn no_queries_is_not_a_source_failure() {
        assert!(!CollectionOutcome::default().source_unavailable());
    }
}
