//! Relevance, recency, and quality scoring for collected articles.
//!
//! All component scores are in `[0.0, 1.0]`; [`combined_score`] weights them
//! 50/30/20.

use chrono::{DateTime, Utc};

const RELEVANCE_WEIGHT: f64 = 0.5;
const RECENCY_WEIGHT: f64 = 0.3;
const QUALITY_WEIGHT: f64 = 0.2;

/// Recency assigned when a hit has no usable timestamp.
pub const NEUTRAL_RECENCY: f64 = 0.2;

/// Age at which recency halves.
const RECENCY_HALF_LIFE_HOURS: f64 = 12.0;

const SIGNAL_WORDS: [&str; 7] = [
    "announced",
    "confirmed",
    "reported",
    "revealed",
    "launched",
    "breaking",
    "exclusive",
];

const CREDIBLE_HOSTS: [&str; 10] = [
    "reuters.com",
    "apnews.com",
    "bloomberg.com",
    "bbc.co.uk",
    "bbc.com",
    "wsj.com",
    "nytimes.com",
    "ft.com",
    "theverge.com",
    "techcrunch.com",
];

const STOPWORDS: [&str; 12] = [
    "the", "and", "for", "with", "from", "about", "news", "into", "over", "this", "that", "are",
];

/// Lowercase alphanumeric tokens of `text`.
fn tokens(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Whether `phrase` occurs in `words` as a run of whole tokens.
fn contains_phrase(words: &[String], phrase: &[String]) -> bool {
    !phrase.is_empty() && words.windows(phrase.len()).any(|window| window == phrase)
}

/// Topic keywords worth matching individually: length >= 3, stopwords
/// removed.
fn topic_keywords(phrase: &[String]) -> Vec<&String> {
    phrase
        .iter()
        .filter(|w| w.chars().count() >= 3 && !STOPWORDS.contains(&w.as_str()))
        .collect()
}

/// How well an article matches any of the requested topics.
///
/// Scored per topic and the best topic wins: full phrase in the title (0.4),
/// full phrase in the body (0.2), share of topic keywords present anywhere
/// (up to 0.3), and a hard-news signal word (0.1). Matching is on whole
/// words, so `ai` does not match `said` and `oil` does not match `soil`.
#[must_use]
pub fn relevance_score(topics: &[String], title: &str, body: &str) -> f64 {
    let title_words = tokens(title);
    let body_words = tokens(body);
    let present = |word: &str| title_words.iter().chain(&body_words).any(|t| t == word);

    let signal = if SIGNAL_WORDS
        .iter()
        .any(|w| title_words.iter().chain(&body_words).any(|t| t == w))
    {
        0.1
    } else {
        0.0
    };

    topics
        .iter()
        .map(|topic| {
            let phrase = tokens(topic);
            if phrase.is_empty() {
                return 0.0;
            }
            let mut score = 0.0;
            if contains_phrase(&title_words, &phrase) {
                score += 0.4;
            }
            if contains_phrase(&body_words, &phrase) {
                score += 0.2;
            }
            let keywords = topic_keywords(&phrase);
            if !keywords.is_empty() {
                let matched = keywords.iter().filter(|k| present(k.as_str())).count();
                #[allow(clippy::cast_precision_loss)]
                let share = matched as f64 / keywords.len() as f64;
                score += 0.3 * share;
            }
            score
        })
        .fold(0.0_f64, f64::max)
        .min(0.9)
        + signal
}

/// Exponential decay with a 12-hour half-life. Future timestamps count as
/// brand new; missing timestamps get [`NEUTRAL_RECENCY`].
#[must_use]
pub fn recency_score(published: Option<DateTime<Utc>>, now: DateTime<Utc>) -> f64 {
    let Some(published) = published else {
        return NEUTRAL_RECENCY;
    };
    #[allow(clippy::cast_precision_loss)]
    let age_hours = (now - published).num_seconds() as f64 / 3600.0;
    if age_hours <= 0.0 {
        return 1.0;
    }
    (-std::f64::consts::LN_2 * age_hours / RECENCY_HALF_LIFE_HOURS).exp()
}

/// Length and source heuristic.
#[must_use]
pub fn quality_score(title: &str, body: &str, host: &str) -> f64 {
    let mut score: f64 = 0.3;
    let body_len = body.chars().count();
    if body_len > 200 {
        score += 0.2;
    }
    if body_len > 800 {
        score += 0.2;
    }
    let title_len = title.chars().count();
    if (20..=160).contains(&title_len) {
        score += 0.1;
    }
    if CREDIBLE_HOSTS
        .iter()
        .any(|h| host == *h || host.ends_with(&format!(".{h}")))
    {
        score += 0.2;
    }
    score.min(1.0)
}

#[must_use]
pub fn combined_score(relevance: f64, recency: f64, quality: f64) -> f64 {
    RELEVANCE_WEIGHT * relevance + RECENCY_WEIGHT * recency + QUALITY_WEIGHT * quality
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn topics(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn phrase_in_title_beats_body_only() {
        let t = topics(&["interest rates"]);
        let title_hit = relevance_score(&t, "Interest rates held", "Central bank met.");
        let body_hit = relevance_score(&t, "Central bank meets", "Interest rates held.");
        assert!(title_hit > body_hit, "{title_hit} <= {body_hit}");
    }

    #[test]
    fn unrelated_article_scores_zero() {
        let t = topics(&["semiconductors"]);
        let score = relevance_score(&t, "Local bakery opens", "Fresh bread daily.");
        assert!(score.abs() < f64::EPSILON);
    }

    #[test]
    fn short_topic_does_not_match_inside_other_words() {
        let t = topics(&["AI"]);
        let score = relevance_score(
            &t,
            "Officials said rain will continue",
            "The mayor said again that the drain was repaired.",
        );
        assert!(score.abs() < f64::EPSILON, "got {score}");

        let t = topics(&["oil"]);
        let score = relevance_score(&t, "Farmers report soil turmoil", "Soil quality fell.");
        assert!(score.abs() < f64::EPSILON, "got {score}");
    }

    #[test]
    fn short_topic_matches_as_a_whole_word() {
        let t = topics(&["AI"]);
        let score = relevance_score(&t, "AI chip demand grows", "Vendors see AI orders rise.");
        assert!((score - 0.6).abs() < 1e-9, "got {score}");
    }

    #[test]
    fn phrase_must_appear_as_consecutive_words() {
        let t = topics(&["interest rates"]);
        let scattered = relevance_score(&t, "Rates and interest", "No change.");
        assert!((scattered - 0.3).abs() < 1e-9, "got {scattered}");
    }

    #[test]
    fn signal_word_needs_a_whole_word() {
        let t = topics(&["markets"]);
        let plain = relevance_score(&t, "Markets drift", "Unreported volumes.");
        let signalled = relevance_score(&t, "Markets drift", "Volumes were reported.");
        assert!((signalled - plain - 0.1).abs() < 1e-9, "{signalled} vs {plain}");
    }

    #[test]
    fn best_topic_wins() {
        let t = topics(&["markets", "climate policy"]);
        let score = relevance_score(&t, "Climate policy shift", "New climate policy rules.");
        assert!((score - 0.9).abs() < 1e-9, "got {score}");
    }

    #[test]
    fn relevance_is_bounded() {
        let t = topics(&["ai"]);
        let score = relevance_score(&t, "AI announced", "ai ai ai confirmed exclusive");
        assert!(score <= 1.0, "got {score}");
    }

    #[test]
    fn recency_halves_every_twelve_hours() {
        let now = Utc::now();
        let fresh = recency_score(Some(now), now);
        let half = recency_score(Some(now - Duration::hours(12)), now);
        let quarter = recency_score(Some(now - Duration::hours(24)), now);
        assert!((fresh - 1.0).abs() < 1e-9);
        assert!((half - 0.5).abs() < 1e-6);
        assert!((quarter - 0.25).abs() < 1e-6);
    }

    #[test]
    fn missing_timestamp_is_neutral() {
        assert!((recency_score(None, Utc::now()) - NEUTRAL_RECENCY).abs() < f64::EPSILON);
    }

    #[test]
    fn future_timestamp_counts_as_fresh() {
        let now = Utc::now();
        assert!((recency_score(Some(now + Duration::hours(3)), now) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn credible_long_article_scores_high_quality() {
        let body = "x".repeat(900);
        let q = quality_score("A reasonably descriptive headline", &body, "reuters.com");
        assert!((q - 1.0).abs() < 1e-9, "got {q}");
    }

    #[test]
    fn thin_snippet_scores_low_quality() {
        let q = quality_score("Hi", "short", "blog.example");
        assert!((q - 0.3).abs() < 1e-9, "got {q}");
    }

    #[test]
    fn subdomain_of_credible_host_counts() {
        let q = quality_score("Hi", "short", "uk.reuters.com");
        assert!((q - 0.5).abs() < 1e-9, "got {q}");
    }

    #[test]
    fn combined_weights_sum_to_one() {
        assert!((combined_score(1.0, 1.0, 1.0) - 1.0).abs() < 1e-9);
    }
}
