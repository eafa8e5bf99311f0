//! URL, title, and timestamp normalization for search hits.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use reqwest::Url;

/// Query parameters that only carry attribution and never change the article.
const TRACKING_PARAMS: [&str; 10] = [
    "fbclid", "gclid", "mc_cid", "mc_eid", "ref", "ref_src", "cmpid", "ocid", "igshid", "smid",
];

/// Second-level labels that sit between a publisher name and a country TLD,
/// as in `bbc.co.uk`.
const GENERIC_SECOND_LEVEL: [&str; 6] = ["co", "com", "org", "net", "ac", "gov"];

static DASH_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+[-|–—]\s+([^-|–—]{1,40})$").expect("valid suffix regex"));

static NON_ALNUM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\p{L}\p{N}]+").expect("valid non-alnum regex"));

fn is_tracking_param(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    key.starts_with("utm_") || TRACKING_PARAMS.contains(&key.as_str())
}

/// Canonicalize an article URL: http(s) only, no fragment, no tracking
/// parameters, remaining parameters sorted.
///
/// Returns `None` for unparseable or non-web URLs.
#[must_use]
pub fn canonical_url(raw: &str) -> Option<Url> {
    let mut url = Url::parse(raw.trim()).ok()?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return None;
    }
    url.set_fragment(None);

    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| !is_tracking_param(k))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    pairs.sort();

    if pairs.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(pairs);
    }
    Some(url)
}

/// Deduplication key for a canonical URL.
///
/// Ignores scheme, a leading `www.`, and a trailing `/` so that the same
/// article linked in slightly different ways collapses to one key.
#[must_use]
pub fn url_key(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default().to_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);
    let port = url.port().map(|p| format!(":{p}")).unwrap_or_default();
    let path = url.path().trim_end_matches('/');
    match url.query() {
        Some(q) => format!("{host}{port}{path}?{q}"),
        None => format!("{host}{port}{path}"),
    }
}

/// Publisher host without `www.`, e.g. `reuters.com`.
#[must_use]
pub fn source_host(url: &Url) -> String {
    let host = url.host_str().unwrap_or("unknown").to_lowercase();
    host.strip_prefix("www.").unwrap_or(&host).to_string()
}

/// Publisher name as it appears in the host, e.g. `reuters` for
/// `www.reuters.com` and `bbc` for `bbc.co.uk`.
#[must_use]
pub fn publisher_label(host: &str) -> String {
    let labels: Vec<&str> = host.trim_end_matches('.').split('.').collect();
    let label = match labels.as_slice() {
        [.., name, second, _tld] if GENERIC_SECOND_LEVEL.contains(second) => *name,
        [.., name, _tld] => *name,
        [only] => *only,
        [] => "",
    };
    label.to_lowercase()
}

fn compact(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Whether a trailing `" - Something"` segment names the publisher at `host`.
fn names_publisher(suffix: &str, host: &str) -> bool {
    let suffix = compact(suffix);
    let label = compact(&publisher_label(host));
    if suffix.len() < 2 || label.len() < 2 {
        return false;
    }
    suffix == label
        || (label.len() >= 3 && suffix.starts_with(&label))
        || (suffix.len() >= 3 && label.starts_with(&suffix))
}

/// Deduplication key for a title: lowercase alphanumerics separated by
/// single spaces.
///
/// A trailing `" - Publisher"` segment is dropped only when it names the
/// publisher at `host`, so syndicated copies collapse while headlines that
/// merely contain a dash keep their full text.
#[must_use]
pub fn title_key(title: &str, host: &str) -> String {
    let trimmed = title.trim();
    let base = match DASH_SUFFIX.captures(trimmed) {
        Some(caps) if caps.get(1).is_some_and(|m| names_publisher(m.as_str(), host)) => caps
            .get(0)
            .map_or(trimmed, |whole| &trimmed[..whole.start()]),
        _ => trimmed,
    };
    NON_ALNUM
        .replace_all(&base.to_lowercase(), " ")
        .trim()
        .to_string()
}

/// Parse a provider timestamp. Accepts RFC 3339, RFC 2822, and bare dates.
#[must_use]
pub fn parse_published(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Strip HTML tags and normalize whitespace.
#[must_use]
pub fn clean_text(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Timelike};

    use super::*;

    #[test]
    fn tracking_params_are_dropped() {
        let url = canonical_url(
            "https://www.example.com/story/123?utm_source=x&utm_medium=y&fbclid=abc#comments",
        )
        .unwrap();
        assert_eq!(url.as_str(), "https://www.example.com/story/123");
    }

    #[test]
    fn meaningful_params_are_kept_and_sorted() {
        let url = canonical_url("https://example.com/a?z=1&utm_campaign=q&id=7").unwrap();
        assert_eq!(url.as_str(), "https://example.com/a?id=7&z=1");
    }

    #[test]
    fn urls_differing_only_by_tracking_share_a_key() {
        let a = canonical_url("https://www.example.com/story/?utm_source=feed").unwrap();
        let b = canonical_url("http://example.com/story?gclid=123").unwrap();
        assert_eq!(url_key(&a), url_key(&b));
    }

    #[test]
    fn different_paths_have_different_keys() {
        let a = canonical_url("https://example.com/story-1").unwrap();
        let b = canonical_url("https://example.com/story-2").unwrap();
        assert_ne!(url_key(&a), url_key(&b));
    }

    #[test]
    fn non_web_urls_are_rejected() {
        assert!(canonical_url("mailto:desk@example.com").is_none());
        assert!(canonical_url("not a url").is_none());
        assert!(canonical_url("").is_none());
    }

    #[test]
    fn source_host_strips_www() {
        let url = canonical_url("https://www.Reuters.com/markets").unwrap();
        assert_eq!(source_host(&url), "reuters.com");
    }

    #[test]
    fn title_key_drops_publisher_and_punctuation() {
        assert_eq!(
            title_key("Fed Holds Rates Steady, Signals Patience - Reuters", "reuters.com"),
            "fed holds rates steady signals patience"
        );
        assert_eq!(
            title_key("Fed holds rates steady; signals patience", "example.com"),
            "fed holds rates steady signals patience"
        );
    }

    #[test]
    fn title_key_matches_multi_word_publisher_names() {
        assert_eq!(
            title_key("Chip exports slow | BBC News", "bbc.co.uk"),
            "chip exports slow"
        );
        assert_eq!(
            title_key("New phones unveiled — The Verge", "www.theverge.com"),
            "new phones unveiled"
        );
    }

    #[test]
    fn title_key_keeps_dash_segments_that_are_not_the_publisher() {
        assert_eq!(
            title_key("Apple - Samsung patent deal reached", "a.example"),
            "apple samsung patent deal reached"
        );
        assert_ne!(
            title_key("Apple - Samsung patent deal reached", "a.example"),
            title_key("Apple - Google antitrust ruling appealed", "b.example")
        );
    }

    #[test]
    fn title_key_keeps_plain_titles() {
        assert_eq!(title_key("Markets", "reuters.com"), "markets");
    }

    #[test]
    fn publisher_label_skips_generic_second_level() {
        assert_eq!(publisher_label("reuters.com"), "reuters");
        assert_eq!(publisher_label("bbc.co.uk"), "bbc");
        assert_eq!(publisher_label("uk.reuters.com"), "reuters");
        assert_eq!(publisher_label("localhost"), "localhost");
    }

    #[test]
    fn parses_rfc2822_and_rfc3339() {
        let a = parse_published("Tue, 15 Oct 2024 12:30:00 GMT").unwrap();
        assert_eq!((a.year(), a.month(), a.day(), a.hour()), (2024, 10, 15, 12));
        let b = parse_published("2024-10-15T12:30:00Z").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn parses_bare_date_as_midnight() {
        let d = parse_published("2024-10-15").unwrap();
        assert_eq!((d.day(), d.hour()), (15, 0));
    }

    #[test]
    fn garbage_timestamp_is_none() {
        assert!(parse_published("yesterday-ish").is_none());
        assert!(parse_published("").is_none());
    }

    #[test]
    fn clean_text_strips_tags() {
        assert_eq!(
            clean_text("<p>Stocks <b>rallied</b>\n today.</p>"),
            "Stocks rallied today."
        );
    }
}
