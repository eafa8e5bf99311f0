//! Query phrasing for each topic.

use std::time::Duration;

use crate::types::SearchQuery;

/// Phrasing variants issued per topic. Each is a separate search call.
const PHRASINGS: [&str; 3] = [
    "{topic} breaking news today",
    "{topic} announcement update",
    "{topic} latest developments analysis",
];

/// Build every query for `topics`, in topic order.
#[must_use]
pub fn build_queries(
    topics: &[String],
    recency_window: Duration,
    max_results: u32,
) -> Vec<SearchQuery> {
    let days = window_days(recency_window);
    topics
        .iter()
        .flat_map(|topic| {
            PHRASINGS.iter().map(move |template| SearchQuery {
                text: template.replace("{topic}", topic),
                topic: topic.clone(),
                days,
                max_results,
            })
        })
        .collect()
}

/// Whole days covering `window`, never less than one.
fn window_days(window: Duration) -> u32 {
    let days = window.as_secs().div_ceil(86_400).max(1);
    u32::try_from(days).unwrap_or(u32::MAX)
}
