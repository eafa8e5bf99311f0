//! Article collection for newscast briefings.
//!
//! Fans topic queries out to a Tavily-style news search API with a strict
//! per-query timeout and a bound on in-flight requests, then merges,
//! deduplicates, scores, and ranks the results into an [`ArticleSet`].
//!
//! [`ArticleSet`]: newscast_core::ArticleSet

pub mod client;
pub mod collector;
pub mod error;
pub mod normalize;
pub mod queries;
pub mod scoring;
pub mod types;

pub use client::TavilyClient;
pub use collector::{CollectorSettings, NewsCollector};
pub use error::CollectorError;
pub use types::{SearchHit, SearchQuery};
