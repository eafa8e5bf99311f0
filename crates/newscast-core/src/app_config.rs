use std::path::PathBuf;
use std::time::Duration;

use crate::timing::{TimingPolicy, TolerancePolicy};

#[derive(Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub voices_path: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub user_agent: String,
    pub search_api_key: String,
    pub search_base_url: String,
    pub search_query_timeout_secs: u64,
    pub search_max_in_flight: usize,
    pub search_results_per_query: u32,
    pub recency_window_hours: u32,
    pub max_articles: usize,
    pub llm_api_key: String,
    pub llm_base_url: String,
    pub llm_model: String,
    pub llm_timeout_secs: u64,
    pub tts_api_key: String,
    pub tts_base_url: String,
    pub tts_model: String,
    pub tts_output_format: String,
    pub tts_timeout_secs: u64,
    pub max_attempts: u32,
    pub tolerance_secs: f64,
    pub tolerance_relative: f64,
    pub tolerance_max_secs: f64,
}

impl AppConfig {
    #[must_use]
    pub fn timing_policy(&self) -> TimingPolicy {
        TimingPolicy {
            max_attempts: self.max_attempts,
            tolerance: TolerancePolicy {
                absolute_secs: self.tolerance_secs,
                relative: self.tolerance_relative,
                max_secs: self.tolerance_max_secs,
            },
        }
    }

    #[must_use]
    pub fn recency_window(&self) -> Duration {
        Duration::from_secs(u64::from(self.recency_window_hours) * 3600)
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("log_level", &self.log_level)
            .field("voices_path", &self.voices_path)
            .field("output_dir", &self.output_dir)
            .field("user_agent", &self.user_agent)
            .field("search_api_key", &"[redacted]")
            .field("search_base_url", &self.search_base_url)
            .field("search_query_timeout_secs", &self.search_query_timeout_secs)
            .field("search_max_in_flight", &self.search_max_in_flight)
            .field("search_results_per_query", &self.search_results_per_query)
            .field("recency_window_hours", &self.recency_window_hours)
            .field("max_articles", &self.max_articles)
            .field("llm_api_key", &"[redacted]")
            .field("llm_base_url", &self.llm_base_url)
            .field("llm_model", &self.llm_model)
            .field("llm_timeout_secs", &self.llm_timeout_secs)
            .field("tts_api_key", &"[redacted]")
            .field("tts_base_url", &self.tts_base_url)
            .field("tts_model", &self.tts_model)
            .field("tts_output_format", &self.tts_output_format)
            .field("tts_timeout_secs", &self.tts_timeout_secs)
            .field("max_attempts", &self.max_attempts)
            .field("tolerance_secs", &self.tolerance_secs)
            .field("tolerance_relative", &self.tolerance_relative)
            .field("tolerance_max_secs", &self.tolerance_max_secs)
            .finish()
    }
}
