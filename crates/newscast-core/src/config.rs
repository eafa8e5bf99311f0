use crate::app_config::AppConfig;
use crate::ConfigError;

const DEFAULT_SEARCH_BASE_URL: &str = "https://api.tavily.com";
const DEFAULT_LLM_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_TTS_BASE_URL: &str = "https://api.elevenlabs.io";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Parsing and validation are decoupled from the process environment so they
/// can be tested with a plain `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_f64 = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let value = or_default(var, default)
            .parse::<f64>()
            .map_err(|e| invalid(var, e.to_string()))?;
        if value.is_finite() && value >= 0.0 {
            Ok(value)
        } else {
            Err(invalid(var, format!("{value} is not a non-negative number")))
        }
    };

    let search_api_key = require("TAVILY_API_KEY")?;
    let llm_api_key = require("OPENAI_API_KEY")?;
    let tts_api_key = require("ELEVENLABS_API_KEY")?;

    let log_level = or_default("NEWSCAST_LOG_LEVEL", "info");
    let voices_path = lookup("NEWSCAST_VOICES_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);
    let output_dir = PathBuf::from(or_default("NEWSCAST_OUTPUT_DIR", "./audio"));
    let user_agent = or_default("NEWSCAST_USER_AGENT", "newscast/0.1 (briefing-generator)");

    let search_base_url = or_default("NEWSCAST_SEARCH_BASE_URL", DEFAULT_SEARCH_BASE_URL);
    let search_query_timeout_secs = parse_u64("NEWSCAST_SEARCH_QUERY_TIMEOUT_SECS", "6")?;
    if !(1..=9).contains(&search_query_timeout_secs) {
        return Err(invalid(
            "NEWSCAST_SEARCH_QUERY_TIMEOUT_SECS",
            format!("{search_query_timeout_secs} must be within 1..=9"),
        ));
    }
    let search_max_in_flight = parse_usize("NEWSCAST_SEARCH_MAX_IN_FLIGHT", "6")?;
    if search_max_in_flight == 0 {
        return Err(invalid(
            "NEWSCAST_SEARCH_MAX_IN_FLIGHT",
            "must be at least 1".to_string(),
        ));
    }
    let search_results_per_query = parse_u32("NEWSCAST_SEARCH_RESULTS_PER_QUERY", "5")?;
    let recency_window_hours = parse_u32("NEWSCAST_RECENCY_WINDOW_HOURS", "48")?;
    if recency_window_hours == 0 {
        return Err(invalid(
            "NEWSCAST_RECENCY_WINDOW_HOURS",
            "must be at least 1".to_string(),
        ));
    }
    let max_articles = parse_usize("NEWSCAST_MAX_ARTICLES", "12")?;
    if !(6..=20).contains(&max_articles) {
        return Err(invalid(
            "NEWSCAST_MAX_ARTICLES",
            format!("{max_articles} must be within 6..=20"),
        ));
    }

    let llm_base_url = or_default("NEWSCAST_LLM_BASE_URL", DEFAULT_LLM_BASE_URL);
    let llm_model = or_default("NEWSCAST_LLM_MODEL", "gpt-4o-mini");
    let llm_timeout_secs = parse_u64("NEWSCAST_LLM_TIMEOUT_SECS", "60")?;

    let tts_base_url = or_default("NEWSCAST_TTS_BASE_URL", DEFAULT_TTS_BASE_URL);
    let tts_model = or_default("NEWSCAST_TTS_MODEL", "eleven_multilingual_v2");
    let tts_output_format = or_default("NEWSCAST_TTS_OUTPUT_FORMAT", "mp3_44100_128");
    let tts_timeout_secs = parse_u64("NEWSCAST_TTS_TIMEOUT_SECS", "120")?;

    let max_attempts = parse_u32("NEWSCAST_MAX_ATTEMPTS", "3")?;
    if !(1..=6).contains(&max_attempts) {
        return Err(invalid(
            "NEWSCAST_MAX_ATTEMPTS",
            format!("{max_attempts} must be within 1..=6"),
        ));
    }
    let tolerance_secs = parse_f64("NEWSCAST_TOLERANCE_SECS", "5")?;
    let tolerance_relative = parse_f64("NEWSCAST_TOLERANCE_RELATIVE", "0.02")?;
    if tolerance_relative >= 1.0 {
        return Err(invalid(
            "NEWSCAST_TOLERANCE_RELATIVE",
            format!("{tolerance_relative} must be below 1.0"),
        ));
    }
    let tolerance_max_secs = parse_f64("NEWSCAST_TOLERANCE_MAX_SECS", "15")?;

    Ok(AppConfig {
        log_level,
        voices_path,
        output_dir,
        user_agent,
        search_api_key,
        search_base_url,
        search_query_timeout_secs,
        search_max_in_flight,
        search_results_per_query,
        recency_window_hours,
        max_articles,
        llm_api_key,
        llm_base_url,
        llm_model,
        llm_timeout_secs,
        tts_api_key,
        tts_base_url,
        tts_model,
        tts_output_format,
        tts_timeout_secs,
        max_attempts,
        tolerance_secs,
        tolerance_relative,
        tolerance_max_secs,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
