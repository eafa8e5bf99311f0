//! Client construction from [`AppConfig`].

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use newscast_collector::{CollectorSettings, NewsCollector, TavilyClient};
use newscast_composer::{ComposerSettings, LlmComposer, OpenAiClient};
use newscast_core::{load_voice_catalog, AppConfig, VoiceCatalog};
use newscast_speech::{ElevenLabsClient, OutputFormat, TtsRenderer};
use newscast_timing::BriefingGenerator;

pub(crate) fn search_client(config: &AppConfig) -> anyhow::Result<TavilyClient> {
    TavilyClient::with_base_url(
        &config.search_api_key,
        config.search_query_timeout_secs,
        &config.user_agent,
        &config.search_base_url,
    )
    .context("failed to build news search client")
}

pub(crate) fn llm_client(config: &AppConfig) -> anyhow::Result<OpenAiClient> {
    OpenAiClient::with_base_url(
        &config.llm_api_key,
        &config.llm_model,
        config.llm_timeout_secs,
        &config.user_agent,
        &config.llm_base_url,
    )
    .context("failed to build text generation client")
}

pub(crate) fn tts_client(config: &AppConfig) -> anyhow::Result<ElevenLabsClient> {
    let output_format: OutputFormat = config
        .tts_output_format
        .parse()
        .context("NEWSCAST_TTS_OUTPUT_FORMAT is not a supported output format")?;
    ElevenLabsClient::with_base_url(
        &config.tts_api_key,
        &config.tts_model,
        output_format,
        config.tts_timeout_secs,
        &config.user_agent,
        &config.tts_base_url,
    )
    .context("failed to build speech synthesis client")
}

pub(crate) fn voice_catalog(config: &AppConfig) -> anyhow::Result<VoiceCatalog> {
    match &config.voices_path {
        Some(path) => {
            let catalog = load_voice_catalog(path)
                .with_context(|| format!("failed to load voices from {}", path.display()))?;
            tracing::debug!(path = %path.display(), voices = catalog.len(), "loaded voice catalog");
            Ok(catalog)
        }
        None => Ok(VoiceCatalog::default()),
    }
}

pub(crate) fn build_generator(config: &AppConfig) -> anyhow::Result<BriefingGenerator> {
    let collector = NewsCollector::new(
        search_client(config)?,
        CollectorSettings {
            results_per_query: config.search_results_per_query,
            query_timeout: Duration::from_secs(config.search_query_timeout_secs),
            max_in_flight: config.search_max_in_flight,
            max_articles: config.max_articles,
        },
    );
    let composer = LlmComposer::new(llm_client(config)?, ComposerSettings::default());
    let renderer = TtsRenderer::new(tts_client(config)?);

    Ok(BriefingGenerator::new(
        Arc::new(collector),
        Arc::new(composer),
        Arc::new(renderer),
        voice_catalog(config)?,
        config.timing_policy(),
        config.recency_window(),
    ))
}
