//! `newscast health`: probe each external service once.

use newscast_core::AppConfig;

use crate::wiring::{llm_client, search_client, tts_client};

/// Ping search, text generation, and speech synthesis concurrently and print
/// one line per service.
///
/// # Errors
///
/// Returns an error if any client cannot be built or any probe fails.
pub(crate) async fn run_health(config: &AppConfig) -> anyhow::Result<()> {
    let search = search_client(config)?;
    let llm = llm_client(config)?;
    let tts = tts_client(config)?;

    let (search_result, llm_result, tts_result) = tokio::join!(
        async { search.ping().await.map_err(|e| e.to_string()) },
        async { llm.ping().await.map_err(|e| e.to_string()) },
        async { tts.ping().await.map_err(|e| e.to_string()) },
    );

    let checks = [
        ("news search", search_result),
        ("text generation", llm_result),
        ("speech synthesis", tts_result),
    ];

    let mut failed = 0usize;
    for (service, result) in &checks {
        match result {
            Ok(()) => println!("{service:<18} ok"),
            Err(e) => {
                failed += 1;
                tracing::warn!(service, error = %e, "health probe failed");
                println!("{service:<18} FAILED  {e}");
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{failed} of {} services unavailable", checks.len());
    }
    Ok(())
}
