//! `newscast generate`: run one briefing and write its audio to disk.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use newscast_core::{AppConfig, BriefingRequest, BriefingResult};
use newscast_timing::{GenerationControl, Progress};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::wiring::build_generator;
use crate::GenerateArgs;

pub(crate) async fn run_generate(config: &AppConfig, args: GenerateArgs) -> anyhow::Result<()> {
    let request = BriefingRequest::new(
        &args.topics,
        args.duration,
        &args.voice,
        args.language.as_deref(),
        args.tone.as_deref(),
    )
    .context("invalid briefing request")?;

    let generator = build_generator(config)?;

    let cancel = CancellationToken::new();
    let ctrl_c = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!("interrupt received; stopping before the next attempt");
                cancel.cancel();
            }
        })
    };

    let (progress_tx, printer) = if args.json {
        (None, None)
    } else {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let printer = tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                eprintln!("{}", describe_progress(&event));
            }
        });
        (Some(tx), Some(printer))
    };

    let control = GenerationControl {
        cancel,
        deadline: args
            .timeout_secs
            .map(|secs| tokio::time::Instant::now() + Duration::from_secs(secs)),
        progress: progress_tx,
    };

    tracing::info!(
        topics = ?request.topics(),
        duration_secs = request.duration_secs(),
        voice_id = request.voice_id(),
        "generating briefing"
    );
    let outcome = generator.generate(&request, control).await;
    ctrl_c.abort();
    if let Some(printer) = printer {
        // The sender was moved into `control` and dropped with it, so the
        // printer drains and exits.
        let _ = printer.await;
    }
    let result = outcome?;

    let audio_path = match args.out {
        Some(path) => path,
        None => default_audio_path(&config.output_dir, &result),
    };
    write_audio(&audio_path, &result.audio)?;

    if args.json {
        let mut value = serde_json::to_value(&result).context("failed to serialize result")?;
        if let Some(object) = value.as_object_mut() {
            object.insert(
                "audio_path".to_string(),
                serde_json::Value::String(audio_path.display().to_string()),
            );
        }
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        print_summary(&result, &audio_path);
    }
    Ok(())
}

/// `{output_dir}/briefing_{id}.{container}`
pub(crate) fn default_audio_path(output_dir: &Path, result: &BriefingResult) -> PathBuf {
    output_dir.join(format!("briefing_{}.{}", result.id, result.audio_format))
}

pub(crate) fn write_audio(path: &Path, audio: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, audio).with_context(|| format!("failed to write {}", path.display()))?;
    tracing::debug!(path = %path.display(), bytes = audio.len(), "wrote briefing audio");
    Ok(())
}

pub(crate) fn describe_progress(event: &Progress) -> String {
    match event {
        Progress::Collected {
            articles,
            queries_failed,
            source_unavailable,
            news_quality,
        } => {
            if *source_unavailable {
                "news search unavailable; writing without sources".to_string()
            } else {
                format!(
                    "collected {articles} articles \
                     ({news_quality} coverage, {queries_failed} queries failed)"
                )
            }
        }
        Progress::AttemptStarted {
            attempt,
            target_words,
            words_per_minute,
        } => format!(
            "attempt {attempt}: targeting {target_words} words at {words_per_minute:.1} wpm"
        ),
        Progress::Measured {
            attempt,
            script_words,
            measured_secs,
            error_secs,
            within_tolerance,
        } => {
            let verdict = if *within_tolerance {
                "within tolerance"
            } else {
                "out of tolerance"
            };
            format!(
                "attempt {attempt}: {script_words} words ran {measured_secs:.1}s \
                 (off by {error_secs:.1}s, {verdict})"
            )
        }
        Progress::AttemptFailed { attempt, reason } => {
            format!("attempt {attempt} failed: {reason}")
        }
        Progress::Finished {
            outcome,
            measured_secs,
            accuracy,
        } => format!(
            "finished ({outcome}): {measured_secs:.1}s at {:.1}% accuracy",
            accuracy * 100.0
        ),
    }
}

fn print_summary(result: &BriefingResult, audio_path: &Path) {
    println!("Briefing {}", result.id);
    println!("  topics:    {}", result.topics.join(", "));
    println!(
        "  duration:  {:.1}s of {}s requested ({:.1}% accurate, {})",
        result.measured_secs,
        result.requested_secs,
        result.accuracy * 100.0,
        result.outcome
    );
    println!(
        "  script:    {} words over {} attempt(s)",
        result.script.word_count, result.attempt_count
    );
    println!(
        "  sources:   {} articles ({} coverage)",
        result.sources.len(),
        result.news_quality
    );
    println!("  audio:     {}", audio_path.display());
}
