//! Async driver: collect once, then run the timing machine against the
//! composer and renderer until it reaches a terminal phase.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use newscast_core::{
    ArticleCollector, BriefingOutcome, BriefingRequest, BriefingResult, CompositionBrief,
    ScriptComposer, SpeechRenderer, SynthesisError, TimingPolicy, VoiceCatalog,
};
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::error::{CancelReason, GenerateError, TransitionError};
use crate::machine::{Event, Phase, TimingMachine};
use crate::progress::Progress;

/// Caller-side controls for one `generate` call.
#[derive(Debug, Clone, Default)]
pub struct GenerationControl {
    /// Checked before each attempt starts; in-flight calls are not aborted.
    pub cancel: CancellationToken,
    pub deadline: Option<Instant>,
    pub progress: Option<UnboundedSender<Progress>>,
}

impl GenerationControl {
    fn stop_reason(&self) -> Option<CancelReason> {
        if self.cancel.is_cancelled() {
            return Some(CancelReason::Requested);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(CancelReason::DeadlineExceeded),
            _ => None,
        }
    }

    fn emit(&self, event: Progress) {
        if let Some(tx) = &self.progress {
            // A dropped receiver only means nobody is watching.
            let _ = tx.send(event);
        }
    }
}

pub struct BriefingGenerator {
    collector: Arc<dyn ArticleCollector>,
    composer: Arc<dyn ScriptComposer>,
    renderer: Arc<dyn SpeechRenderer>,
    voices: VoiceCatalog,
    policy: TimingPolicy,
    recency_window: Duration,
}

impl BriefingGenerator {
    #[must_use]
    pub fn new(
        collector: Arc<dyn ArticleCollector>,
        composer: Arc<dyn ScriptComposer>,
        renderer: Arc<dyn SpeechRenderer>,
        voices: VoiceCatalog,
        policy: TimingPolicy,
        recency_window: Duration,
    ) -> Self {
        Self {
            collector,
            composer,
            renderer,
            voices,
            policy,
            recency_window,
        }
    }

    /// Produce a briefing whose measured duration is as close as possible to
    /// the requested one.
    ///
    /// Articles are collected once. Each attempt composes to a target word
    /// count, renders, and measures; a miss recalibrates the speech rate from
    /// the measurement. When the budget runs out the minimum-error render is
    /// returned as [`BriefingOutcome::BestEffort`].
    ///
    /// # Errors
    ///
    /// - [`GenerateError::GenerationFailed`] when no attempt produced
    ///   measured audio.
    /// - [`GenerateError::Cancelled`] when `control` signals a stop before an
    ///   attempt starts.
    pub async fn generate(
        &self,
        request: &BriefingRequest,
        control: GenerationControl,
    ) -> Result<BriefingResult, GenerateError> {
        let started = Instant::now();

        let collection = self
            .collector
            .collect(request.topics(), self.recency_window)
            .await;
        let source_unavailable = collection.source_unavailable();
        let news_quality = collection.news_quality();
        control.emit(Progress::Collected {
            articles: collection.articles.len(),
            queries_failed: collection.queries_failed,
            source_unavailable,
            news_quality,
        });
        if source_unavailable {
            tracing::warn!(
                topics = ?request.topics(),
                "news search unavailable; composing without sources"
            );
        }

        let seed = self.voices.profile_for(request.voice_id());
        let mut machine = TimingMachine::new(request.duration_secs(), seed, self.policy);

        loop {
            match machine.phase() {
                Phase::Estimating | Phase::ReEstimating { .. } => {
                    if let Some(reason) = control.stop_reason() {
                        machine.advance(Event::Cancel)?;
                        tracing::info!(
                            completed_attempts = machine.completed_attempts(),
                            %reason,
                            "briefing generation cancelled"
                        );
                        return Err(GenerateError::Cancelled {
                            completed_attempts: machine.completed_attempts(),
                            reason,
                        });
                    }
                    machine.advance(Event::Begin)?;
                }
                Phase::Composing {
                    attempt,
                    target_words,
                } => {
                    control.emit(Progress::AttemptStarted {
                        attempt,
                        target_words,
                        words_per_minute: machine.profile().words_per_minute,
                    });
                    let brief = CompositionBrief {
                        topics: request.topics(),
                        articles: &collection.articles,
                        target_words,
                        tone: request.tone(),
                        language: request.language(),
                    };
                    let event = match self.composer.compose(brief).await {
                        Ok(script) => Event::Composed(script),
                        Err(e) => {
                            tracing::warn!(attempt, error = %e, "composition attempt failed");
                            control.emit(Progress::AttemptFailed {
                                attempt,
                                reason: e.to_string(),
                            });
                            Event::CompositionFailed(e)
                        }
                    };
                    machine.advance(event)?;
                }
                Phase::Rendering { attempt } => {
                    let rendered = match machine.pending_script() {
                        Some(script) => {
                            self.renderer
                                .render(script, request.voice_id(), request.language())
                                .await
                        }
                        None => Err(SynthesisError::Request("no script to render".to_string())),
                    };
                    let event = match rendered {
                        Ok(audio) => Event::Rendered(audio),
                        Err(e) => {
                            tracing::warn!(attempt, error = %e, "rendering attempt failed");
                            control.emit(Progress::AttemptFailed {
                                attempt,
                                reason: e.to_string(),
                            });
                            Event::SynthesisFailed(e)
                        }
                    };
                    machine.advance(event)?;
                }
                Phase::Measuring { attempt } => {
                    machine.advance(Event::Evaluate)?;
                    if let Some(done) = machine.attempts().iter().find(|a| a.index == attempt) {
                        if let (Some(measured), Some(error)) = (done.measured_secs, done.error_secs)
                        {
                            tracing::info!(
                                attempt,
                                target_words = done.target_words,
                                script_words = done.script.as_ref().map_or(0, |s| s.word_count),
                                measured_secs = measured,
                                error_secs = error,
                                within_tolerance = done.within_tolerance,
                                "measured attempt"
                            );
                            control.emit(Progress::Measured {
                                attempt,
                                script_words: done.script.as_ref().map_or(0, |s| s.word_count),
                                measured_secs: measured,
                                error_secs: error,
                                within_tolerance: done.within_tolerance,
                            });
                        }
                    }
                }
                Phase::Accepted { .. } | Phase::BestEffort { .. } => break,
                Phase::Failed => {
                    let faults = machine.faults();
                    tracing::error!(
                        attempts = machine.completed_attempts(),
                        faults = faults.len(),
                        "briefing generation failed"
                    );
                    return Err(GenerateError::GenerationFailed {
                        attempts: machine.completed_attempts(),
                        faults,
                    });
                }
                Phase::Cancelled => {
                    return Err(GenerateError::Cancelled {
                        completed_attempts: machine.completed_attempts(),
                        reason: CancelReason::Requested,
                    });
                }
            }
        }

        let outcome = match machine.phase() {
            Phase::Accepted { .. } => BriefingOutcome::Accepted,
            _ => BriefingOutcome::BestEffort,
        };
        let requested_secs = machine.requested_secs();
        let attempt_count = machine.completed_attempts();
        let phase = machine.phase();
        let unselectable = || TransitionError {
            phase: phase.name(),
            event: "select",
        };
        let (selected, attempts) = machine.into_selected().ok_or_else(unselectable)?;
        let (Some(script), Some(audio), Some(measured_secs)) =
            (selected.script, selected.audio, selected.measured_secs)
        else {
            return Err(unselectable().into());
        };

        let accuracy = BriefingResult::accuracy_for(measured_secs, requested_secs);
        control.emit(Progress::Finished {
            outcome,
            measured_secs,
            accuracy,
        });
        tracing::info!(
            %outcome,
            attempts = attempt_count,
            requested_secs,
            measured_secs,
            accuracy,
            "briefing generated"
        );

        Ok(BriefingResult {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            topics: request.topics().to_vec(),
            voice_id: request.voice_id().to_string(),
            language: request.language().to_string(),
            tone: request.tone(),
            script,
            audio: audio.bytes,
            audio_format: audio.format,
            measured_secs,
            requested_secs,
            accuracy,
            within_tolerance: selected.within_tolerance,
            outcome,
            sources: collection.articles.into_vec(),
            generation_secs: started.elapsed().as_secs_f64(),
            attempt_count,
            attempts,
            source_unavailable,
            news_quality,
        })
    }
}
