//! Retry-with-recalibration state machine.
//!
//! Each attempt is a measurement: the observed speech rate of attempt `i`
//! becomes the rate estimate for attempt `i + 1`. The machine performs no
//! I/O; the driver feeds it [`Event`]s and reads back the [`Phase`].

use newscast_core::{
    AttemptStatus, AttemptSummary, CompositionError, RenderedAudio, Script, SynthesisError,
    TimingPolicy, VoiceProfile,
};

use crate::error::{AttemptFault, TransitionError};

/// Observed rates outside this band are clamped before reuse.
const MIN_OBSERVED_WPM: f64 = 40.0;
const MAX_OBSERVED_WPM: f64 = 300.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Estimating,
    Composing { attempt: u32, target_words: u32 },
    Rendering { attempt: u32 },
    Measuring { attempt: u32 },
    ReEstimating { after_attempt: u32 },
    Accepted { attempt: u32 },
    /// Budget exhausted; `attempt` is the minimum-error render.
    BestEffort { attempt: u32 },
    Failed,
    Cancelled,
}

impl Phase {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Phase::Estimating => "estimating",
            Phase::Composing { .. } => "composing",
            Phase::Rendering { .. } => "rendering",
            Phase::Measuring { .. } => "measuring",
            Phase::ReEstimating { .. } => "re_estimating",
            Phase::Accepted { .. } => "accepted",
            Phase::BestEffort { .. } => "best_effort",
            Phase::Failed => "failed",
            Phase::Cancelled => "cancelled",
        }
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Phase::Accepted { .. } | Phase::BestEffort { .. } | Phase::Failed | Phase::Cancelled
        )
    }
}

#[derive(Debug)]
pub enum Event {
    /// Start the next attempt from the current estimate.
    Begin,
    Composed(Script),
    CompositionFailed(CompositionError),
    Rendered(RenderedAudio),
    SynthesisFailed(SynthesisError),
    /// Compare the rendered duration against the request.
    Evaluate,
    /// Stop before starting another attempt.
    Cancel,
}

impl Event {
    fn name(&self) -> &'static str {
        match self {
            Event::Begin => "begin",
            Event::Composed(_) => "composed",
            Event::CompositionFailed(_) => "composition_failed",
            Event::Rendered(_) => "rendered",
            Event::SynthesisFailed(_) => "synthesis_failed",
            Event::Evaluate => "evaluate",
            Event::Cancel => "cancel",
        }
    }
}

/// Everything recorded about one compose/render/measure cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationAttempt {
    /// 1-based.
    pub index: u32,
    pub target_words: u32,
    pub words_per_minute: f64,
    pub pause_factor: f64,
    pub script: Option<Script>,
    pub audio: Option<RenderedAudio>,
    pub measured_secs: Option<f64>,
    pub error_secs: Option<f64>,
    pub within_tolerance: bool,
    pub fault: Option<AttemptFault>,
}

impl GenerationAttempt {
    fn new(index: u32, target_words: u32, profile: &VoiceProfile) -> Self {
        Self {
            index,
            target_words,
            words_per_minute: profile.words_per_minute,
            pause_factor: profile.pause_factor,
            script: None,
            audio: None,
            measured_secs: None,
            error_secs: None,
            within_tolerance: false,
            fault: None,
        }
    }

    /// Whether this attempt produced measured audio.
    #[must_use]
    pub fn is_measured(&self) -> bool {
        self.audio.is_some() && self.error_secs.is_some()
    }

    #[must_use]
    pub fn summary(&self) -> AttemptSummary {
        let status = match &self.fault {
            Some(AttemptFault::Composition { source, .. }) => {
                AttemptStatus::CompositionFailed(source.to_string())
            }
            Some(AttemptFault::Synthesis { source, .. }) => {
                AttemptStatus::SynthesisFailed(source.to_string())
            }
            None if self.within_tolerance => AttemptStatus::WithinTolerance,
            None => AttemptStatus::OutOfTolerance,
        };
        AttemptSummary {
            index: self.index,
            target_words: self.target_words,
            words_per_minute: self.words_per_minute,
            script_words: self.script.as_ref().map(|s| s.word_count),
            measured_secs: self.measured_secs,
            error_secs: self.error_secs,
            status,
        }
    }
}

/// `round(requested / 60 * wpm * pause_factor)`, never below one word.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn target_words(requested_secs: u32, words_per_minute: f64, pause_factor: f64) -> u32 {
    let words = (f64::from(requested_secs) / 60.0 * words_per_minute * pause_factor).round();
    if !words.is_finite() || words < 1.0 {
        return 1;
    }
    words.min(f64::from(u32::MAX)) as u32
}

pub struct TimingMachine {
    requested_secs: u32,
    policy: TimingPolicy,
    profile: VoiceProfile,
    phase: Phase,
    attempts: Vec<GenerationAttempt>,
    pending: Option<GenerationAttempt>,
}

impl TimingMachine {
    /// Start in [`Phase::Estimating`] with `seed` as the working voice profile.
    #[must_use]
    pub fn new(requested_secs: u32, seed: VoiceProfile, policy: TimingPolicy) -> Self {
        Self {
            requested_secs,
            policy: TimingPolicy {
                max_attempts: policy.max_attempts.max(1),
                ..policy
            },
            profile: seed,
            phase: Phase::Estimating,
            attempts: Vec::new(),
            pending: None,
        }
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The per-request working copy, recalibrated after each measurement.
    #[must_use]
    pub fn profile(&self) -> &VoiceProfile {
        &self.profile
    }

    #[must_use]
    pub fn attempts(&self) -> &[GenerationAttempt] {
        &self.attempts
    }

    #[must_use]
    pub fn completed_attempts(&self) -> u32 {
        u32::try_from(self.attempts.len()).unwrap_or(u32::MAX)
    }

    #[must_use]
    pub fn requested_secs(&self) -> u32 {
        self.requested_secs
    }

    /// Script of the attempt in progress, once composed.
    #[must_use]
    pub fn pending_script(&self) -> Option<&Script> {
        self.pending.as_ref().and_then(|a| a.script.as_ref())
    }

    #[must_use]
    pub fn faults(&self) -> Vec<AttemptFault> {
        self.attempts
            .iter()
            .filter_map(|a| a.fault.clone())
            .collect()
    }

    #[must_use]
    pub fn summaries(&self) -> Vec<AttemptSummary> {
        self.attempts.iter().map(GenerationAttempt::summary).collect()
    }

    /// Attempt chosen by a successful terminal phase.
    #[must_use]
    pub fn selected(&self) -> Option<&GenerationAttempt> {
        let index = match self.phase {
            Phase::Accepted { attempt } | Phase::BestEffort { attempt } => attempt,
            _ => return None,
        };
        self.attempts.iter().find(|a| a.index == index)
    }

    /// Consume the machine, returning the selected attempt and all summaries.
    #[must_use]
    pub fn into_selected(self) -> Option<(GenerationAttempt, Vec<AttemptSummary>)> {
        let summaries = self.summaries();
        let index = match self.phase {
            Phase::Accepted { attempt } | Phase::BestEffort { attempt } => attempt,
            _ => return None,
        };
        let selected = self.attempts.into_iter().find(|a| a.index == index)?;
        Some((selected, summaries))
    }

    /// Apply one event.
    ///
    /// # Errors
    ///
    /// [`TransitionError`] when `event` is not valid in the current phase;
    /// the machine is left unchanged.
    pub fn advance(&mut self, event: Event) -> Result<Phase, TransitionError> {
        let phase = self.phase;
        let invalid = |event: &Event| TransitionError {
            phase: phase.name(),
            event: event.name(),
        };

        self.phase = match (phase, event) {
            (Phase::Estimating | Phase::ReEstimating { .. }, Event::Begin) => self.begin(),
            (Phase::Estimating | Phase::ReEstimating { .. }, Event::Cancel) => Phase::Cancelled,
            (Phase::Composing { attempt, .. }, Event::Composed(script)) => {
                self.pending_mut(attempt).script = Some(script);
                Phase::Rendering { attempt }
            }
            (Phase::Composing { attempt, .. }, Event::CompositionFailed(source)) => {
                self.pending_mut(attempt).fault =
                    Some(AttemptFault::Composition { attempt, source });
                self.finish_attempt()
            }
            (Phase::Rendering { attempt }, Event::Rendered(audio)) => {
                self.pending_mut(attempt).audio = Some(audio);
                Phase::Measuring { attempt }
            }
            (Phase::Rendering { attempt }, Event::SynthesisFailed(source)) => {
                self.pending_mut(attempt).fault = Some(AttemptFault::Synthesis { attempt, source });
                self.finish_attempt()
            }
            (Phase::Measuring { attempt }, Event::Evaluate) => self.evaluate(attempt),
            (_, event) => return Err(invalid(&event)),
        };
        Ok(self.phase)
    }

    fn pending_mut(&mut self, attempt: u32) -> &mut GenerationAttempt {
        self.pending
            .get_or_insert_with(|| GenerationAttempt::new(attempt, 0, &self.profile))
    }

    fn begin(&mut self) -> Phase {
        let attempt = self.completed_attempts() + 1;
        let target = target_words(
            self.requested_secs,
            self.profile.words_per_minute,
            self.profile.pause_factor,
        );
        self.pending = Some(GenerationAttempt::new(attempt, target, &self.profile));
        tracing::debug!(
            attempt,
            target_words = target,
            words_per_minute = self.profile.words_per_minute,
            pause_factor = self.profile.pause_factor,
            "estimated target length"
        );
        Phase::Composing {
            attempt,
            target_words: target,
        }
    }

    fn evaluate(&mut self, attempt: u32) -> Phase {
        let requested = f64::from(self.requested_secs);
        let tolerance = self.policy.tolerance;
        let pending = self.pending_mut(attempt);

        let measured = pending.audio.as_ref().map_or(0.0, |a| a.duration_secs);
        if !measured.is_finite() || measured <= 0.0 {
            pending.audio = None;
            pending.fault = Some(AttemptFault::Synthesis {
                attempt,
                source: SynthesisError::Unmeasurable(format!("duration {measured}")),
            });
            return self.finish_attempt();
        }

        let error = (measured - requested).abs();
        pending.measured_secs = Some(measured);
        pending.error_secs = Some(error);

        if tolerance.accepts(requested, measured) {
            pending.within_tolerance = true;
            if let Some(done) = self.pending.take() {
                self.attempts.push(done);
            }
            return Phase::Accepted { attempt };
        }

        let words = pending.script.as_ref().map_or(0, |s| s.word_count);
        self.recalibrate(words, measured);
        self.finish_attempt()
    }

    /// Replace the working rate with the observed one.
    ///
    /// The observed rate already includes the voice's pauses, so the pause
    /// factor is reset to 1.0 once a measurement exists.
    fn recalibrate(&mut self, words: usize, measured_secs: f64) {
        if words == 0 {
            return;
        }
        #[allow(clippy::cast_precision_loss)]
        let observed = words as f64 / (measured_secs / 60.0);
        let clamped = observed.clamp(MIN_OBSERVED_WPM, MAX_OBSERVED_WPM);
        tracing::debug!(
            previous_wpm = self.profile.words_per_minute,
            observed_wpm = observed,
            next_wpm = clamped,
            "recalibrated speech rate"
        );
        self.profile.words_per_minute = clamped;
        self.profile.pause_factor = 1.0;
    }

    fn finish_attempt(&mut self) -> Phase {
        let Some(done) = self.pending.take() else {
            return Phase::Failed;
        };
        let attempt = done.index;
        self.attempts.push(done);

        if self.completed_attempts() < self.policy.max_attempts {
            return Phase::ReEstimating {
                after_attempt: attempt,
            };
        }
        match self.best_measured() {
            Some(best) => Phase::BestEffort { attempt: best },
            None => Phase::Failed,
        }
    }

    /// Minimum-error measured attempt; the earliest wins a tie.
    fn best_measured(&self) -> Option<u32> {
        self.attempts
            .iter()
            .filter(|a| a.is_measured())
            .fold(None::<&GenerationAttempt>, |best, a| match best {
                Some(b) if b.error_secs <= a.error_secs => Some(b),
                _ => Some(a),
            })
            .map(|a| a.index)
    }
}
