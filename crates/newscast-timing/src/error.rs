use newscast_core::{CompositionError, SynthesisError};
use thiserror::Error;

/// Hard failure of one attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttemptFault {
    #[error("attempt {attempt}: {source}")]
    Composition {
        attempt: u32,
        #[source]
        source: CompositionError,
    },

    #[error("attempt {attempt}: {source}")]
    Synthesis {
        attempt: u32,
        #[source]
        source: SynthesisError,
    },
}

impl AttemptFault {
    #[must_use]
    pub fn attempt(&self) -> u32 {
        match self {
            AttemptFault::Composition { attempt, .. } | AttemptFault::Synthesis { attempt, .. } => {
                *attempt
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    Requested,
    DeadlineExceeded,
}

impl std::fmt::Display for CancelReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CancelReason::Requested => write!(f, "cancellation requested"),
            CancelReason::DeadlineExceeded => write!(f, "deadline exceeded"),
        }
    }
}

/// An event the state machine cannot accept in its current phase.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("event {event} is not valid in phase {phase}")]
pub struct TransitionError {
    pub phase: &'static str,
    pub event: &'static str,
}

#[derive(Debug, Error)]
pub enum GenerateError {
    /// The attempt budget ran out without a single measured render.
    #[error("generation failed after {attempts} attempt(s): {}", join_faults(.faults))]
    GenerationFailed {
        attempts: u32,
        faults: Vec<AttemptFault>,
    },

    #[error("generation cancelled after {completed_attempts} attempt(s): {reason}")]
    Cancelled {
        completed_attempts: u32,
        reason: CancelReason,
    },

    #[error("timing controller error: {0}")]
    Transition(#[from] TransitionError),
}

fn join_faults(faults: &[AttemptFault]) -> String {
    faults
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
