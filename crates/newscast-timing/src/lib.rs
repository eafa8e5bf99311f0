//! Duration-targeting timing controller.
//!
//! [`TimingMachine`] is the pure retry-with-recalibration state machine;
//! [`BriefingGenerator`] drives it against the collector, composer, and
//! renderer and assembles the caller-facing [`BriefingResult`].
//!
//! [`BriefingResult`]: newscast_core::BriefingResult

pub mod error;
pub mod generator;
pub mod machine;
pub mod progress;

pub use error::{AttemptFault, CancelReason, GenerateError, TransitionError};
pub use generator::{BriefingGenerator, GenerationControl};
pub use machine::{target_words, Event, GenerationAttempt, Phase, TimingMachine};
pub use progress::Progress;
