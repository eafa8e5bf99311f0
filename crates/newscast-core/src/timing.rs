//! Duration tolerance and attempt budget for the timing controller.

/// Acceptable error between requested and measured duration.
///
/// The allowed error scales with the requested duration (`relative`) but never
/// drops below `absolute_secs` and never exceeds `max_secs`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TolerancePolicy {
    pub absolute_secs: f64,
    pub relative: f64,
    pub max_secs: f64,
}

impl Default for TolerancePolicy {
    fn default() -> Self {
        Self {
            absolute_secs: 5.0,
            relative: 0.02,
            max_secs: 15.0,
        }
    }
}

impl TolerancePolicy {
    /// Allowed absolute error in seconds for a requested duration.
    #[must_use]
    pub fn allowed_secs(&self, requested_secs: f64) -> f64 {
        let ceiling = self.max_secs.max(self.absolute_secs);
        (self.relative * requested_secs).clamp(self.absolute_secs, ceiling)
    }

    /// Whether `measured_secs` is close enough to `requested_secs`.
    #[must_use]
    pub fn accepts(&self, requested_secs: f64, measured_secs: f64) -> bool {
        (measured_secs - requested_secs).abs() <= self.allowed_secs(requested_secs)
    }
}

/// Attempt budget plus tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingPolicy {
    /// Total attempts, counting timing misses and hard failures alike.
    pub max_attempts: u32,
    pub tolerance: TolerancePolicy,
}

impl Default for TimingPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            tolerance: TolerancePolicy::default(),
        }
    }
}
