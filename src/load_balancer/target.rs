//! Upstream target abstraction.
//!
//! # Responsibilities
//! - Identify a single upstream target
//! - Carry its selection weight
//! - Carry the profile the simulated upstream uses (latency, error rate)

use std::time::Duration;

use crate::config::TargetConfig;
use crate::health::FailureKind;

/// How the simulated upstream behaves for a target. Not used for selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetProfile {
    pub latency: Duration,
    /// Probability in [0, 1] that a call fails.
    pub error_rate: f64,
    /// Kind reported when a call fails.
    pub failure_kind: FailureKind,
}

impl Default for TargetProfile {
    fn default() -> Self {
        Self {
            latency: Duration::ZERO,
            error_rate: 0.0,
            failure_kind: FailureKind::RateLimit,
        }
    }
}

/// A single upstream target.
///
/// Targets are immutable; a weight change swaps in a new `Target` with the
/// same id.
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub id: String,
    pub weight: u32,
    pub profile: TargetProfile,
}

impl Target {
    pub fn new(id: impl Into<String>, weight: u32) -> Self {
        Self {
            id: id.into(),
            weight,
            profile: TargetProfile::default(),
        }
    }

    pub fn with_profile(mut self, profile: TargetProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Same target, different weight.
    pub fn reweighted(&self, weight: u32) -> Self {
        Self {
            weight,
            ..self.clone()
        }
    }
}

impl From<&TargetConfig> for Target {
    fn from(config: &TargetConfig) -> Self {
        Target::new(config.id.clone(), config.weight).with_profile(TargetProfile {
            latency: Duration::from_millis(config.latency_ms),
            error_rate: config.error_rate,
            failure_kind: config.failure_kind,
        })
    }
}
