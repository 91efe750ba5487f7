//! Per-target health record.
//!
//! # States
//! - Available: `now` is past both deadlines
//! - Cooling down: `now < cooldown_until` (transient failures)
//! - Disabled: `now < disabled_until` (hard failures)
//!
//! Cooling down and disabled can overlap; the target returns once both pass.

use std::time::Duration;

/// Failure history and exclusion deadlines for one target.
///
/// Times are clock readings; a zero deadline has never been set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TargetHealth {
    /// Failures since the last recovery.
    pub error_count: u32,
    /// When the most recent failure was recorded.
    pub last_failure: Option<Duration>,
    /// Excluded until this time after a transient failure.
    pub cooldown_until: Duration,
    /// Excluded until this time after a hard failure.
    pub disabled_until: Duration,
}

impl TargetHealth {
    pub fn is_available(&self, now: Duration) -> bool {
        now >= self.cooldown_until && now >= self.disabled_until
    }

    /// When the target becomes selectable again.
    pub fn expiry(&self) -> Duration {
        self.cooldown_until.max(self.disabled_until)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_target_is_available() {
        assert!(TargetHealth::default().is_available(Duration::ZERO));
    }

    #[test]
    fn test_either_deadline_excludes() {
        let secs = Duration::from_secs;
        let cooling = TargetHealth {
            cooldown_until: secs(10),
            ..Default::default()
        };
        assert!(!cooling.is_available(secs(9)));
        assert!(cooling.is_available(secs(10)));

        let both = TargetHealth {
            cooldown_until: secs(10),
            disabled_until: secs(30),
            ..Default::default()
        };
        assert!(!both.is_available(secs(20)));
        assert_eq!(both.expiry(), secs(30));
    }
}
