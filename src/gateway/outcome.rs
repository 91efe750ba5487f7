//! Result of routing a single request.

use std::sync::Arc;
use std::time::Duration;

use crate::health::FailureKind;
use crate::load_balancer::Target;

/// What happened to one request.
///
/// Rate limiting and upstream failures are expected conditions, so they are
/// values here rather than errors.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// The limiter rejected the request; no target was contacted.
    RateLimited,

    /// The upstream call succeeded.
    Success {
        target: Arc<Target>,
        duration: Duration,
    },

    /// The upstream call failed and the target was excluded.
    Failure {
        target: Arc<Target>,
        kind: FailureKind,
        duration: Duration,
    },
}

impl Outcome {
    pub fn admitted(&self) -> bool {
        !matches!(self, Outcome::RateLimited)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    /// The target that handled the request, if it was admitted.
    pub fn target(&self) -> Option<&Arc<Target>> {
        match self {
            Outcome::RateLimited => None,
            Outcome::Success { target, .. } | Outcome::Failure { target, .. } => Some(target),
        }
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Outcome::Failure { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Time spent in the upstream call.
    pub fn duration(&self) -> Option<Duration> {
        match self {
            Outcome::RateLimited => None,
            Outcome::Success { duration, .. } | Outcome::Failure { duration, .. } => {
                Some(*duration)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let target = Arc::new(Target::new("p1", 1));

        let limited = Outcome::RateLimited;
        assert!(!limited.admitted());
        assert!(!limited.is_success());
        assert!(limited.target().is_none());
        assert!(limited.duration().is_none());

        let ok = Outcome::Success {
            target: target.clone(),
            duration: Duration::from_millis(5),
        };
        assert!(ok.admitted());
        assert!(ok.is_success());
        assert_eq!(ok.target().unwrap().id, "p1");
        assert_eq!(ok.failure_kind(), None);

        let failed = Outcome::Failure {
            target,
            kind: FailureKind::Billing,
            duration: Duration::from_millis(7),
        };
        assert!(failed.admitted());
        assert!(!failed.is_success());
        assert_eq!(failed.failure_kind(), Some(FailureKind::Billing));
        assert_eq!(failed.duration(), Some(Duration::from_millis(7)));
    }
}
