//! Fake upstream provider calls.

use std::sync::Arc;
use std::time::Duration;

use crate::health::FailureKind;
use crate::load_balancer::Target;
use crate::resilience::with_deadline;
use crate::sources::RandomSource;

/// Plays the part of an upstream provider using each target's profile.
#[derive(Debug, Clone)]
pub struct SimulatedUpstream {
    random: Arc<dyn RandomSource>,
    timeout: Duration,
}

impl SimulatedUpstream {
    pub fn new(random: Arc<dyn RandomSource>, timeout: Duration) -> Self {
        Self { random, timeout }
    }

    /// Wait out the target's latency, then fail with probability `error_rate`.
    ///
    /// Calls slower than the configured timeout fail with
    /// [`FailureKind::Timeout`].
    pub async fn call(&self, target: Arc<Target>) -> Result<(), FailureKind> {
        let profile = target.profile;
        with_deadline(self.timeout, async {
            tokio::time::sleep(profile.latency).await;
            if self.random.next_f64() < profile.error_rate {
                Err(profile.failure_kind)
            } else {
                Ok(())
            }
        })
        .await
    }
}
