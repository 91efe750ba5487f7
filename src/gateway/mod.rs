//! Request routing core.
//!
//! # Data Flow
//! ```text
//! Inbound request
//!     → security::rate_limit (admit or reject)
//!     → load_balancer::pool (choose an available target)
//!     → caller-supplied upstream call
//!     → health::passive (record failure or success)
//!     → Outcome returned to the transport layer
//! ```
//!
//! # Design Decisions
//! - No network I/O here; the upstream call is a closure
//! - Expected conditions are `Outcome` values, never errors
//! - Time and randomness are injected so tests can drive both

pub mod outcome;

use std::future::Future;
use std::sync::Arc;

use crate::config::SimulatorConfig;
use crate::error::GatewayError;
use crate::health::{FailureKind, HealthTracker};
use crate::load_balancer::{Target, TargetPool, WeightedRandom};
use crate::security::{build_limiter, Admission};
use crate::sources::{Clock, RandomSource, SystemClock, ThreadRandom};

pub use outcome::Outcome;

/// Admission, selection and health tracking for one set of targets.
#[derive(Debug)]
pub struct Gateway {
    limiter: Box<dyn Admission>,
    pool: TargetPool,
    health: Arc<HealthTracker>,
    clock: Arc<dyn Clock>,
}

impl Gateway {
    /// Build a gateway from config with explicit time and randomness sources.
    pub fn new(
        config: &SimulatorConfig,
        clock: Arc<dyn Clock>,
        random: Arc<dyn RandomSource>,
    ) -> Result<Self, GatewayError> {
        let limiter = build_limiter(
            config.limiter.strategy,
            config.limiter.requests_per_second,
            config.limiter.burst,
            clock.clone(),
        )?;

        let health = Arc::new(HealthTracker::new(
            config.targets.iter().map(|t| t.id.clone()),
            config.cooldown.clone(),
            clock.clone(),
            random.clone(),
        ));

        let targets = config.targets.iter().map(Target::from).collect();
        let pool = TargetPool::new(
            targets,
            Box::new(WeightedRandom::new(random)),
            health.clone(),
        )?;

        tracing::info!(
            targets = config.targets.len(),
            total_weight = pool.total_weight(),
            rate = config.limiter.requests_per_second,
            strategy = ?config.limiter.strategy,
            "Gateway initialized"
        );

        Ok(Self {
            limiter,
            pool,
            health,
            clock,
        })
    }

    /// Build a gateway on the system clock and thread-local randomness.
    pub fn from_config(config: &SimulatorConfig) -> Result<Self, GatewayError> {
        Self::new(config, Arc::new(SystemClock::new()), Arc::new(ThreadRandom))
    }

    /// Route one request.
    ///
    /// `call` performs the upstream request against the chosen target. Its
    /// error is the failure classification; timeouts must already be mapped
    /// to [`FailureKind::Timeout`]. If the returned future is dropped while
    /// the call is pending, the target is charged a timeout failure.
    pub async fn route<F, Fut>(&self, call: F) -> Outcome
    where
        F: FnOnce(Arc<Target>) -> Fut,
        Fut: Future<Output = Result<(), FailureKind>>,
    {
        if !self.limiter.admit() {
            tracing::debug!("Request rejected by rate limiter");
            return Outcome::RateLimited;
        }

        let target = self.pool.choose();
        let started = self.clock.now();
        let in_flight = InFlight {
            health: self.health.as_ref(),
            target: target.as_ref(),
            armed: true,
        };
        let result = call(target.clone()).await;
        in_flight.complete();
        let duration = self.clock.now().saturating_sub(started);

        match result {
            Ok(()) => {
                self.health.record_success(&target.id);
                tracing::debug!(target_id = %target.id, ?duration, "Upstream call succeeded");
                Outcome::Success { target, duration }
            }
            Err(kind) => {
                self.health.record_failure(&target.id, kind);
                Outcome::Failure {
                    target,
                    kind,
                    duration,
                }
            }
        }
    }

    /// Apply target weights from a reloaded config. Returns how many were applied.
    ///
    /// Targets cannot be added or removed at runtime.
    pub fn reload_weights(&self, config: &SimulatorConfig) -> usize {
        self.pool
            .apply_weights(config.targets.iter().map(|t| (t.id.as_str(), t.weight)))
    }

    pub fn limiter(&self) -> &dyn Admission {
        self.limiter.as_ref()
    }

    pub fn pool(&self) -> &TargetPool {
        &self.pool
    }

    pub fn health(&self) -> &HealthTracker {
        &self.health
    }
}

/// Charges a timeout to the target unless the upstream call completes.
struct InFlight<'a> {
    health: &'a HealthTracker,
    target: &'a Target,
    armed: bool,
}

impl InFlight<'_> {
    fn complete(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        tracing::warn!(target_id = %self.target.id, "Upstream call cancelled");
        self.health.record_failure(&self.target.id, FailureKind::Timeout);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TargetConfig;
    use crate::sources::{ManualClock, SeededRandom};
    use std::time::Duration;

    fn config(rate: f64, burst: Option<f64>, targets: &[(&str, u32)]) -> SimulatorConfig {
        let mut config = SimulatorConfig::default();
        config.limiter.requests_per_second = rate;
        config.limiter.burst = burst;
        config.targets = targets
            .iter()
            .map(|(id, w)| TargetConfig::new(*id, *w))
            .collect::<Vec<_>>()
            .into();
        config
    }

    fn gateway(config: &SimulatorConfig) -> (Arc<ManualClock>, Gateway) {
        let clock = Arc::new(ManualClock::new());
        let gateway = Gateway::new(config, clock.clone(), Arc::new(SeededRandom::new(3))).unwrap();
        (clock, gateway)
    }

    #[tokio::test]
    async fn test_rejected_requests_never_reach_upstream() {
        let (_clock, gateway) = gateway(&config(1.0, Some(2.0), &[("a", 1)]));
        let mut calls = 0;

        for _ in 0..5 {
            gateway
                .route(|_| {
                    calls += 1;
                    async { Ok(()) }
                })
                .await;
        }
        assert_eq!(calls, 2);
    }

    #[tokio::test]
    async fn test_outcome_carries_target_and_duration() {
        let (clock, gateway) = gateway(&config(100.0, None, &[("a", 1)]));

        let outcome = gateway
            .route(|target| {
                assert_eq!(target.id, "a");
                clock.advance(Duration::from_millis(250));
                async { Ok(()) }
            })
            .await;

        assert!(outcome.is_success());
        assert_eq!(outcome.target().unwrap().id, "a");
        assert_eq!(outcome.duration(), Some(Duration::from_millis(250)));
    }

    #[tokio::test]
    async fn test_failure_moves_traffic_to_other_target() {
        let (_clock, gateway) = gateway(&config(1000.0, None, &[("a", 99), ("b", 1)]));

        // Fail whatever gets picked first.
        let first = gateway.route(|_| async { Err(FailureKind::ServerError) }).await;
        let failed = first.target().unwrap().id.clone();
        assert_eq!(first.failure_kind(), Some(FailureKind::ServerError));
        assert!(!gateway.health().is_available(&failed));

        for _ in 0..20 {
            let outcome = gateway.route(|_| async { Ok(()) }).await;
            assert_ne!(outcome.target().unwrap().id, failed);
        }
    }

    #[tokio::test]
    async fn test_hard_failure_disables_target() {
        let (clock, gateway) = gateway(&config(1000.0, None, &[("a", 1), ("b", 1)]));

        let outcome = gateway.route(|_| async { Err(FailureKind::Billing) }).await;
        let id = outcome.target().unwrap().id.clone();
        let health = gateway.health().snapshot(&id).unwrap();
        assert!(health.disabled_until > clock.now());
        assert_eq!(health.cooldown_until, Duration::ZERO);
    }

    #[tokio::test]
    async fn test_single_target_keeps_serving_through_fallback() {
        let (_clock, gateway) = gateway(&config(1000.0, None, &[("only", 1)]));

        gateway.route(|_| async { Err(FailureKind::RateLimit) }).await;
        let outcome = gateway.route(|_| async { Ok(()) }).await;

        assert_eq!(outcome.target().unwrap().id, "only");
        // Still inside its cooldown, so the success does not reset anything.
        assert_eq!(gateway.health().snapshot("only").unwrap().error_count, 1);
    }

    #[tokio::test]
    async fn test_recovery_after_cooldown() {
        let (clock, gateway) = gateway(&config(1000.0, None, &[("only", 1)]));

        gateway.route(|_| async { Err(FailureKind::Timeout) }).await;
        clock.advance(Duration::from_secs(79));
        gateway.route(|_| async { Ok(()) }).await;

        assert_eq!(gateway.health().snapshot("only").unwrap().error_count, 0);
    }

    #[tokio::test]
    async fn test_cancelled_call_counts_as_failure() {
        let (_clock, gateway) = gateway(&config(1000.0, None, &[("a", 1)]));

        let result = tokio::time::timeout(
            Duration::from_millis(20),
            gateway.route(|_| std::future::pending::<Result<(), FailureKind>>()),
        )
        .await;
        assert!(result.is_err());

        let health = gateway.health().snapshot("a").unwrap();
        assert_eq!(health.error_count, 1);
        assert!(!gateway.health().is_available("a"));
    }

    #[tokio::test]
    async fn test_completed_call_is_not_charged_twice() {
        let (_clock, gateway) = gateway(&config(1000.0, None, &[("a", 1)]));

        gateway.route(|_| async { Ok(()) }).await;
        assert_eq!(gateway.health().snapshot("a").unwrap().error_count, 0);

        gateway.route(|_| async { Err(FailureKind::ServerError) }).await;
        assert_eq!(gateway.health().snapshot("a").unwrap().error_count, 1);
    }

    #[test]
    fn test_construction_errors() {
        let clock = Arc::new(ManualClock::new());
        let random = Arc::new(SeededRandom::new(1));

        let no_targets = config(10.0, None, &[]);
        assert_eq!(
            Gateway::new(&no_targets, clock.clone(), random.clone()).unwrap_err(),
            GatewayError::NoTargets
        );

        let zero_rate = config(0.0, None, &[("a", 1)]);
        assert_eq!(
            Gateway::new(&zero_rate, clock, random).unwrap_err(),
            GatewayError::InvalidRate(0.0)
        );
    }

    #[test]
    fn test_reload_weights() {
        let (_clock, gateway) = gateway(&config(10.0, None, &[("a", 1), ("b", 1)]));

        let mut updated = config(10.0, None, &[("a", 5), ("b", 1), ("c", 9)]);
        updated.limiter.requests_per_second = 99.0;
        assert_eq!(gateway.reload_weights(&updated), 2);
        assert_eq!(gateway.pool().total_weight(), 6);
    }
}
