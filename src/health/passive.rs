//! Passive health tracking from request outcomes.
//!
//! # Responsibilities
//! - Count failures per target
//! - Exclude failing targets for an escalating, jittered cooldown
//! - Keep hard failures (billing, policy) on their own deadline
//! - Reset the error count once a target succeeds after its exclusion ends

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use crate::config::CooldownConfig;
use crate::health::failure::FailureKind;
use crate::health::state::TargetHealth;
use crate::resilience::backoff::calculate_cooldown;
use crate::sources::{Clock, RandomSource};

/// Health records for a fixed set of targets.
///
/// The map itself never changes after construction; each record has its own
/// lock, so failures on one target never block reads of another.
#[derive(Debug)]
pub struct HealthTracker {
    records: HashMap<String, RwLock<TargetHealth>>,
    cooldown: CooldownConfig,
    clock: Arc<dyn Clock>,
    random: Arc<dyn RandomSource>,
}

impl HealthTracker {
    pub fn new<I, S>(
        target_ids: I,
        cooldown: CooldownConfig,
        clock: Arc<dyn Clock>,
        random: Arc<dyn RandomSource>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let records = target_ids
            .into_iter()
            .map(|id| (id.into(), RwLock::new(TargetHealth::default())))
            .collect();

        Self {
            records,
            cooldown,
            clock,
            random,
        }
    }

    /// Current clock reading.
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Whether the target may be selected right now. Unknown targets never are.
    pub fn is_available(&self, target_id: &str) -> bool {
        let now = self.clock.now();
        self.read(target_id)
            .map(|health| health.is_available(now))
            .unwrap_or(false)
    }

    /// When the target becomes selectable again.
    pub fn expiry(&self, target_id: &str) -> Option<Duration> {
        self.read(target_id).map(|health| health.expiry())
    }

    /// Copy of the target's record.
    pub fn snapshot(&self, target_id: &str) -> Option<TargetHealth> {
        self.read(target_id)
    }

    /// Record a failed call and exclude the target.
    ///
    /// Returns the exclusion applied, or `None` for an unknown target.
    pub fn record_failure(&self, target_id: &str, kind: FailureKind) -> Option<Duration> {
        let Some(record) = self.records.get(target_id) else {
            tracing::warn!(target_id, %kind, "Failure reported for unknown target");
            return None;
        };

        let mut health = record.write().unwrap_or_else(PoisonError::into_inner);
        let now = self.clock.now();

        health.error_count = health.error_count.saturating_add(1);
        health.last_failure = Some(now);

        let cooldown = calculate_cooldown(health.error_count, &self.cooldown, self.random.as_ref());
        let until = now.saturating_add(cooldown);
        if kind.is_hard() {
            health.disabled_until = until;
        } else {
            health.cooldown_until = until;
        }

        tracing::warn!(
            target_id,
            %kind,
            error_count = health.error_count,
            cooldown_secs = cooldown.as_secs_f64(),
            hard = kind.is_hard(),
            "Target excluded after failure"
        );

        Some(cooldown)
    }

    /// Record a successful call.
    ///
    /// Clears the error count if the target had failures and is past its
    /// deadlines. A success while still excluded (reached through fallback)
    /// changes nothing. Returns whether the target recovered.
    pub fn record_success(&self, target_id: &str) -> bool {
        let Some(record) = self.records.get(target_id) else {
            tracing::warn!(target_id, "Success reported for unknown target");
            return false;
        };

        // Fast path: most successes are on targets with a clean record.
        if record.read().unwrap_or_else(PoisonError::into_inner).error_count == 0 {
            return false;
        }

        let mut health = record.write().unwrap_or_else(PoisonError::into_inner);
        if health.error_count == 0 || !health.is_available(self.clock.now()) {
            return false;
        }

        tracing::info!(
            target_id,
            previous_errors = health.error_count,
            "Target recovered"
        );
        health.error_count = 0;
        true
    }

    fn read(&self, target_id: &str) -> Option<TargetHealth> {
        self.records
            .get(target_id)
            .map(|record| *record.read().unwrap_or_else(PoisonError::into_inner))
    }
}
