//! Target pool management.
//!
//! # Responsibilities
//! - Own the routing table (targets + cached total weight)
//! - Filter out targets the health tracker currently excludes
//! - Apply the load balancing strategy to the rest
//! - Fall back to the soonest-returning target when none are available

use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock};

use crate::error::GatewayError;
use crate::health::HealthTracker;
use crate::load_balancer::{target::Target, LoadBalancer};

#[derive(Debug)]
struct RoutingTable {
    targets: Vec<Arc<Target>>,
    total_weight: u64,
}

impl RoutingTable {
    fn recompute_total(&mut self) {
        self.total_weight = self.targets.iter().map(|t| u64::from(t.weight)).sum();
    }
}

/// The selectable targets and how to choose between them.
#[derive(Debug)]
pub struct TargetPool {
    table: RwLock<RoutingTable>,
    balancer: Box<dyn LoadBalancer>,
    health: Arc<HealthTracker>,
}

impl TargetPool {
    /// Create a pool. Fails on an empty list, a zero weight or a duplicate id.
    pub fn new(
        targets: Vec<Target>,
        balancer: Box<dyn LoadBalancer>,
        health: Arc<HealthTracker>,
    ) -> Result<Self, GatewayError> {
        if targets.is_empty() {
            return Err(GatewayError::NoTargets);
        }

        let mut seen = HashSet::new();
        for target in &targets {
            if !seen.insert(target.id.as_str()) {
                return Err(GatewayError::DuplicateTarget(target.id.clone()));
            }
            if target.weight == 0 {
                return Err(GatewayError::ZeroWeight(target.id.clone()));
            }
        }

        let mut table = RoutingTable {
            targets: targets.into_iter().map(Arc::new).collect(),
            total_weight: 0,
        };
        table.recompute_total();

        Ok(Self {
            table: RwLock::new(table),
            balancer,
            health,
        })
    }

    /// Pick a target for the next request.
    ///
    /// Weights are normalised over the currently available targets, so an
    /// excluded target's share is spread across the others in proportion.
    /// When every target is excluded, returns the one whose exclusion ends
    /// first (ties go to the earlier configured target).
    pub fn choose(&self) -> Arc<Target> {
        let table = self.table.read().unwrap_or_else(PoisonError::into_inner);

        let available: Vec<Arc<Target>> = table
            .targets
            .iter()
            .filter(|t| self.health.is_available(&t.id))
            .cloned()
            .collect();

        if available.is_empty() {
            return self.soonest_expiring(&table.targets);
        }

        let total_weight = if available.len() == table.targets.len() {
            table.total_weight
        } else {
            available.iter().map(|t| u64::from(t.weight)).sum()
        };

        match self.balancer.next_target(&available, total_weight) {
            Some(target) => target,
            None => available[0].clone(),
        }
    }

    fn soonest_expiring(&self, targets: &[Arc<Target>]) -> Arc<Target> {
        let mut selected = &targets[0];
        let mut soonest = self.health.expiry(&selected.id).unwrap_or_default();

        for target in &targets[1..] {
            let expiry = self.health.expiry(&target.id).unwrap_or_default();
            if expiry < soonest {
                soonest = expiry;
                selected = target;
            }
        }

        tracing::warn!(
            target_id = %selected.id,
            returns_in_secs = soonest.saturating_sub(self.health.now()).as_secs_f64(),
            "All targets excluded, using the one returning soonest"
        );
        selected.clone()
    }

    /// Change a target's weight.
    pub fn set_weight(&self, target_id: &str, weight: u32) -> Result<(), GatewayError> {
        if weight == 0 {
            return Err(GatewayError::ZeroWeight(target_id.to_string()));
        }

        let mut table = self.table.write().unwrap_or_else(PoisonError::into_inner);
        let slot = table
            .targets
            .iter_mut()
            .find(|t| t.id == target_id)
            .ok_or_else(|| GatewayError::UnknownTarget(target_id.to_string()))?;

        if slot.weight != weight {
            tracing::info!(target_id, from = slot.weight, to = weight, "Target weight changed");
            *slot = Arc::new(slot.reweighted(weight));
            table.recompute_total();
        }
        Ok(())
    }

    /// Apply a batch of weights, e.g. from a reloaded config.
    ///
    /// Unknown ids are skipped with a warning. Returns how many were applied.
    pub fn apply_weights<'a, I>(&self, weights: I) -> usize
    where
        I: IntoIterator<Item = (&'a str, u32)>,
    {
        let mut applied = 0;
        for (target_id, weight) in weights {
            match self.set_weight(target_id, weight) {
                Ok(()) => applied += 1,
                Err(e) => tracing::warn!(error = %e, "Skipping weight update"),
            }
        }
        applied
    }

    /// All targets in configured order.
    pub fn targets(&self) -> Vec<Arc<Target>> {
        self.table
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .targets
            .clone()
    }

    /// Sum of all configured weights.
    pub fn total_weight(&self) -> u64 {
        self.table
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .total_weight
    }

    pub fn health(&self) -> &HealthTracker {
        &self.health
    }
}
