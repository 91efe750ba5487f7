//! Load balancing subsystem.
//!
//! # Data Flow
//! ```text
//! Admitted request
//!     → pool.rs (filter targets the health tracker excludes)
//!     → Apply load balancing algorithm:
//!         - weighted.rs (weighted random over the available subset)
//!     → No target available? pool.rs picks the one returning soonest
//!     → Return the chosen target
//! ```
//!
//! # Design Decisions
//! - Load balancer is stateless; the pool owns targets and weights
//! - Weights are renormalised over available targets on every pick
//! - Selection never fails once the pool is built

pub mod pool;
pub mod target;
pub mod weighted;

use std::sync::Arc;

pub use pool::TargetPool;
pub use target::{Target, TargetProfile};
pub use weighted::WeightedRandom;

/// A target selection algorithm.
pub trait LoadBalancer: Send + Sync + std::fmt::Debug {
    /// Pick one of `candidates`. `total_weight` is the sum of their weights.
    fn next_target(&self, candidates: &[Arc<Target>], total_weight: u64) -> Option<Arc<Target>>;
}
