//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to target:
//!     → timeouts.rs (enforce the upstream deadline, timeout = failure)
//!     → On failure: backoff.rs (cooldown length for the target's error count)
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every upstream call has a deadline
//! - No retries: a failed request is answered, the next one avoids the target
//! - Jittered cooldowns keep failed targets from returning in lockstep

pub mod backoff;
pub mod timeouts;

pub use backoff::calculate_cooldown;
pub use timeouts::with_deadline;
