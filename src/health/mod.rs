//! Target health subsystem.
//!
//! # Data Flow
//! ```text
//! Upstream call finished:
//!     → failure.rs (classify what went wrong)
//!     → passive.rs (record failure or success for the target)
//!     → resilience::backoff (cooldown length from the error count)
//!     → state.rs (cooldown / disable deadlines)
//!
//! Target selection:
//!     → passive.rs is_available / expiry
//! ```
//!
//! # Design Decisions
//! - Passive only: health is learned from real traffic, never probed
//! - One lock per target so unrelated targets never contend
//! - Transient failures and hard failures keep separate deadlines
//! - A success after the deadlines have passed resets the error count

pub mod failure;
pub mod passive;
pub mod state;

pub use failure::FailureKind;
pub use passive::HealthTracker;
pub use state::TargetHealth;
