//! Admission control.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → rate_limit.rs (global token bucket: admit or reject)
//!     → Rejected: 429, request never reaches a target
//!     → Admitted: pass to target selection
//! ```
//!
//! # Design Decisions
//! - One process-wide bucket, no per-client state
//! - Rejection is backpressure, not an error
//! - Two interchangeable strategies (mutex, lock-free) with identical arithmetic

pub mod rate_limit;

pub use rate_limit::{
    build_limiter, default_capacity, Admission, LimiterSnapshot, LimiterStrategy, LockFreeLimiter,
    MutexLimiter,
};
