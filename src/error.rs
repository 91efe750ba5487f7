//! Construction-time errors.
//!
//! Expected runtime conditions (rate limiting, upstream failures) are not
//! errors; they surface as [`crate::gateway::Outcome`] values.

use thiserror::Error;

/// Errors raised while building or reconfiguring the gateway.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GatewayError {
    /// The limiter rate must be a finite value greater than zero.
    #[error("invalid rate {0}: must be finite and greater than zero")]
    InvalidRate(f64),

    /// The burst capacity must allow at least one admission.
    #[error("invalid burst capacity {0}: must be at least 1")]
    InvalidCapacity(f64),

    /// The selector needs at least one target.
    #[error("no targets configured")]
    NoTargets,

    /// Two targets share the same identifier.
    #[error("duplicate target id: {0}")]
    DuplicateTarget(String),

    /// Weights are strictly positive.
    #[error("target {0} has zero weight")]
    ZeroWeight(String),

    /// The referenced target does not exist.
    #[error("unknown target: {0}")]
    UnknownTarget(String),
}
