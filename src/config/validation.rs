//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (rate > 0, weights > 0, probabilities in [0, 1])
//! - Detect duplicate target identifiers
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: SimulatorConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::SimulatorConfig;

/// Largest accepted cooldown escalation exponent.
pub const MAX_COOLDOWN_EXPONENT: u32 = 32;

/// Longest accepted cooldown cap (one week).
pub const MAX_COOLDOWN_SECS: u64 = 7 * 24 * 3600;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Check a parsed configuration for semantic errors.
pub fn validate_config(config: &SimulatorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }
    if config.listener.request_timeout_secs == 0 {
        errors.push(ValidationError::new("listener.request_timeout_secs", "must be greater than 0"));
    }

    let rps = config.limiter.requests_per_second;
    if !rps.is_finite() || rps <= 0.0 {
        errors.push(ValidationError::new(
            "limiter.requests_per_second",
            format!("{rps} must be finite and greater than 0"),
        ));
    }
    if let Some(burst) = config.limiter.burst {
        if !burst.is_finite() || burst < 1.0 {
            errors.push(ValidationError::new(
                "limiter.burst",
                format!("{burst} must be at least 1"),
            ));
        }
    }

    if config.targets.is_empty() {
        errors.push(ValidationError::new("targets", "at least one target is required"));
    }
    let mut seen = HashSet::new();
    for (i, target) in config.targets.iter().enumerate() {
        let field = |name: &str| format!("targets[{i}].{name}");
        if target.id.is_empty() {
            errors.push(ValidationError::new(field("id"), "must not be empty"));
        } else if !seen.insert(target.id.as_str()) {
            errors.push(ValidationError::new(field("id"), format!("duplicate id '{}'", target.id)));
        }
        if target.weight == 0 {
            errors.push(ValidationError::new(field("weight"), "must be greater than 0"));
        }
        if !(0.0..=1.0).contains(&target.error_rate) {
            errors.push(ValidationError::new(
                field("error_rate"),
                format!("{} must be within [0, 1]", target.error_rate),
            ));
        }
    }

    let cooldown = &config.cooldown;
    if cooldown.base_secs == 0 {
        errors.push(ValidationError::new("cooldown.base_secs", "must be greater than 0"));
    }
    if !cooldown.factor.is_finite() || cooldown.factor < 1.0 {
        errors.push(ValidationError::new("cooldown.factor", "must be at least 1"));
    }
    if !(0.0..1.0).contains(&cooldown.jitter_ratio) {
        errors.push(ValidationError::new("cooldown.jitter_ratio", "must be within [0, 1)"));
    }
    if cooldown.max_secs < cooldown.base_secs {
        errors.push(ValidationError::new("cooldown.max_secs", "must not be below base_secs"));
    } else if cooldown.max_secs > MAX_COOLDOWN_SECS {
        errors.push(ValidationError::new(
            "cooldown.max_secs",
            format!("must not exceed {MAX_COOLDOWN_SECS}"),
        ));
    }
    if cooldown.max_exponent > MAX_COOLDOWN_EXPONENT {
        errors.push(ValidationError::new(
            "cooldown.max_exponent",
            format!("must not exceed {MAX_COOLDOWN_EXPONENT}"),
        ));
    }

    let upstream_ms = config.upstream.timeout_ms;
    let request_ms = config.listener.request_timeout_secs.saturating_mul(1000);
    if upstream_ms == 0 {
        errors.push(ValidationError::new("upstream.timeout_ms", "must be greater than 0"));
    } else if request_ms > 0 && upstream_ms >= request_ms {
        // The upstream deadline must fire before the handler timeout.
        errors.push(ValidationError::new(
            "upstream.timeout_ms",
            format!("{upstream_ms} must be below listener.request_timeout_secs ({request_ms} ms)"),
        ));
    }
    if config.traffic.enabled && config.traffic.request_timeout_secs == 0 {
        errors.push(ValidationError::new("traffic.request_timeout_secs", "must be greater than 0"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if config.admin.enabled && config.admin.api_key.is_empty() {
        errors.push(ValidationError::new("admin.api_key", "must be set when admin is enabled"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
