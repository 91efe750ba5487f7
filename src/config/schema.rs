//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the simulator.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::health::FailureKind;
use crate::security::LimiterStrategy;

/// Root configuration for the gateway simulator.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Global admission limit.
    pub limiter: LimiterConfig,

    /// Upstream targets, in selection order.
    pub targets: TargetList,

    /// Cooldown backoff applied to failing targets.
    pub cooldown: CooldownConfig,

    /// Simulated upstream call settings.
    pub upstream: UpstreamConfig,

    /// Synthetic traffic generator.
    pub traffic: TrafficConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Admin API.
    pub admin: AdminConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Request timeout for the whole handler, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimiterConfig {
    /// Sustained admissions per second.
    pub requests_per_second: f64,

    /// Burst capacity. Derived from the rate when absent.
    pub burst: Option<f64>,

    /// Concurrency strategy guarding the bucket.
    pub strategy: LimiterStrategy,
}

impl Default for LimiterConfig {
    fn default() -> Self {
        Self {
            requests_per_second: 1000.0,
            burst: None,
            strategy: LimiterStrategy::default(),
        }
    }
}

/// A single upstream target.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct TargetConfig {
    /// Unique target identifier.
    pub id: String,

    /// Relative selection weight.
    #[serde(default = "default_weight")]
    pub weight: u32,

    /// Simulated response latency in milliseconds.
    #[serde(default)]
    pub latency_ms: u64,

    /// Probability in [0, 1] that a simulated call fails.
    #[serde(default)]
    pub error_rate: f64,

    /// Failure kind produced by simulated failures.
    #[serde(default = "default_failure_kind")]
    pub failure_kind: FailureKind,
}

fn default_weight() -> u32 {
    1
}

fn default_failure_kind() -> FailureKind {
    FailureKind::RateLimit
}

impl TargetConfig {
    pub fn new(id: impl Into<String>, weight: u32) -> Self {
        Self {
            id: id.into(),
            weight,
            latency_ms: 0,
            error_rate: 0.0,
            failure_kind: default_failure_kind(),
        }
    }
}

/// Ordered target list with the stock three-provider setup as default.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(transparent)]
pub struct TargetList(pub Vec<TargetConfig>);

impl Default for TargetList {
    fn default() -> Self {
        let provider = |id: &str, weight, latency_ms, error_rate| TargetConfig {
            id: id.to_string(),
            weight,
            latency_ms,
            error_rate,
            failure_kind: FailureKind::RateLimit,
        };
        Self(vec![
            provider("provider1", 70, 100, 0.05),
            provider("provider2", 20, 500, 0.10),
            provider("provider3", 10, 2000, 0.20),
        ])
    }
}

impl std::ops::Deref for TargetList {
    type Target = Vec<TargetConfig>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::ops::DerefMut for TargetList {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<Vec<TargetConfig>> for TargetList {
    fn from(targets: Vec<TargetConfig>) -> Self {
        Self(targets)
    }
}

/// Exponential cooldown with jitter.
///
/// `cooldown = min(base * factor^min(errors - 1, max_exponent) * (1 ± jitter), max)`
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct CooldownConfig {
    /// Cooldown after the first failure, in seconds.
    pub base_secs: u64,

    /// Growth factor per consecutive failure.
    pub factor: f64,

    /// Failures past this exponent stop growing the cooldown.
    pub max_exponent: u32,

    /// Symmetric jitter as a fraction of the cooldown, in [0, 1).
    pub jitter_ratio: f64,

    /// Hard ceiling, in seconds.
    pub max_secs: u64,
}

impl Default for CooldownConfig {
    fn default() -> Self {
        Self {
            base_secs: 60,
            factor: 5.0,
            max_exponent: 3,
            jitter_ratio: 0.3,
            max_secs: 3600,
        }
    }
}

/// Simulated upstream call settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Deadline for a single upstream call in milliseconds.
    pub timeout_ms: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self { timeout_ms: 10_000 }
    }
}

/// Synthetic client traffic.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TrafficConfig {
    /// Start the generator alongside the gateway.
    pub enabled: bool,

    /// Number of concurrent clients.
    pub clients: usize,

    /// Pause between requests for client 0, in milliseconds.
    pub base_delay_ms: u64,

    /// Additional pause per client index, in milliseconds.
    pub per_client_delay_ms: u64,

    /// Client-side request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for TrafficConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            clients: 100,
            base_delay_ms: 100,
            per_client_delay_ms: 10,
            request_timeout_secs: 10,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Admin API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Mount the admin routes.
    pub enabled: bool,

    /// API key for authentication (Bearer token).
    pub api_key: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            // WARNING: This is a placeholder! Change this in production.
            api_key: "CHANGE_ME_IN_PRODUCTION".to_string(),
        }
    }
}
