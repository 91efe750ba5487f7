//! Metrics collection and exposition.
//!
//! # Metrics
//! - `simulator_requests_total` (counter): admitted requests by provider, status
//! - `simulator_request_duration_seconds` (histogram): successful call latency
//! - `simulator_rate_limit_hits_total` (counter): limiter rejections
//! - `simulator_provider_errors_total` (counter): failures by provider, kind
//! - `simulator_active_clients` (gauge): running traffic generator clients

use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::gateway::Outcome;

pub const REQUESTS_TOTAL: &str = "simulator_requests_total";
pub const REQUEST_DURATION: &str = "simulator_request_duration_seconds";
pub const RATE_LIMIT_HITS: &str = "simulator_rate_limit_hits_total";
pub const PROVIDER_ERRORS: &str = "simulator_provider_errors_total";
pub const ACTIVE_CLIENTS: &str = "simulator_active_clients";

/// Install the Prometheus recorder and serve it on `addr`.
///
/// Must run inside a tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;

    ::metrics::describe_counter!(REQUESTS_TOTAL, "Admitted requests by provider and status");
    ::metrics::describe_histogram!(
        REQUEST_DURATION,
        ::metrics::Unit::Seconds,
        "Upstream call duration for successful requests"
    );
    ::metrics::describe_counter!(RATE_LIMIT_HITS, "Requests rejected by the rate limiter");
    ::metrics::describe_counter!(PROVIDER_ERRORS, "Upstream failures by provider and kind");
    ::metrics::describe_gauge!(ACTIVE_CLIENTS, "Running synthetic traffic clients");

    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one routed request.
pub fn record_outcome(outcome: &Outcome) {
    match outcome {
        Outcome::RateLimited => {
            ::metrics::counter!(RATE_LIMIT_HITS).increment(1);
        }
        Outcome::Success { target, duration } => {
            ::metrics::counter!(REQUESTS_TOTAL, "provider" => target.id.clone(), "status" => "success")
                .increment(1);
            ::metrics::histogram!(REQUEST_DURATION, "provider" => target.id.clone())
                .record(duration.as_secs_f64());
        }
        Outcome::Failure { target, kind, .. } => {
            ::metrics::counter!(REQUESTS_TOTAL, "provider" => target.id.clone(), "status" => "error")
                .increment(1);
            ::metrics::counter!(PROVIDER_ERRORS, "provider" => target.id.clone(), "error_type" => kind.as_str())
                .increment(1);
        }
    }
}

/// Set the number of running traffic clients.
pub fn set_active_clients(count: usize) {
    ::metrics::gauge!(ACTIVE_CLIENTS).set(count as f64);
}
