//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events (structured fields, filtered by logging.rs)
//!
//! HTTP layer produces, from each Outcome:
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (fmt layer)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Core components only log; metrics are recorded at the edge
//! - Metrics calls are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
