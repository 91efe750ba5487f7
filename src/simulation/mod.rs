//! Simulated collaborators around the gateway core.
//!
//! # Data Flow
//! ```text
//! traffic.rs  → N reqwest clients → POST /chat/completions → http server
//! http server → Gateway::route → upstream.rs (sleep latency, roll error rate)
//! ```
//!
//! Nothing here talks to a real provider.

pub mod traffic;
pub mod upstream;

pub use traffic::{TrafficGenerator, TrafficReport};
pub use upstream::SimulatedUpstream;
