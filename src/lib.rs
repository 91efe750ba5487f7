//! API gateway simulator.
//!
//! A token-bucket admission gate in front of weighted random routing across
//! upstream targets, with escalating cooldowns for targets that fail.

// Core
pub mod error;
pub mod gateway;
pub mod sources;

// Traffic management
pub mod health;
pub mod load_balancer;
pub mod security;

// Edges
pub mod admin;
pub mod config;
pub mod http;
pub mod simulation;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;
pub mod resilience;

pub use config::SimulatorConfig;
pub use error::GatewayError;
pub use gateway::{Gateway, Outcome};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
