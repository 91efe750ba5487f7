//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → SimulatorConfig (validated, immutable)
//!     → used once to build the gateway
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → changed target weights applied to the live routing table
//! ```
//!
//! # Design Decisions
//! - Only target weights are reloadable; everything else requires restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, parse_config, ConfigError};
pub use watcher::ConfigWatcher;
pub use schema::{
    AdminConfig, CooldownConfig, LimiterConfig, ListenerConfig, ObservabilityConfig,
    SimulatorConfig, TargetConfig, TargetList, TrafficConfig, UpstreamConfig,
};
