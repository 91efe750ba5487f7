//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config (or defaults) → Validate → Build gateway → Bind listener
//!
//! Shutdown (shutdown.rs):
//!     Trigger → server stops accepting, traffic clients stop, watcher exits
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - One watch channel fans shutdown out to every task

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::{Shutdown, ShutdownSignal};
