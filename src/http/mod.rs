//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, timeout, trace layers)
//!     → Gateway::route with the simulated upstream
//!     → observability::metrics (record the outcome)
//!     → response.rs (outcome → status code + JSON body)
//!     → Send to client
//! ```

pub mod response;
pub mod server;

pub use server::{AppState, HttpServer};
