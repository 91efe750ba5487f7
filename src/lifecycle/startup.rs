//! Startup helpers.
//!
//! # Responsibilities
//! - Load and validate configuration, or fall back to defaults
//! - Work out where local clients should send traffic
//!
//! # Design Decisions
//! - Fail fast: a config file that exists but is invalid is fatal
//! - A missing default config file is not an error

use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::path::Path;

use crate::config::{load_config, ConfigError, SimulatorConfig};

/// Load `path` if given. Without a path, use the built-in defaults.
pub fn load_or_default(path: Option<&Path>) -> Result<SimulatorConfig, ConfigError> {
    match path {
        Some(path) => {
            let config = load_config(path)?;
            tracing::info!(path = %path.display(), "Configuration loaded");
            Ok(config)
        }
        None => {
            tracing::info!("No config file given, using defaults");
            Ok(SimulatorConfig::default())
        }
    }
}

/// Base URL a local client should use to reach a server bound to `addr`.
///
/// Wildcard binds are reached through loopback.
pub fn local_base_url(addr: SocketAddr) -> String {
    let ip = match addr {
        SocketAddr::V4(v4) if v4.ip().is_unspecified() => Ipv4Addr::LOCALHOST.into(),
        SocketAddr::V6(v6) if v6.ip().is_unspecified() => Ipv6Addr::LOCALHOST.into(),
        _ => addr.ip(),
    };
    format!("http://{}", SocketAddr::new(ip, addr.port()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_path() {
        let config = load_or_default(None).unwrap();
        assert_eq!(config.targets.len(), 3);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = load_or_default(Some(Path::new("/nonexistent/gateway-sim.toml")));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_local_base_url() {
        assert_eq!(
            local_base_url("0.0.0.0:8080".parse().unwrap()),
            "http://127.0.0.1:8080"
        );
        assert_eq!(
            local_base_url("10.1.2.3:9000".parse().unwrap()),
            "http://10.1.2.3:9000"
        );
        assert_eq!(local_base_url("[::]:80".parse().unwrap()), "http://[::1]:80");
    }
}
