//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use gateway_sim::config::{SimulatorConfig, TargetConfig};
use gateway_sim::simulation::SimulatedUpstream;
use gateway_sim::sources::{ManualClock, SeededRandom};
use gateway_sim::{Gateway, HttpServer, Shutdown};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// A running server whose gateway reads time from a manual clock.
pub struct TestServer {
    pub addr: SocketAddr,
    pub gateway: Arc<Gateway>,
    pub clock: Arc<ManualClock>,
    pub shutdown: Shutdown,
    pub config_tx: mpsc::UnboundedSender<SimulatorConfig>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Target with no latency that fails with probability `error_rate`.
pub fn target(id: &str, weight: u32, error_rate: f64) -> TargetConfig {
    TargetConfig {
        error_rate,
        ..TargetConfig::new(id, weight)
    }
}

/// Config with the given targets and limiter settings, traffic and metrics off.
pub fn config(rate: f64, burst: Option<f64>, targets: Vec<TargetConfig>) -> SimulatorConfig {
    let mut config = SimulatorConfig::default();
    config.limiter.requests_per_second = rate;
    config.limiter.burst = burst;
    config.targets = targets.into();
    config.traffic.enabled = false;
    config.observability.metrics_enabled = false;
    config
}

/// Boot the HTTP server on a loopback port.
pub async fn start_server(config: SimulatorConfig) -> TestServer {
    let clock = Arc::new(ManualClock::new());
    let gateway = Arc::new(
        Gateway::new(&config, clock.clone(), Arc::new(SeededRandom::new(7))).unwrap(),
    );
    let upstream = SimulatedUpstream::new(
        Arc::new(SeededRandom::new(11)),
        Duration::from_millis(config.upstream.timeout_ms),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let (config_tx, config_updates) = mpsc::unbounded_channel();
    let server = HttpServer::from_parts(config, gateway.clone(), upstream);
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, config_updates, server_shutdown).await;
    });

    TestServer {
        addr,
        gateway,
        clock,
        shutdown,
        config_tx,
    }
}

/// HTTP client that does not reuse connections between tests.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
