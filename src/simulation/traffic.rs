//! Synthetic client traffic.
//!
//! Each client posts the same chat request in a loop, pausing
//! `base_delay + index * per_client_delay` between requests, until shutdown.

use std::time::Duration;

use serde_json::json;
use tokio::task::JoinSet;

use crate::config::TrafficConfig;
use crate::lifecycle::{Shutdown, ShutdownSignal};
use crate::observability::metrics;

/// Totals collected from all clients once they stop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrafficReport {
    /// Requests that got an HTTP response, whatever the status.
    pub sent: u64,
    /// Requests that failed at the transport level.
    pub errors: u64,
}

impl TrafficReport {
    fn merge(&mut self, other: TrafficReport) {
        self.sent += other.sent;
        self.errors += other.errors;
    }
}

/// Drives a pool of HTTP clients against the gateway.
#[derive(Debug, Clone)]
pub struct TrafficGenerator {
    url: String,
    config: TrafficConfig,
    client: reqwest::Client,
}

impl TrafficGenerator {
    /// `base_url` is the gateway root, e.g. `http://127.0.0.1:8080`.
    pub fn new(base_url: &str, config: TrafficConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            url: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            config,
            client,
        })
    }

    /// Pause between requests for client `index`.
    pub fn client_delay(&self, index: usize) -> Duration {
        let per_client = self.config.per_client_delay_ms.saturating_mul(index as u64);
        Duration::from_millis(self.config.base_delay_ms.saturating_add(per_client))
    }

    /// Run every client until `shutdown` fires, then report totals.
    pub async fn run(self, shutdown: &Shutdown) -> TrafficReport {
        let clients = self.config.clients;
        tracing::info!(clients, url = %self.url, "Starting traffic generator");

        let mut tasks = JoinSet::new();
        for index in 0..clients {
            let generator = self.clone();
            let stop = shutdown.subscribe();
            tasks.spawn(async move { generator.client_loop(index, stop).await });
        }
        metrics::set_active_clients(clients);

        let mut report = TrafficReport::default();
        while let Some(result) = tasks.join_next().await {
            match result {
                Ok(client_report) => report.merge(client_report),
                Err(e) => tracing::error!(error = %e, "Traffic client task failed"),
            }
        }
        metrics::set_active_clients(0);

        tracing::info!(sent = report.sent, errors = report.errors, "Traffic generator stopped");
        report
    }

    async fn client_loop(&self, index: usize, mut stop: ShutdownSignal) -> TrafficReport {
        let body = json!({
            "model": "gpt-3.5-turbo",
            "messages": [{"role": "user", "content": "Hello"}],
        });
        let delay = self.client_delay(index);
        let mut report = TrafficReport::default();

        loop {
            let request = async {
                match self.client.post(&self.url).json(&body).send().await {
                    Ok(_) => report.sent += 1,
                    Err(e) => {
                        report.errors += 1;
                        tracing::debug!(client = index, error = %e, "Request failed");
                    }
                }
                tokio::time::sleep(delay).await;
            };

            tokio::select! {
                biased;
                _ = stop.recv() => break,
                _ = request => {}
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_delay_grows_with_index() {
        let generator = TrafficGenerator::new("http://127.0.0.1:1/", TrafficConfig::default()).unwrap();
        assert_eq!(generator.url, "http://127.0.0.1:1/chat/completions");
        assert_eq!(generator.client_delay(0), Duration::from_millis(100));
        assert_eq!(generator.client_delay(99), Duration::from_millis(1090));
    }

    #[tokio::test]
    async fn test_stops_on_shutdown_when_gateway_is_down() {
        let config = TrafficConfig {
            clients: 3,
            base_delay_ms: 5,
            per_client_delay_ms: 1,
            request_timeout_secs: 1,
            ..Default::default()
        };
        // Grab a free port and release it so every request is refused.
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let generator = TrafficGenerator::new(&format!("http://127.0.0.1:{port}"), config).unwrap();
        let shutdown = Shutdown::new();

        let trigger = shutdown.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            trigger.trigger();
        });

        let report = tokio::time::timeout(Duration::from_secs(5), generator.run(&shutdown))
            .await
            .unwrap();
        assert_eq!(report.sent, 0);
        assert!(report.errors > 0);
    }
}
