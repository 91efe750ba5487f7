//! Traffic generator against a live gateway.

use std::time::Duration;

use gateway_sim::config::TrafficConfig;
use gateway_sim::simulation::TrafficGenerator;
use gateway_sim::Shutdown;

mod common;

use common::{config, start_server, target};

#[tokio::test]
async fn test_clients_reach_gateway_until_shutdown() {
    let server = start_server(config(10_000.0, None, vec![target("a", 1, 0.0)])).await;

    let traffic = TrafficConfig {
        enabled: true,
        clients: 4,
        base_delay_ms: 10,
        per_client_delay_ms: 5,
        request_timeout_secs: 2,
    };
    let generator = TrafficGenerator::new(&server.url(""), traffic).unwrap();

    let shutdown = Shutdown::new();
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(300)).await;
        trigger.trigger();
    });

    let report = tokio::time::timeout(Duration::from_secs(10), generator.run(&shutdown))
        .await
        .expect("traffic generator did not stop");

    assert!(report.sent >= 4, "sent = {}", report.sent);
    assert_eq!(report.errors, 0);
}
