//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, timeout, request ID)
//! - Route chat requests through the gateway
//! - Apply reloaded target weights while serving
//! - Observability (metrics from every outcome)

use axum::{
    extract::State,
    http::{HeaderName, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::admin;
use crate::config::SimulatorConfig;
use crate::error::GatewayError;
use crate::gateway::Gateway;
use crate::lifecycle::ShutdownSignal;
use crate::http::response::outcome_response;
use crate::observability::metrics;
use crate::simulation::SimulatedUpstream;
use crate::sources::ThreadRandom;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Application state injected into handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub gateway: Arc<Gateway>,
    pub upstream: SimulatedUpstream,
    pub admin_api_key: Arc<str>,
}

/// HTTP server for the gateway simulator.
pub struct HttpServer {
    router: Router,
    config: SimulatorConfig,
    gateway: Arc<Gateway>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: SimulatorConfig) -> Result<Self, GatewayError> {
        let gateway = Arc::new(Gateway::from_config(&config)?);
        let upstream = SimulatedUpstream::new(
            Arc::new(ThreadRandom),
            Duration::from_millis(config.upstream.timeout_ms),
        );
        Ok(Self::from_parts(config, gateway, upstream))
    }

    /// Create a server around an existing gateway and upstream.
    pub fn from_parts(
        config: SimulatorConfig,
        gateway: Arc<Gateway>,
        upstream: SimulatedUpstream,
    ) -> Self {
        let state = AppState {
            gateway: gateway.clone(),
            upstream,
            admin_api_key: Arc::from(config.admin.api_key.as_str()),
        };

        let router = Self::build_router(&config, state);
        Self {
            router,
            config,
            gateway,
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &SimulatorConfig, state: AppState) -> Router {
        let mut router = Router::new()
            .route("/chat/completions", post(chat_completions))
            .route("/health", get(health));

        if config.admin.enabled {
            router = router.merge(admin::router(state.clone()));
        }

        let request_id = HeaderName::from_static(X_REQUEST_ID);
        router.with_state(state).layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::new(request_id))
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    Duration::from_secs(config.listener.request_timeout_secs),
                )),
        )
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Configs arriving on `config_updates` have their target weights applied
    /// to the running gateway. Returns once `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<SimulatorConfig>,
        mut shutdown: ShutdownSignal,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            admin = self.config.admin.enabled,
            "HTTP server starting"
        );

        let gateway = self.gateway.clone();
        let reload = tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                let applied = gateway.reload_weights(&config);
                tracing::info!(applied, "Applied reloaded target weights");
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move { shutdown.recv().await })
            .await?;

        reload.abort();
        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    pub fn gateway(&self) -> &Arc<Gateway> {
        &self.gateway
    }
}

/// Route one chat request through the gateway.
async fn chat_completions(State(state): State<AppState>) -> Response {
    let upstream = &state.upstream;
    let outcome = state.gateway.route(|target| upstream.call(target)).await;

    metrics::record_outcome(&outcome);
    outcome_response(&outcome)
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}
