//! Application startup and lifecycle management.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use iam_core::{HttpIdentityStore, IdentityStore, MemoryIdentityStore};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

use crate::config::EnrollmentConfig;
use crate::handlers;
use crate::services::ServiceError;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: EnrollmentConfig,
    pub store: Arc<dyn IdentityStore>,
}

/// Health check endpoint for liveness probes.
async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "service": "enrollment-service",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// Readiness check endpoint; probes the identity store.
async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.health_check().await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/v1/enrollments", post(handlers::create_user_event))
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application, selecting the identity store from
    /// configuration: HTTP-backed when an endpoint is set, in-memory
    /// otherwise.
    pub async fn build(config: EnrollmentConfig) -> Result<Self, ServiceError> {
        let store: Arc<dyn IdentityStore> = match &config.iam.endpoint {
            Some(endpoint) => {
                let store = HttpIdentityStore::connect(endpoint).map_err(|e| {
                    tracing::error!(error = %e, "Failed to build identity-service client");
                    ServiceError::Config(anyhow::anyhow!(
                        "Failed to build identity-service client: {}",
                        e
                    ))
                })?;
                tracing::info!(endpoint = %endpoint, "HTTP identity store initialized");
                Arc::new(store)
            }
            None => {
                tracing::info!("IAM endpoint not configured, using in-memory identity store");
                Arc::new(MemoryIdentityStore::new())
            }
        };

        Self::build_with_store(config, store).await
    }

    /// Build against an explicit identity store (tests seed their own).
    pub async fn build_with_store(
        config: EnrollmentConfig,
        store: Arc<dyn IdentityStore>,
    ) -> Result<Self, ServiceError> {
        let state = AppState {
            config: config.clone(),
            store,
        };

        // Port 0 = random port for testing.
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind listener to {}: {}", addr, e);
            ServiceError::Startup(e)
        })?;
        let port = listener.local_addr().map_err(ServiceError::Startup)?.port();

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let router = build_router(self.state);

        tracing::info!(port = self.port, "Enrollment service listening");

        axum::serve(self.listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}
