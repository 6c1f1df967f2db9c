//! REST API server for meeting notes.
//!
//! Provides HTTP endpoints for:
//! - Recording transcription
//! - Full meeting notes (transcription + analysis)
//! - Service and version info

pub mod error;
pub mod routes;

use crate::config::ServerConfig;
use crate::meeting::MeetingNotesService;
use anyhow::{Context, Result};
use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::{Json, Response},
    routing::get,
    Router,
};
use serde_json::{json, Value};
use std::time::Instant;
use tower::ServiceBuilder;
use tracing::info;

/// Shared handler state. Cloning is cheap; providers sit behind `Arc`s.
#[derive(Clone)]
pub struct AppState {
    pub notes: MeetingNotesService,
}

pub struct ApiServer {
    host: String,
    port: u16,
    state: AppState,
}

impl ApiServer {
    pub fn new(config: &ServerConfig, notes: MeetingNotesService) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
            state: AppState { notes },
        }
    }

    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/", get(status))
            .route("/version", get(version))
            .with_state(state.clone())
            .merge(routes::transcribe::router(state))
            .layer(ServiceBuilder::new().layer(middleware::from_fn(log_request)))
    }

    pub async fn start(self) -> Result<()> {
        let address = format!("{}:{}", self.host, self.port);
        let app = Self::router(self.state);

        let listener = tokio::net::TcpListener::bind(&address)
            .await
            .with_context(|| format!("Failed to bind {}", address))?;

        info!("API server listening on http://{}", address);
        info!("Endpoints:");
        info!("  GET  /                  - Service info");
        info!("  GET  /version           - Get version info");
        info!("  POST /api/transcribe    - Transcribe an uploaded recording");
        info!("  POST /api/meeting-notes - Transcribe and analyze a recording");

        axum::serve(listener, app).await?;

        Ok(())
    }
}

/// One info line per request: method, path, status and latency.
async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    info!(
        "{} {} -> {} ({}ms)",
        method,
        path,
        response.status().as_u16(),
        started.elapsed().as_millis()
    );
    response
}

async fn status(State(state): State<AppState>) -> Json<Value> {
    let policy = state.notes.workflow().policy();
    Json(json!({
        "service": "meeting-notes",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "transcription_provider": state.notes.workflow().provider_name(),
        "poll_interval_secs": policy.interval.as_secs(),
    }))
}

async fn version() -> Json<Value> {
    Json(json!({
        "version": env!("CARGO_PKG_VERSION"),
        "name": "meeting-notes"
    }))
}
