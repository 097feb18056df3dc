//! The manual tick trigger HTTP server.
//!
//! The scheduler that fires the nightly tick lives outside this
//! process. It (or an operator) calls `POST /tick/run`, which resolves
//! one game day and returns the [`TickSummary`] as JSON. Overlapping
//! triggers are refused with `409 Conflict`.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{NaiveDate, Utc};
use daybreak_core::TickError;
use daybreak_types::TickSummary;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::TriggerConfig;
use crate::error::TriggerError;
use crate::state::AppState;

/// Errors that can occur when starting or running the trigger server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Failed to bind to the network address.
    #[error("bind error: {0}")]
    Bind(String),

    /// The server encountered a fatal error while serving.
    #[error("serve error: {0}")]
    Serve(String),
}

/// Query parameters for the `POST /tick/run` endpoint.
#[derive(Debug, serde::Deserialize)]
pub struct TickQuery {
    /// The game day to resolve. Defaults to today (UTC).
    pub day: Option<NaiveDate>,
}

/// Build the Axum router for the trigger server.
///
/// The router includes:
/// - `GET /` -- minimal HTML status page
/// - `POST /tick/run` -- run one tick, returns the summary as JSON
///
/// CORS is configured to allow any origin for development. In
/// production this should be restricted.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(|| async { Html(INDEX_PAGE) }))
        .route("/tick/run", post(trigger_tick))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the trigger HTTP server.
///
/// Binds to the configured address, builds the router, and serves
/// requests until the process is terminated.
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind or the server
/// encounters a fatal I/O error.
pub async fn start_server(config: &TriggerConfig, state: Arc<AppState>) -> Result<(), ServerError> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| ServerError::Bind(format!("invalid address: {e}")))?;

    let router = build_router(state);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::Bind(format!("bind failed on {addr}: {e}")))?;

    info!(%addr, "Trigger server listening");

    axum::serve(listener, router)
        .await
        .map_err(|e| ServerError::Serve(format!("serve error: {e}")))?;

    Ok(())
}

/// Minimal HTML status page naming the service and its one endpoint.
const INDEX_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Daybreak Engine</title>
</head>
<body>
    <h1>Daybreak Engine</h1>
    <p>Status: RUNNING</p>
    <p><code>POST /tick/run?day=YYYY-MM-DD</code> resolves one game day
    and returns the tick summary. The day defaults to today (UTC).</p>
</body>
</html>"#;

/// Run one tick for the requested day.
///
/// Holds the re-entrancy guard for the duration of the run; a second
/// trigger arriving while a tick is in flight gets `409 Conflict`.
async fn trigger_tick(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TickQuery>,
) -> Result<Json<TickSummary>, TriggerError> {
    let Ok(_guard) = state.tick_guard.try_lock() else {
        return Err(TriggerError::Tick(TickError::AlreadyRunning));
    };

    let day = query.day.unwrap_or_else(|| Utc::now().date_naive());
    info!(%day, "Manual tick trigger received");

    let summary =
        daybreak_core::run_tick(state.pool.pool(), &state.publisher, &state.tick, day).await?;

    Ok(Json(summary))
}
