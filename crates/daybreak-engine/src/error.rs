//! Error types for the manual-trigger HTTP layer.
//!
//! [`TriggerError`] unifies the trigger's failure modes into a single
//! enum that converts into an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use daybreak_core::TickError;

/// Errors that can occur while serving a tick trigger request.
#[derive(Debug, thiserror::Error)]
pub enum TriggerError {
    /// The tick pipeline itself failed or refused to run.
    #[error("tick error: {0}")]
    Tick(#[from] TickError),
}

impl IntoResponse for TriggerError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Tick(TickError::AlreadyRunning) => {
                (StatusCode::CONFLICT, TickError::AlreadyRunning.to_string())
            }
            Self::Tick(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        };

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlapping_runs_map_to_conflict() {
        let response = TriggerError::Tick(TickError::AlreadyRunning).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
