//! LeadFlow Server
//!
//! HTTP surface for the lead pipeline: inbound webhooks, the activation
//! and prospecting triggers, and the per-company dashboard reads.

pub mod http;
pub mod metrics;
pub mod state;

pub use http::create_router;
pub use metrics::{init_metrics, record_activation, record_dispatch, record_lead_ingested};
pub use state::AppState;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use leadflow_core::Error;

/// Wraps a core error for use as an axum response
///
/// Handlers return `Result<_, ApiError>` and propagate core errors
/// with `?`; the body is always `{"error": "..."}`.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match &self.0 {
            Error::Validation { .. } => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            // The dashboard treats an exhausted quota as a user-facing
            // rejection, not a conflict.
            Error::QuotaExceeded { .. } => StatusCode::BAD_REQUEST,
            Error::Conflict(_) => StatusCode::CONFLICT,
            Error::UpstreamDelivery(_) => StatusCode::BAD_GATEWAY,
            Error::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }
        let body = match &self.0 {
            Error::QuotaExceeded { remaining } => serde_json::json!({
                "error": self.0.to_string(),
                "remaining": remaining,
            }),
            _ => serde_json::json!({ "error": self.0.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}
