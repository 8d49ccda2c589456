use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

pub type ServerResult<T> = Result<T, ServerError>;

/// Server error types
///
/// None of these ever reach Telegram: the webhook handler acknowledges every
/// update regardless of what went wrong. `NotFound` and `MetricsUnavailable`
/// answer the operational endpoints; the rest stop startup.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Probe error: {0}")]
    Probe(#[from] qrbot::ProbeError),

    #[error("Delivery error: {0}")]
    Delivery(#[from] qrbot::DeliveryError),

    #[error("Metrics unavailable")]
    MetricsUnavailable,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found")]
    NotFound,
}

impl ServerError {
    /// Get HTTP status code for this error
    fn status_code(&self) -> StatusCode {
        match self {
            ServerError::NotFound | ServerError::MetricsUnavailable => StatusCode::NOT_FOUND,
            ServerError::Probe(_) | ServerError::Delivery(_) | ServerError::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get error code string
    fn error_code(&self) -> &'static str {
        match self {
            ServerError::Probe(_) | ServerError::Delivery(_) => "STARTUP_ERROR",
            ServerError::MetricsUnavailable => "METRICS_DISABLED",
            ServerError::Config(_) => "CONFIG_ERROR",
            ServerError::NotFound => "NOT_FOUND",
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}

impl From<std::net::AddrParseError> for ServerError {
    fn from(err: std::net::AddrParseError) -> Self {
        ServerError::Config(format!("Invalid address: {err}"))
    }
}
