//! ERP package calculator server
//!
//! Exposes the estimation engine, preset and template operations, preset
//! override storage and document export over HTTP.

pub mod http;
pub mod metrics;
pub mod state;

pub use http::create_router;
pub use metrics::{init_metrics, metrics_handler, record_error, record_estimate};
pub use state::AppState;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Server errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Disabled: {0}")]
    Disabled(String),

    #[error("Persistence error: {0}")]
    Persistence(#[from] erp_calc_persistence::PersistenceError),

    #[error("Export error: {0}")]
    Export(#[from] erp_calc_export::ExportError),

    #[error("Configuration error: {0}")]
    Config(#[from] erp_calc_config::ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServerError {
    /// Short label used for the error counter
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "invalid_request",
            Self::NotFound(_) => "not_found",
            Self::Disabled(_) => "disabled",
            Self::Persistence(_) => "persistence",
            Self::Export(_) => "export",
            Self::Config(_) => "config",
            Self::Internal(_) => "internal",
        }
    }
}

impl From<erp_calc_core::Error> for ServerError {
    fn from(err: erp_calc_core::Error) -> Self {
        use erp_calc_core::Error;
        match err {
            Error::UnknownKey(_)
            | Error::UnknownTemplate(_)
            | Error::UnknownAddonTier(_)
            | Error::UnknownTier(_) => Self::NotFound(err.to_string()),
            Error::Serialization(e) => Self::InvalidRequest(e.to_string()),
        }
    }
}

impl From<&ServerError> for StatusCode {
    fn from(err: &ServerError) -> Self {
        match err {
            ServerError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::Disabled(_) => StatusCode::FORBIDDEN,
            ServerError::Persistence(_) => StatusCode::SERVICE_UNAVAILABLE,
            ServerError::Export(erp_calc_export::ExportError::UnknownFormat(_)) => {
                StatusCode::BAD_REQUEST
            }
            ServerError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServerError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = StatusCode::from(&self);
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }
        record_error(self.kind());

        (
            status,
            Json(serde_json::json!({
                "error": self.kind(),
                "message": self.to_string(),
            })),
        )
            .into_response()
    }
}
