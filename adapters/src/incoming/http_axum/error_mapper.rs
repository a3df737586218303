use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{debug, error, warn};

use postflow_application::error::AppError;

pub struct HttpError(pub AppError);

impl HttpError {
    fn status_and_message(&self) -> (StatusCode, String) {
        let app_error = &self.0;

        match app_error {
            AppError::Domain(_)
            | AppError::ValidationError { .. }
            | AppError::NotFound { .. }
            | AppError::NoCreditsRecord { .. }
            | AppError::InsufficientCredits { .. }
            | AppError::UnknownProduct { .. }
            | AppError::UnknownPrice { .. } => (StatusCode::BAD_REQUEST, app_error.to_string()),

            AppError::UpstreamError { .. } => (
                StatusCode::BAD_REQUEST,
                "Unable to generate video".to_string(),
            ),

            AppError::JsonError(_) => (StatusCode::BAD_REQUEST, "Invalid JSON format".to_string()),

            AppError::Conflict { .. } => (StatusCode::CONFLICT, "Resource already exists".to_string()),

            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),

            AppError::LedgerUpdateFailed { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to update credits".to_string(),
            ),

            AppError::AssetRecordFailed { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to record video".to_string(),
            ),

            AppError::DatabaseError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Database error".to_string(),
            ),

            AppError::ConfigError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Configuration error".to_string(),
            ),

            AppError::ExternalServiceError { .. } => (
                StatusCode::BAD_GATEWAY,
                "External service error".to_string(),
            ),

            AppError::ServiceUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Service unavailable".to_string(),
            ),

            AppError::IoError(_) | AppError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status_code, message) = self.status_and_message();

        if status_code.is_server_error() {
            error!("Server error response generated: {}", self.0);
        } else if matches!(self.0, AppError::UpstreamError { .. }) {
            warn!("Generation failed: {}", self.0);
        } else {
            debug!("Client error response generated: {}", self.0);
        }

        let error_response = json!({
            "ok": false,
            "error": message,
            "status": status_code.as_u16()
        });

        (status_code, Json(error_response)).into_response()
    }
}

impl From<AppError> for HttpError {
    fn from(app_error: AppError) -> Self {
        HttpError(app_error)
    }
}
