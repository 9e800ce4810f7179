use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Service not found")]
    ServiceNotFound,

    #[error("Time slot is already booked.")]
    SlotAlreadyBooked,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Error {op}")]
    Database {
        op: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Error sending confirmation email")]
    Notification(anyhow::Error),

    #[error("Internal server error")]
    Internal(String),
}

impl AppError {
    /// Wraps a store error with the operation that was running.
    pub fn db(op: &'static str) -> impl FnOnce(rusqlite::Error) -> AppError {
        move |source| AppError::Database { op, source }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::ServiceNotFound => StatusCode::BAD_REQUEST,
            AppError::SlotAlreadyBooked => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::Database { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Notification(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        match &self {
            AppError::Database { op, source } => {
                tracing::error!(error = %source, "error {op}");
            }
            AppError::Notification(e) => {
                tracing::error!(error = %e, "failed to send confirmation email");
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "internal error");
            }
            _ => {}
        }

        let body = serde_json::json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}
