use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Unrecognized token in a status or skills filter. No SQL has run.
    #[error("{0}")]
    InvalidFilter(String),

    #[error("Database error: {0}")]
    QueryExecution(#[from] sqlx::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::InvalidFilter(msg) => {
                tracing::info!("Rejected search filter: {}", msg);
                (StatusCode::BAD_REQUEST, msg).into_response()
            }
            AppError::QueryExecution(err) => {
                tracing::error!("Database error: {:?}", err);
                let body = Json(json!({
                    "error": "Internal server error",
                    "details": err.to_string(),
                }));
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
