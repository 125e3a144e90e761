use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Export error: {0}")]
    Export(#[from] csv::Error),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Insufficient permissions")]
    InsufficientPermission,
    #[error("Access denied")]
    AccessDenied,
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Duplicate entry: {0}")]
    DuplicateKey(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Internal server error: {0}")]
    Internal(String),
}

// 2067 / 1555 = SQLite unique / primary key constraint, 23505 = PostgreSQL unique violation
const UNIQUE_VIOLATION_CODES: [&str; 3] = ["2067", "1555", "23505"];

impl AppError {
    /// Maps a store error, turning unique-constraint violations into `DuplicateKey`.
    pub fn from_store(err: sqlx::Error, what: &str) -> Self {
        if let Some(db_err) = err.as_database_error()
            && let Some(code) = db_err.code()
            && UNIQUE_VIOLATION_CODES.iter().any(|c| code == *c)
        {
            return AppError::DuplicateKey(format!("{what} already exists"));
        }
        AppError::Database(err)
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::DuplicateKey(_) | AppError::Conflict(_) => StatusCode::BAD_REQUEST,
            AppError::InsufficientPermission | AppError::AccessDenied => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Database(_) | AppError::Export(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            AppError::Database(e) => {
                error!("Database error: {:?}", e);
                "Internal server error".to_string()
            }
            AppError::Export(e) => {
                error!("Export error: {:?}", e);
                "Internal server error".to_string()
            }
            AppError::Internal(msg) => {
                error!("Internal error: {}", msg);
                "Internal server error".to_string()
            }
            AppError::Validation(msg) | AppError::NotFound(msg) => msg.clone(),
            AppError::DuplicateKey(msg) | AppError::Conflict(msg) => msg.clone(),
            AppError::InsufficientPermission => "Insufficient permissions".to_string(),
            AppError::AccessDenied => "Access denied".to_string(),
            AppError::Unauthorized => "Unauthorized".to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
