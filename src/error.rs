use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;

/// Closed error taxonomy for the catalog service. Every variant is recovered
/// at the request boundary and rendered as an HTTP status plus JSON body.
#[derive(Debug, ThisError)]
pub enum CatalogError {
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0} already exists")]
    AlreadyExists(String),

    #[error("wrong credentials")]
    WrongCredentials,

    #[error("password confirmation does not match")]
    PasswordMismatch,

    #[error("cannot delete {0}: still in use")]
    CannotDelete(String),

    #[error("missing access token")]
    MissingAccessToken,

    #[error("invalid or expired token")]
    InvalidToken,

    #[error("forbidden")]
    Forbidden,

    #[error("excel error: {0}")]
    Excel(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("database error: {0}")]
    Database(#[from] SqlxError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl CatalogError {
    /// A uniqueness violation on insert/update is the backstop for the
    /// code-generation race; surface it as a conflict instead of a 500.
    fn is_unique_violation(&self) -> bool {
        matches!(self, CatalogError::Database(SqlxError::Database(db)) if db.is_unique_violation())
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> axum::response::Response {
        if self.is_unique_violation() {
            let body = ApiErrorBody {
                code: "ALREADY_EXISTS".to_string(),
                message: "A row with this code or name already exists.".to_string(),
            };
            return (StatusCode::CONFLICT, Json(ApiErrorResponse { error: body }))
                .into_response();
        }

        let (status, code) = match &self {
            CatalogError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_INPUT"),
            CatalogError::PasswordMismatch => {
                (StatusCode::UNPROCESSABLE_ENTITY, "PASSWORD_MISMATCH")
            }
            CatalogError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            CatalogError::AlreadyExists(_) => (StatusCode::CONFLICT, "ALREADY_EXISTS"),
            CatalogError::CannotDelete(_) => (StatusCode::CONFLICT, "CANNOT_DELETE"),
            CatalogError::WrongCredentials => (StatusCode::UNAUTHORIZED, "WRONG_CREDENTIALS"),
            CatalogError::MissingAccessToken => (StatusCode::BAD_REQUEST, "MISSING_ACCESS_TOKEN"),
            CatalogError::InvalidToken => (StatusCode::UNAUTHORIZED, "INVALID_TOKEN"),
            CatalogError::Forbidden => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            CatalogError::Excel(_) => (StatusCode::UNPROCESSABLE_ENTITY, "EXCEL_ERROR"),
            CatalogError::Json(_) => (StatusCode::BAD_REQUEST, "BAD_JSON"),
            CatalogError::Database(_) | CatalogError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        let message = match status {
            // Do not leak database/internal details to clients.
            StatusCode::INTERNAL_SERVER_ERROR => {
                "An internal server error occurred.".to_string()
            }
            _ => self.to_string(),
        };

        let body = ApiErrorBody {
            code: code.to_string(),
            message,
        };
        (status, Json(ApiErrorResponse { error: body })).into_response()
    }
}

/// Standardized API error response body
#[derive(Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}
