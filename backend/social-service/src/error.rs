/// Error types for the movie social service
///
/// Every error leaves the service as `{"error": "...", "status": N}`.
/// Collaborator failures are logged here and reported without detail.
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

/// The users table keeps one account per email
pub const EMAIL_TAKEN: &str = "Email is already in use";

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0}")]
    NotFound(String),

    #[error("Poll has ended")]
    PollEnded,

    #[error("Invalid option index")]
    InvalidOptionIndex,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("{0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Message safe to show to API clients
    fn public_message(&self) -> String {
        match self {
            ServiceError::Database(_) | ServiceError::Internal(_) => {
                "Internal server error".to_string()
            }
            ServiceError::Upstream(_) => "Upstream service error".to_string(),
            other => other.to_string(),
        }
    }
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::InvalidInput(_)
            | ServiceError::PollEnded
            | ServiceError::InvalidOptionIndex => StatusCode::BAD_REQUEST,
            ServiceError::Unauthorized => StatusCode::UNAUTHORIZED,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ServiceError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ServiceError::Database(_) | ServiceError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, status = status.as_u16(), "Request failed");
        }

        HttpResponse::build(status).json(serde_json::json!({
            "error": self.public_message(),
            "status": status.as_u16(),
        }))
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        ServiceError::Upstream(err.to_string())
    }
}

/// Result type alias for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;
