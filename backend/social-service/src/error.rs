/// Error types for Social Service
///
/// Every handler returns `Result<HttpResponse>`; errors render as the
/// `{"status": "fail" | "error", "message": ...}` envelope.
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use thiserror::Error;

use crate::db::RepoError;

/// Result type for social-service operations
pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Message returned to clients; server-side detail stays in the logs.
    fn public_message(&self) -> String {
        match self {
            AppError::Database(_) | AppError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let label = if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            "error"
        } else {
            "fail"
        };

        HttpResponse::build(status).json(json!({
            "status": label,
            "message": self.public_message(),
        }))
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::UniqueViolation(constraint) => {
                AppError::Conflict(conflict_message(&constraint).to_string())
            }
            RepoError::ForeignKeyViolation(_) => {
                AppError::NotFound("Referenced resource not found".to_string())
            }
            RepoError::CheckViolation(constraint) => {
                AppError::BadRequest(check_message(&constraint).to_string())
            }
            RepoError::Database(e) => AppError::Database(e.to_string()),
        }
    }
}

fn check_message(constraint: &str) -> &'static str {
    match constraint {
        "user_followers_no_self_follow" => "You cannot follow yourself",
        "users_age_range" => "age must be between 0 and 150",
        _ => "Invalid value",
    }
}

fn conflict_message(constraint: &str) -> &'static str {
    match constraint {
        "users_username_key" => "Username already taken",
        "users_email_key" => "Email already registered",
        "posts_title_key" => "Post with that title already exists",
        "likes_post_user_key" => "Post already liked",
        _ => "Resource already exists",
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::BadRequest("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Validation("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Unauthorized("x".into()).status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::NotFound("x".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Conflict("x".into()).status_code(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::PayloadTooLarge("x".into()).status_code(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            AppError::Database("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_unique_violation_maps_to_conflict() {
        let err: AppError = RepoError::UniqueViolation("users_email_key".into()).into();
        assert!(matches!(&err, AppError::Conflict(msg) if msg == "Email already registered"));
    }

    #[test]
    fn test_check_violation_maps_to_bad_request() {
        let err: AppError = RepoError::CheckViolation("user_followers_no_self_follow".into()).into();
        assert!(matches!(&err, AppError::BadRequest(msg) if msg == "You cannot follow yourself"));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_client_error_envelope() {
        let resp = AppError::NotFound("Post not found".into()).error_response();
        let body = to_bytes(resp.into_body()).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["status"], "fail");
        assert_eq!(value["message"], "Post not found");
    }

    #[actix_web::test]
    async fn test_server_error_hides_detail() {
        let resp = AppError::Database("connection refused on 10.0.0.3".into()).error_response();
        let body = to_bytes(resp.into_body()).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["status"], "error");
        assert_eq!(value["message"], "Internal server error");
    }
}
