/// HTTP handlers and the JSON envelope they share
pub mod auth;
pub mod comments;
pub mod health;
pub mod posts;
pub mod users;

use actix_web::{http::StatusCode, HttpResponse};
use serde::Serialize;
use serde_json::json;

use crate::error::{AppError, Result};

/// `{"status": "success", "data": ...}`
pub(crate) fn success<T: Serialize>(status: StatusCode, data: T) -> HttpResponse {
    HttpResponse::build(status).json(json!({
        "status": "success",
        "data": data,
    }))
}

/// `{"status": "success", "message": ...}` for actions with no payload
pub(crate) fn success_message(message: &str) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "success",
        "message": message,
    }))
}

pub(crate) fn require_non_blank(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    Ok(())
}
