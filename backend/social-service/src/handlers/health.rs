use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::db::Repositories;

pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

/// 200 when the backing store answers, 503 otherwise.
pub async fn readiness(repos: web::Data<Repositories>) -> HttpResponse {
    match repos.health.ping().await {
        Ok(()) => HttpResponse::Ok().json(json!({ "status": "ready" })),
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            HttpResponse::ServiceUnavailable().json(json!({ "status": "unavailable" }))
        }
    }
}
