/// HTTP handlers for ping-service
use std::sync::atomic::Ordering;

use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use crate::error::{AppError, Result};
use crate::session::Session;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Mock credential rule: any username containing "test" with password "123456".
pub fn credentials_valid(username: &str, password: &str) -> bool {
    username.contains("test") && password == "123456"
}

pub async fn login(
    state: web::Data<AppState>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    let req = req.into_inner();
    if req.username.trim().is_empty() || req.password.is_empty() {
        return Err(AppError::BadRequest(
            "Username and password are required".to_string(),
        ));
    }
    if !credentials_valid(&req.username, &req.password) {
        warn!(username = %req.username, "login rejected");
        return Err(AppError::InvalidCredentials);
    }

    let session_config = &state.config.session;
    let session_id = state
        .stores
        .sessions
        .create_session(&req.username, session_config.ttl)
        .await?;

    let cookie = Cookie::build(session_config.cookie_name.clone(), session_id)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::seconds(session_config.ttl.as_secs() as i64))
        .finish();

    info!(username = %req.username, "session created");
    Ok(HttpResponse::Ok()
        .cookie(cookie)
        .json(json!({ "message": "Login successful" })))
}

pub async fn logout(state: web::Data<AppState>, req: HttpRequest) -> Result<HttpResponse> {
    let cookie_name = &state.config.session.cookie_name;
    if let Some(cookie) = req.cookie(cookie_name) {
        state.stores.sessions.delete_session(cookie.value()).await?;
    }

    let mut removal = Cookie::new(cookie_name.clone(), "");
    removal.set_path("/");
    removal.make_removal();

    Ok(HttpResponse::Ok()
        .cookie(removal)
        .json(json!({ "message": "Logged out" })))
}

/// Rate-limited, then serialized behind the process-wide ping lock.
pub async fn ping(state: web::Data<AppState>, session: Session) -> Result<HttpResponse> {
    let limits = state.config.rate_limit;
    let admitted = state
        .stores
        .pings
        .try_acquire(&session.username, limits.max_requests, limits.window)
        .await?;
    if !admitted {
        info!(username = %session.username, "ping rate limited");
        return Err(AppError::TooManyRequests);
    }

    let _guard = state.ping_lock.lock().await;
    let total = state.ping_count.fetch_add(1, Ordering::SeqCst) + 1;
    state.stores.pings.record_ping(&session.username).await?;
    if !state.config.ping_delay.is_zero() {
        tokio::time::sleep(state.config.ping_delay).await;
    }

    info!(username = %session.username, ping_count = total, "pong");
    Ok(HttpResponse::Ok().json(json!({ "message": "pong" })))
}

pub async fn count(state: web::Data<AppState>, _session: Session) -> Result<HttpResponse> {
    let unique_users = state.stores.pings.unique_users().await?;
    Ok(HttpResponse::Ok().json(json!({
        "ping_count": state.ping_count.load(Ordering::SeqCst),
        "unique_users": unique_users,
    })))
}

pub async fn top(state: web::Data<AppState>, _session: Session) -> Result<HttpResponse> {
    let top = state.stores.pings.top_users(state.config.top_users).await?;
    Ok(HttpResponse::Ok().json(top))
}

pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}
