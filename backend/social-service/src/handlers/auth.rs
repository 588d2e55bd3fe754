/// Registration, sign-in and sign-out
use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use actix_web::{http::StatusCode, web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use super::{require_non_blank, success};
use crate::error::{AppError, Result};
use crate::middleware::TOKEN_COOKIE;
use crate::services::{AuthService, LoginIdentifier};

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 50, message = "username must be 3-50 characters"))]
    pub username: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
    pub password_confirm: String,
    #[validate(range(min = 0, max = 150, message = "age must be between 0 and 150"))]
    pub age: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: String,
}

pub async fn register(
    auth: web::Data<AuthService>,
    req: web::Json<RegisterRequest>,
) -> Result<HttpResponse> {
    let mut req = req.into_inner();
    req.username = req.username.trim().to_string();
    req.email = req.email.trim().to_string();
    req.validate()?;
    if req.password != req.password_confirm {
        return Err(AppError::Validation("Passwords do not match".to_string()));
    }

    let user = auth
        .register(&req.username, &req.email, &req.password, req.age)
        .await?;

    Ok(success(StatusCode::CREATED, json!({ "user": user })))
}

pub async fn login(
    auth: web::Data<AuthService>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    let req = req.into_inner();
    require_non_blank("password", &req.password)?;

    let identifier = match (req.email, req.username) {
        (Some(email), _) if !email.trim().is_empty() => LoginIdentifier::Email(email),
        (_, Some(username)) if !username.trim().is_empty() => LoginIdentifier::Username(username),
        _ => {
            return Err(AppError::Validation(
                "email or username is required".to_string(),
            ))
        }
    };

    let (token, user) = auth.login(identifier, &req.password).await?;

    let cookie = Cookie::build(TOKEN_COOKIE, token.clone())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::seconds(auth.token_ttl_secs()))
        .finish();

    Ok(HttpResponse::Ok().cookie(cookie).json(json!({
        "status": "success",
        "data": { "token": token, "user": user },
    })))
}

pub async fn logout() -> HttpResponse {
    let mut cookie = Cookie::new(TOKEN_COOKIE, "");
    cookie.set_path("/");
    cookie.make_removal();

    HttpResponse::Ok().cookie(cookie).json(json!({
        "status": "success",
        "message": "Logged out",
    }))
}
