/// Profile, profile image and follow graph endpoints
use actix_multipart::Multipart;
use actix_web::http::header::{ContentDisposition, CONTENT_DISPOSITION};
use actix_web::{http::StatusCode, web, HttpResponse};
use futures_util::StreamExt;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use super::{success, success_message};
use crate::error::{AppError, Result};
use crate::middleware::UserId;
use crate::models::{PageQuery, UserChanges};
use crate::services::uploads::too_large;
use crate::services::{ImageStore, UserService};

/// Multipart field carrying the image
pub const PROFILE_IMAGE_FIELD: &str = "profile_image";

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 3, max = 50, message = "username must be 3-50 characters"))]
    pub username: Option<String>,
    #[validate(email(message = "email must be a valid address"))]
    pub email: Option<String>,
    #[validate(range(min = 0, max = 150, message = "age must be between 0 and 150"))]
    pub age: Option<i32>,
}

pub async fn get_me(users: web::Data<UserService>, user_id: UserId) -> Result<HttpResponse> {
    let user = users.current_user(user_id.0).await?;
    Ok(success(StatusCode::OK, json!({ "user": user })))
}

pub async fn update_profile(
    users: web::Data<UserService>,
    user_id: UserId,
    req: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse> {
    let mut req = req.into_inner();
    req.username = req.username.map(|u| u.trim().to_string());
    req.email = req.email.map(|e| e.trim().to_string());
    req.validate()?;

    let user = users
        .update_profile(
            user_id.0,
            UserChanges {
                username: req.username,
                email: req.email,
                age: req.age,
            },
        )
        .await?;

    Ok(success(StatusCode::OK, json!({ "user": user })))
}

pub async fn upload_profile_image(
    users: web::Data<UserService>,
    images: web::Data<ImageStore>,
    user_id: UserId,
    mut payload: Multipart,
) -> Result<HttpResponse> {
    let max_bytes = images.max_bytes();
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?;

        let disposition = field
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|v| ContentDisposition::from_raw(v).ok());
        let is_image_field = disposition
            .as_ref()
            .and_then(|cd| cd.get_name())
            .is_some_and(|name| name == PROFILE_IMAGE_FIELD);
        let filename = disposition
            .as_ref()
            .and_then(|cd| cd.get_filename())
            .unwrap_or_default()
            .to_string();

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk
                .map_err(|e| AppError::BadRequest(format!("Error reading upload: {}", e)))?;
            if bytes.len() + chunk.len() > max_bytes {
                return Err(too_large(max_bytes));
            }
            bytes.extend_from_slice(&chunk);
        }

        if is_image_field && upload.is_none() {
            upload = Some((filename, bytes));
        }
    }

    let (filename, bytes) = upload.ok_or_else(|| {
        AppError::BadRequest(format!("Missing '{}' file field", PROFILE_IMAGE_FIELD))
    })?;

    let path = images.save(user_id.0, &filename, &bytes).await?;
    let user = users.set_profile_image(user_id.0, &path).await?;

    Ok(success(StatusCode::OK, json!({ "user": user })))
}

pub async fn follow_user(
    users: web::Data<UserService>,
    user_id: UserId,
    target: web::Path<Uuid>,
) -> Result<HttpResponse> {
    users.follow(user_id.0, target.into_inner()).await?;
    Ok(success_message("Successfully followed the user"))
}

pub async fn unfollow_user(
    users: web::Data<UserService>,
    user_id: UserId,
    target: web::Path<Uuid>,
) -> Result<HttpResponse> {
    users.unfollow(user_id.0, target.into_inner()).await?;
    Ok(success_message("Successfully unfollowed the user"))
}

pub async fn get_followers(
    users: web::Data<UserService>,
    target: web::Path<Uuid>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let page = users
        .followers(target.into_inner(), query.into_inner().into())
        .await?;
    Ok(success(StatusCode::OK, page))
}

pub async fn get_following(
    users: web::Data<UserService>,
    target: web::Path<Uuid>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let page = users
        .following(target.into_inner(), query.into_inner().into())
        .await?;
    Ok(success(StatusCode::OK, page))
}
