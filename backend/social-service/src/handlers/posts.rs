/// Post endpoints
use actix_web::{http::StatusCode, web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use super::{require_non_blank, success};
use crate::error::Result;
use crate::middleware::UserId;
use crate::models::{PageQuery, PostChanges};
use crate::services::PostService;

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(max = 255, message = "title must be at most 255 characters"))]
    pub title: String,
    pub content: String,
    pub image: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePostRequest {
    #[validate(length(min = 1, max = 255, message = "title must be 1-255 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "content cannot be empty"))]
    pub content: Option<String>,
    pub image: Option<String>,
}

pub async fn create_post(
    posts: web::Data<PostService>,
    user_id: UserId,
    req: web::Json<CreatePostRequest>,
) -> Result<HttpResponse> {
    let req = req.into_inner();
    req.validate()?;
    require_non_blank("title", &req.title)?;
    require_non_blank("content", &req.content)?;

    let post = posts
        .create_post(user_id.0, &req.title, &req.content, req.image)
        .await?;

    Ok(success(StatusCode::CREATED, json!({ "post": post })))
}

pub async fn list_posts(
    posts: web::Data<PostService>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let posts = posts.list_posts(query.into_inner().into()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "results": posts.len(),
        "data": posts,
    })))
}

pub async fn get_post(
    posts: web::Data<PostService>,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let post = posts.get_post(post_id.into_inner()).await?;
    Ok(success(StatusCode::OK, json!({ "post": post })))
}

pub async fn update_post(
    posts: web::Data<PostService>,
    user_id: UserId,
    post_id: web::Path<Uuid>,
    req: web::Json<UpdatePostRequest>,
) -> Result<HttpResponse> {
    let req = req.into_inner();
    req.validate()?;
    if let Some(title) = &req.title {
        require_non_blank("title", title)?;
    }
    if let Some(content) = &req.content {
        require_non_blank("content", content)?;
    }

    let post = posts
        .update_post(
            post_id.into_inner(),
            user_id.0,
            PostChanges {
                title: req.title,
                content: req.content,
                image: req.image,
            },
        )
        .await?;

    Ok(success(StatusCode::OK, json!({ "post": post })))
}

pub async fn delete_post(
    posts: web::Data<PostService>,
    user_id: UserId,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    posts.delete_post(post_id.into_inner(), user_id.0).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn toggle_like(
    posts: web::Data<PostService>,
    user_id: UserId,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let state = posts.toggle_like(post_id.into_inner(), user_id.0).await?;
    Ok(success(StatusCode::OK, state))
}
