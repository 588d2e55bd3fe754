/// Comment endpoints nested under a post
use actix_web::{http::StatusCode, web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use super::{require_non_blank, success};
use crate::error::Result;
use crate::middleware::UserId;
use crate::services::PostService;

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub content: String,
}

pub async fn list_comments(
    posts: web::Data<PostService>,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let comments = posts.list_comments(post_id.into_inner()).await?;
    Ok(success(StatusCode::OK, json!({ "comments": comments })))
}

pub async fn add_comment(
    posts: web::Data<PostService>,
    user_id: UserId,
    post_id: web::Path<Uuid>,
    req: web::Json<CommentRequest>,
) -> Result<HttpResponse> {
    require_non_blank("content", &req.content)?;
    let comment = posts
        .add_comment(post_id.into_inner(), user_id.0, &req.content)
        .await?;
    Ok(success(StatusCode::CREATED, json!({ "comment": comment })))
}

pub async fn update_comment(
    posts: web::Data<PostService>,
    user_id: UserId,
    path: web::Path<(Uuid, Uuid)>,
    req: web::Json<CommentRequest>,
) -> Result<HttpResponse> {
    require_non_blank("content", &req.content)?;
    let (post_id, comment_id) = path.into_inner();
    let comment = posts
        .update_comment(post_id, comment_id, user_id.0, &req.content)
        .await?;
    Ok(success(StatusCode::OK, json!({ "comment": comment })))
}

pub async fn delete_comment(
    posts: web::Data<PostService>,
    user_id: UserId,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    posts.delete_comment(post_id, comment_id, user_id.0).await?;
    Ok(HttpResponse::NoContent().finish())
}
