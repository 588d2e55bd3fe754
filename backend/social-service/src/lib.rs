//! Social Service
//!
//! Users, follows, posts, comments and likes over a JSON HTTP API.
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod security;
pub mod services;
pub mod telemetry;

use std::sync::Arc;

use actix_web::web;

use crate::db::Repositories;
use crate::error::AppError;
use crate::middleware::JwtAuthMiddleware;
use crate::security::JwtKeys;
use crate::services::{AuthService, ImageStore, PostService, UserService};

/// Shared application state, cloned into every worker.
#[derive(Clone)]
pub struct AppState {
    pub repos: Repositories,
    pub jwt: Arc<JwtKeys>,
    pub auth: Arc<AuthService>,
    pub users: Arc<UserService>,
    pub posts: Arc<PostService>,
    pub images: Arc<ImageStore>,
}

impl AppState {
    pub fn new(repos: Repositories, jwt: JwtKeys, images: ImageStore) -> Self {
        let jwt = Arc::new(jwt);
        Self {
            auth: Arc::new(AuthService::new(repos.users.clone(), jwt.clone())),
            users: Arc::new(UserService::new(repos.clone())),
            posts: Arc::new(PostService::new(repos.clone())),
            images: Arc::new(images),
            repos,
            jwt,
        }
    }
}

/// Register routes, shared data and extractor error handlers.
pub fn configure(cfg: &mut web::ServiceConfig, state: &AppState) {
    use handlers::{auth, comments, health, posts, users};

    cfg.app_data(web::Data::new(state.repos.clone()))
        .app_data(web::Data::from(state.auth.clone()))
        .app_data(web::Data::from(state.users.clone()))
        .app_data(web::Data::from(state.posts.clone()))
        .app_data(web::Data::from(state.images.clone()))
        .app_data(json_config())
        .app_data(path_config())
        .app_data(query_config())
        .route("/health", web::get().to(health::health))
        .route("/readiness", web::get().to(health::readiness))
        .service(
            web::scope("/api")
                .wrap(JwtAuthMiddleware::new(state.jwt.clone()))
                .service(
                    web::scope("/auth")
                        .route("/register", web::post().to(auth::register))
                        .route("/login", web::post().to(auth::login))
                        .route("/logout", web::post().to(auth::logout)),
                )
                .service(
                    web::scope("/users")
                        .route("/me", web::get().to(users::get_me))
                        .service(
                            web::resource("/profile")
                                .route(web::get().to(users::get_me))
                                .route(web::put().to(users::update_profile)),
                        )
                        .route("/profile/image", web::post().to(users::upload_profile_image))
                        .route("/follow/{user_id}", web::post().to(users::follow_user))
                        .route("/unfollow/{user_id}", web::delete().to(users::unfollow_user))
                        .route("/{user_id}/followers", web::get().to(users::get_followers))
                        .route("/{user_id}/following", web::get().to(users::get_following)),
                )
                .service(
                    web::scope("/posts")
                        .service(
                            web::resource("")
                                .route(web::get().to(posts::list_posts))
                                .route(web::post().to(posts::create_post)),
                        )
                        .service(
                            web::resource("/{post_id}")
                                .route(web::get().to(posts::get_post))
                                .route(web::put().to(posts::update_post))
                                .route(web::delete().to(posts::delete_post)),
                        )
                        .route("/{post_id}/like", web::post().to(posts::toggle_like))
                        .service(
                            web::resource("/{post_id}/comments")
                                .route(web::get().to(comments::list_comments))
                                .route(web::post().to(comments::add_comment)),
                        )
                        .service(
                            web::resource("/{post_id}/comments/{comment_id}")
                                .route(web::put().to(comments::update_comment))
                                .route(web::delete().to(comments::delete_comment)),
                        ),
                ),
        );
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(format!("Invalid JSON body: {}", err)).into()
    })
}

fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|_err, _req| AppError::BadRequest("Invalid ID format".to_string()).into())
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(format!("Invalid query string: {}", err)).into()
    })
}
