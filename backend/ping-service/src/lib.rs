//! Ping Service
//!
//! Session login plus a rate-limited, serialized `/ping` with a request
//! counter, unique-user estimate and leaderboard.
pub mod config;
pub mod error;
pub mod handlers;
pub mod session;
pub mod store;
pub mod telemetry;

use std::sync::atomic::AtomicU64;
use std::sync::Arc;

use actix_web::web;
use tokio::sync::Mutex;

use crate::config::Config;
use crate::error::AppError;
use crate::store::Stores;

pub struct AppState {
    pub config: Config,
    pub stores: Stores,
    /// Held for the whole critical section of `/ping`
    pub ping_lock: Mutex<()>,
    /// Accepted pings since process start
    pub ping_count: AtomicU64,
}

impl AppState {
    pub fn new(config: Config, stores: Stores) -> Arc<Self> {
        Arc::new(Self {
            config,
            stores,
            ping_lock: Mutex::new(()),
            ping_count: AtomicU64::new(0),
        })
    }
}

pub fn configure(cfg: &mut web::ServiceConfig, state: Arc<AppState>) {
    cfg.app_data(web::Data::from(state))
        .app_data(web::JsonConfig::default().error_handler(|err, _req| {
            AppError::BadRequest(format!("Invalid request body: {}", err)).into()
        }))
        .route("/health", web::get().to(handlers::health))
        .route("/login", web::post().to(handlers::login))
        .route("/logout", web::post().to(handlers::logout))
        .route("/ping", web::get().to(handlers::ping))
        .route("/count", web::get().to(handlers::count))
        .route("/top", web::get().to(handlers::top));
}
