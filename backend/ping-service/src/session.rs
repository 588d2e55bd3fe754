//! Cookie-backed server-side sessions
use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;

use crate::error::AppError;
use crate::AppState;

/// The logged-in caller, resolved from the session cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: String,
    pub username: String,
}

impl FromRequest for Session {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let state = req.app_data::<web::Data<AppState>>().cloned();
        let session_id = state.as_ref().and_then(|state| {
            req.cookie(&state.config.session.cookie_name)
                .map(|c| c.value().to_string())
                .filter(|v| !v.is_empty())
        });

        Box::pin(async move {
            let state = state
                .ok_or_else(|| AppError::Internal("application state not configured".to_string()))?;
            let session_id = session_id.ok_or(AppError::Unauthorized)?;

            let username = state
                .stores
                .sessions
                .session_user(&session_id)
                .await?
                .ok_or(AppError::Unauthorized)?;

            Ok(Session {
                id: session_id,
                username,
            })
        })
    }
}
