// src/utils/admin_key.rs

use axum::{
    body::Body,
    extract::State,
    http::{HeaderName, Request},
    middleware::Next,
    response::Response,
};

use crate::{config::Config, error::AppError};

pub const ADMIN_KEY_HEADER: HeaderName = HeaderName::from_static("x-admin-key");

/// Axum Middleware: Admin Authorization.
///
/// When `ADMIN_KEY` is configured the request must carry the same value in
/// `X-Admin-Key`, otherwise 401. Without a configured key admin routes are open.
pub async fn admin_middleware(
    State(config): State<Config>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let Some(expected) = config.admin_key.as_deref() else {
        return Ok(next.run(req).await);
    };

    let provided = req
        .headers()
        .get(&ADMIN_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    match provided {
        Some(key) if key == expected => Ok(next.run(req).await),
        Some(_) => {
            tracing::warn!("Rejected admin request to {} with a wrong key", req.uri().path());
            Err(AppError::AuthError("Invalid admin key".to_string()))
        }
        None => Err(AppError::AuthError("Missing admin key".to_string())),
    }
}
