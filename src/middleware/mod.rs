use std::sync::Arc;

use axum::{
    extract::Request,
    http::{header, HeaderName, Method},
    middleware::Next,
    response::IntoResponse,
};
use secrecy::ExposeSecret;
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

use crate::{AppState, Error, Result};

pub const API_KEY_HEADER: &str = "x-api-key";

/// Guards the admin routes with the shared key from `ADMIN_API_KEY`.
pub async fn require_api_key(req: Request, next: Next) -> Result<impl IntoResponse> {
    let app_state = req
        .extensions()
        .get::<Arc<AppState>>()
        .ok_or(Error::Unauthorized)?;

    let authorized = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|key| {
            constant_time_eq(
                key.as_bytes(),
                app_state.config.admin_api_key.expose_secret().as_bytes(),
            )
        });

    if !authorized {
        warn!(path = %req.uri().path(), "Rejected admin request without a valid API key");
        return Err(Error::Unauthorized);
    }

    Ok(next.run(req).await)
}

/// Compares every byte regardless of where the first mismatch is.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

pub fn configure_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(API_KEY_HEADER)])
}
