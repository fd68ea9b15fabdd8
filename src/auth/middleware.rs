//! Session-cookie authentication middleware.

use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::Response,
};

use crate::http::error::ApiError;
use crate::http::server::AppState;

/// Require a valid session cookie on the request.
///
/// On success the decoded claims are inserted as a request extension so
/// handlers can read the authenticated identity. Rejections go through
/// [`ApiError`] so the 401 carries the same JSON error body as every other
/// failure path.
pub async fn session_auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let cookie_header = request
        .headers()
        .get(header::COOKIE)
        .and_then(|h| h.to_str().ok());

    let token = cookie_header.and_then(|h| state.sessions.token_from_cookies(h));

    let token = match token {
        Some(t) => t,
        None => return Err(ApiError::Unauthorized("missing session cookie".to_string())),
    };

    match state.sessions.verify(token) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            Ok(next.run(request).await)
        }
        Err(e) => {
            tracing::debug!(error = %e, "Rejected session token");
            Err(e.into())
        }
    }
}
