//! Session middleware
//!
//! Validates the bearer token on every `/api/` request and injects
//! [`CurrentUser`] into request extensions.
//!
//! # Paths that skip the check
//!
//! - `OPTIONS *` (CORS preflight)
//! - non-`/api/` paths
//! - `/api/health`
//! - `/api/auth/session` (token issuance)

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::SessionService;
use crate::core::ServerState;
use shared::AppError;

pub async fn require_session(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    // Allow CORS preflight through
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    // Non-API routes fall through to their own 404
    if !path.starts_with("/api/") {
        return Ok(next.run(req).await);
    }

    let is_public_api_route = path == "/api/health" || path == "/api/auth/session";
    if is_public_api_route {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => SessionService::extract_from_header(header)
            .ok_or_else(|| AppError::session_invalid())?,
        None => {
            tracing::warn!(uri = %req.uri(), "Request without session token");
            return Err(AppError::not_authenticated());
        }
    };

    let user = state.sessions.validate(token)?;
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}
