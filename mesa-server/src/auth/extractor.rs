//! Session extractor
//!
//! Lets handlers take [`CurrentUser`] as an argument. The session
//! middleware normally injects the user into request extensions; the
//! extractor falls back to validating the header itself so a route wired
//! without the middleware still refuses anonymous callers.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::auth::{CurrentUser, SessionService};
use crate::core::ServerState;
use shared::AppError;

impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        // Already extracted by the middleware
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let token = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(SessionService::extract_from_header)
            .ok_or_else(AppError::not_authenticated)?;

        let user = state.sessions.validate(token)?;
        parts.extensions.insert(user.clone());
        Ok(user)
    }
}
