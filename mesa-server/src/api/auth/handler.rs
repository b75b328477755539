//! Session API handlers

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::auth::Role;
use crate::core::ServerState;
use crate::utils::AppResult;

#[derive(Debug, Deserialize)]
pub struct SessionRequest {
    pub role: Role,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub role: Role,
}

/// POST /api/auth/session - issue a bearer token for a role
///
/// No credentials are involved; the token is a capability handle, not a
/// security boundary.
pub async fn create_session(
    State(state): State<ServerState>,
    Json(req): Json<SessionRequest>,
) -> AppResult<Json<SessionResponse>> {
    let token = state.sessions.issue(req.role);
    Ok(Json(SessionResponse {
        token,
        role: req.role,
    }))
}
