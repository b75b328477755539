//! Session tokens bound to roles

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use shared::util::now_millis;
use shared::AppError;

/// Sessions idle out after half a day; venues restart tablets daily
const SESSION_TTL_MS: i64 = 12 * 60 * 60 * 1000;

/// Capability role carried by a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full capability: manage menu, view all orders, fulfill seats
    Staff,
    /// Browse the menu and place orders
    Guest,
}

impl Role {
    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Staff)
    }
}

/// The authenticated caller, injected into request extensions by the
/// session middleware
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub token: String,
    pub role: Role,
}

impl CurrentUser {
    /// Require the staff capability; 403 otherwise
    pub fn require_staff(&self) -> Result<(), AppError> {
        if !self.role.is_staff() {
            tracing::warn!(role = ?self.role, "Staff capability required");
            return Err(AppError::staff_required());
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
struct Session {
    role: Role,
    issued_at: i64,
}

/// In-memory session table
pub struct SessionService {
    sessions: DashMap<String, Session>,
    ttl_ms: i64,
}

impl SessionService {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
            ttl_ms: SESSION_TTL_MS,
        }
    }

    /// Create a session service with a custom TTL (for testing)
    #[cfg(test)]
    pub fn with_ttl(ttl_ms: i64) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl_ms,
        }
    }

    /// Issue a new bearer token for the given role
    pub fn issue(&self, role: Role) -> String {
        let token = uuid::Uuid::new_v4().to_string();
        self.sessions.insert(
            token.clone(),
            Session {
                role,
                issued_at: now_millis(),
            },
        );
        tracing::info!(?role, "Session issued");
        token
    }

    /// Validate a bearer token, evicting it if expired
    pub fn validate(&self, token: &str) -> Result<CurrentUser, AppError> {
        let session = match self.sessions.get(token) {
            Some(entry) => entry.value().clone(),
            None => return Err(AppError::session_invalid()),
        };

        if now_millis() - session.issued_at > self.ttl_ms {
            self.sessions.remove(token);
            return Err(AppError::new(shared::ErrorCode::SessionExpired));
        }

        Ok(CurrentUser {
            token: token.to_string(),
            role: session.role,
        })
    }

    /// Extract the token from an `Authorization: Bearer <token>` header
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

impl Default for SessionService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::ErrorCode;

    #[test]
    fn test_issue_and_validate() {
        let service = SessionService::new();
        let token = service.issue(Role::Staff);

        let user = service.validate(&token).unwrap();
        assert_eq!(user.role, Role::Staff);
        assert_eq!(user.token, token);
    }

    #[test]
    fn test_unknown_token_is_invalid() {
        let service = SessionService::new();
        let err = service.validate("nope").unwrap_err();
        assert_eq!(err.code, ErrorCode::SessionInvalid);
    }

    #[test]
    fn test_expired_token_is_evicted() {
        let service = SessionService::with_ttl(-1);
        let token = service.issue(Role::Guest);

        let err = service.validate(&token).unwrap_err();
        assert_eq!(err.code, ErrorCode::SessionExpired);
        // second attempt sees it gone entirely
        let err = service.validate(&token).unwrap_err();
        assert_eq!(err.code, ErrorCode::SessionInvalid);
    }

    #[test]
    fn test_extract_from_header() {
        assert_eq!(
            SessionService::extract_from_header("Bearer abc123"),
            Some("abc123")
        );
        assert_eq!(SessionService::extract_from_header("Bearer "), None);
        assert_eq!(SessionService::extract_from_header("Basic abc"), None);
    }

    #[test]
    fn test_require_staff() {
        let staff = CurrentUser {
            token: "t".into(),
            role: Role::Staff,
        };
        assert!(staff.require_staff().is_ok());

        let guest = CurrentUser {
            token: "t".into(),
            role: Role::Guest,
        };
        let err = guest.require_staff().unwrap_err();
        assert_eq!(err.code, ErrorCode::StaffRequired);
    }
}
