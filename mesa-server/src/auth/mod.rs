//! Session and capability layer
//!
//! Authorization is a server-boundary check: clients obtain an opaque
//! bearer token bound to a role, middleware validates it before any
//! handler runs, and staff-only handlers require the staff capability.
//! Deliberately not a hardened security boundary — there are no
//! credentials — just an explicit capability interface.

pub mod extractor;
pub mod middleware;
pub mod session;

pub use middleware::require_session;
pub use session::{CurrentUser, Role, SessionService};
