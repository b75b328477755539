//! Mesa Server - venue ordering service
//!
//! # Architecture
//!
//! - **Database** (`db`): embedded SQLite store with single-writer
//!   transaction discipline
//! - **Order engines** (`orders`): atomic order placement and seat
//!   fulfillment
//! - **Sessions** (`auth`): capability tokens gating the API boundary
//! - **HTTP API** (`api`): RESTful interface for menu and orders
//!
//! # Module structure
//!
//! ```text
//! mesa-server/src/
//! ├── core/          # config, state, server
//! ├── auth/          # session tokens, capability middleware
//! ├── db/            # database layer and repositories
//! ├── orders/        # placement + fulfillment engines
//! ├── api/           # HTTP routes and handlers
//! └── utils/         # logging, validation
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod orders;
pub mod utils;

// Re-export public types
pub use auth::{CurrentUser, Role, SessionService};
pub use crate::core::{Config, Server, ServerState};
pub use db::repository::{ItemRepository, OrderRepository};
pub use db::DbService;
pub use orders::{FulfillmentEngine, PlacementEngine};
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

pub fn print_banner() {
    println!(
        r#"
    __  ___
   /  |/  /__  _________ _
  / /|_/ / _ \/ ___/ __ `/
 / /  / /  __(__  ) /_/ /
/_/  /_/\___/____/\__,_/
    "#
    );
}
