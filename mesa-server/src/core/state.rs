use std::sync::Arc;

use crate::auth::SessionService;
use crate::core::Config;
use crate::db::repository::{ItemRepository, OrderRepository};
use crate::db::DbService;
use crate::orders::{FulfillmentEngine, PlacementEngine};
use shared::AppError;

/// Server state - shared handles for all services
///
/// The state is an explicitly constructed bundle of service handles,
/// injected into the router and engines (no process-global connection
/// cache). Cloning is cheap: every field is a pool or an Arc.
///
/// | Field | Type | Description |
/// |-------|------|-------------|
/// | config | Config | configuration (immutable) |
/// | db | DbService | SQLite pool + write discipline |
/// | sessions | Arc<SessionService> | capability token table |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: DbService,
    pub sessions: Arc<SessionService>,
}

impl ServerState {
    pub fn new(config: Config, db: DbService, sessions: Arc<SessionService>) -> Self {
        Self {
            config,
            db,
            sessions,
        }
    }

    /// Initialize server state:
    /// 1. ensure the work directory structure exists
    /// 2. open the database at `work_dir/database/mesa.db` and run migrations
    /// 3. start an empty session table
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        config
            .ensure_work_dir_structure()
            .map_err(|e| AppError::internal(format!("Failed to create work directory: {e}")))?;

        let db_path = config.database_dir().join("mesa.db");
        let db = DbService::new(&db_path.to_string_lossy()).await?;

        Ok(Self::new(
            config.clone(),
            db,
            Arc::new(SessionService::new()),
        ))
    }

    pub fn item_repository(&self) -> ItemRepository {
        ItemRepository::new(self.db.clone())
    }

    pub fn order_repository(&self) -> OrderRepository {
        OrderRepository::new(self.db.clone())
    }

    pub fn placement_engine(&self) -> PlacementEngine {
        PlacementEngine::new(self.db.clone())
    }

    pub fn fulfillment_engine(&self) -> FulfillmentEngine {
        FulfillmentEngine::new(self.db.clone())
    }
}
