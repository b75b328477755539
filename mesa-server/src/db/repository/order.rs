//! Order Repository (order store)
//!
//! At most one open order exists per (customer, seat) pair; repeat
//! placements merge into it. Fulfilling a seat deletes all of its orders
//! wholesale (line rows cascade).

use super::RepoResult;
use crate::db::DbService;
use shared::models::{Order, OrderLine};
use sqlx::SqliteConnection;

/// Flat `orders` row; lines are joined in by the fetch helpers
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct OrderRow {
    pub id: i64,
    pub customer_name: String,
    pub seat_number: String,
    pub created_at: i64,
}

impl OrderRow {
    fn into_order(self, items: Vec<OrderLine>) -> Order {
        Order {
            id: self.id,
            customer_name: self.customer_name,
            seat_number: self.seat_number,
            items,
            created_at: self.created_at,
        }
    }
}

// =============================================================================
// Row-level helpers (composable inside a caller-owned transaction)
// =============================================================================

pub(crate) async fn fetch_order_lines(
    conn: &mut SqliteConnection,
    order_id: i64,
) -> RepoResult<Vec<OrderLine>> {
    let lines = sqlx::query_as::<_, OrderLine>(
        "SELECT item_id, item_name AS name, size, quantity \
         FROM order_lines WHERE order_id = ?1 ORDER BY position",
    )
    .bind(order_id)
    .fetch_all(&mut *conn)
    .await?;
    Ok(lines)
}

pub(crate) async fn fetch_open_order(
    conn: &mut SqliteConnection,
    customer_name: &str,
    seat_number: &str,
) -> RepoResult<Option<Order>> {
    let row = sqlx::query_as::<_, OrderRow>(
        "SELECT id, customer_name, seat_number, created_at \
         FROM orders WHERE customer_name = ?1 AND seat_number = ?2",
    )
    .bind(customer_name)
    .bind(seat_number)
    .fetch_optional(&mut *conn)
    .await?;

    match row {
        Some(row) => {
            let lines = fetch_order_lines(&mut *conn, row.id).await?;
            Ok(Some(row.into_order(lines)))
        }
        None => Ok(None),
    }
}

pub(crate) async fn fetch_order(
    conn: &mut SqliteConnection,
    id: i64,
) -> RepoResult<Option<Order>> {
    let row = sqlx::query_as::<_, OrderRow>(
        "SELECT id, customer_name, seat_number, created_at FROM orders WHERE id = ?1",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    match row {
        Some(row) => {
            let lines = fetch_order_lines(&mut *conn, row.id).await?;
            Ok(Some(row.into_order(lines)))
        }
        None => Ok(None),
    }
}

/// Create an order record with no lines yet
pub(crate) async fn insert_order(
    conn: &mut SqliteConnection,
    id: i64,
    customer_name: &str,
    seat_number: &str,
    created_at: i64,
) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO orders (id, customer_name, seat_number, created_at) \
         VALUES (?1, ?2, ?3, ?4)",
    )
    .bind(id)
    .bind(customer_name)
    .bind(seat_number)
    .bind(created_at)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// Merge one line into an order: increment quantity on a matching
/// (item_id, size) line, append a new line otherwise.
pub(crate) async fn merge_line(
    conn: &mut SqliteConnection,
    order_id: i64,
    item_id: i64,
    item_name: &str,
    size: &str,
    quantity: i64,
) -> RepoResult<()> {
    let updated = sqlx::query(
        "UPDATE order_lines SET quantity = quantity + ?1 \
         WHERE order_id = ?2 AND item_id = ?3 AND size = ?4",
    )
    .bind(quantity)
    .bind(order_id)
    .bind(item_id)
    .bind(size)
    .execute(&mut *conn)
    .await?
    .rows_affected();

    if updated == 0 {
        let position: i64 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(position) + 1, 0) FROM order_lines WHERE order_id = ?1",
        )
        .bind(order_id)
        .fetch_one(&mut *conn)
        .await?;
        sqlx::query(
            "INSERT INTO order_lines (order_id, item_id, item_name, size, quantity, position) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(order_id)
        .bind(item_id)
        .bind(item_name)
        .bind(size)
        .bind(quantity)
        .bind(position)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

pub(crate) async fn delete_orders_for_seat(
    conn: &mut SqliteConnection,
    seat_number: &str,
) -> RepoResult<u64> {
    let removed = sqlx::query("DELETE FROM orders WHERE seat_number = ?1")
        .bind(seat_number)
        .execute(&mut *conn)
        .await?
        .rows_affected();
    Ok(removed)
}

// =============================================================================
// Order Repository
// =============================================================================

#[derive(Clone)]
pub struct OrderRepository {
    db: DbService,
}

impl OrderRepository {
    pub fn new(db: DbService) -> Self {
        Self { db }
    }

    /// The open order for this exact (customer, seat) pair, if any
    pub async fn find_open(
        &self,
        customer_name: &str,
        seat_number: &str,
    ) -> RepoResult<Option<Order>> {
        let mut conn = self.db.pool.acquire().await?;
        fetch_open_order(&mut conn, customer_name, seat_number).await
    }

    /// All open orders, oldest first
    pub async fn list_all(&self) -> RepoResult<Vec<Order>> {
        let mut conn = self.db.pool.acquire().await?;
        let rows = sqlx::query_as::<_, OrderRow>(
            "SELECT id, customer_name, seat_number, created_at FROM orders ORDER BY created_at, id",
        )
        .fetch_all(&mut *conn)
        .await?;

        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            let lines = fetch_order_lines(&mut conn, row.id).await?;
            orders.push(row.into_order(lines));
        }
        Ok(orders)
    }

    /// Remove every order for a seat; returns the number removed
    pub async fn delete_for_seat(&self, seat_number: &str) -> RepoResult<u64> {
        let _guard = self.db.write().await;
        let mut conn = self.db.pool.acquire().await?;
        let removed = delete_orders_for_seat(&mut conn, seat_number).await?;
        if removed > 0 {
            tracing::info!(seat_number, removed, "Orders removed for seat");
        }
        Ok(removed)
    }
}
