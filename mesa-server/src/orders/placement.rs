//! Order placement engine
//!
//! Processes one placement request as a single atomic unit:
//!
//! ```text
//! place(request)
//!     ├─ 1. Validate the request shape (no side effects on rejection)
//!     ├─ 2. Acquire the write lock, begin a transaction
//!     ├─ 3. Look up the open order for (customer, seat)
//!     ├─ 4. Per line, in submitted order:
//!     │      resolve item → resolve variant → conditional stock decrement
//!     ├─ 5. Merge lines into the open order, or create a new order
//!     ├─ 6. Commit and return the resulting order snapshot
//!     └─ on any failure: roll back — earlier lines' decrements included
//! ```
//!
//! Validation and mutation interleave per line, but the whole multi-line
//! request is all-or-nothing: a failure on line 3 of 5 must undo the stock
//! already taken by lines 1 and 2. That is why every step runs inside one
//! transaction rather than as independent per-line writes.

use super::error::PlacementError;
use crate::db::repository::{item, order, RepoError};
use crate::db::DbService;
use shared::models::item::normalize_size;
use shared::models::{Order, OrderLineInput, PlaceOrderRequest};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqliteConnection;

/// A request line after item/variant resolution, carrying the store's own
/// item name for the denormalized order line
struct ResolvedLine {
    item_id: i64,
    name: String,
    size: String,
    quantity: i64,
}

#[derive(Clone)]
pub struct PlacementEngine {
    db: DbService,
}

impl PlacementEngine {
    pub fn new(db: DbService) -> Self {
        Self { db }
    }

    /// Place an order; terminal states are Committed (Ok), Rejected, or
    /// Failed (Err)
    pub async fn place(&self, req: PlaceOrderRequest) -> Result<Order, PlacementError> {
        let customer_name = req.customer_name.trim().to_string();
        if customer_name.is_empty() {
            return Err(PlacementError::MissingField("customerName"));
        }
        let seat_number = req.seat_number.trim().to_string();
        if seat_number.is_empty() {
            return Err(PlacementError::MissingField("seatNumber"));
        }
        if req.items.is_empty() {
            return Err(PlacementError::EmptyOrder);
        }
        for line in &req.items {
            if line.quantity <= 0 {
                return Err(PlacementError::InvalidQuantity {
                    item_id: line.item,
                    size: normalize_size(&line.size),
                });
            }
        }

        let _guard = self.db.write().await;
        let mut tx = self.db.pool.begin().await.map_err(RepoError::from)?;

        match place_in_tx(&mut tx, &customer_name, &seat_number, &req.items).await {
            Ok(order_id) => {
                let order = order::fetch_order(&mut tx, order_id)
                    .await
                    .map_err(PlacementError::Store)?
                    .ok_or_else(|| {
                        PlacementError::Store(RepoError::Database(
                            "order vanished before commit".into(),
                        ))
                    })?;
                tx.commit().await.map_err(RepoError::from)?;
                tracing::info!(
                    order_id,
                    customer_name = %order.customer_name,
                    seat_number = %order.seat_number,
                    lines = order.items.len(),
                    "Order committed"
                );
                Ok(order)
            }
            Err(e) => {
                // undo every stock decrement this request applied
                let _ = tx.rollback().await;
                tracing::info!(customer_name = %customer_name, seat_number = %seat_number, error = %e, "Order rejected");
                Err(e)
            }
        }
    }
}

async fn place_in_tx(
    conn: &mut SqliteConnection,
    customer_name: &str,
    seat_number: &str,
    lines: &[OrderLineInput],
) -> Result<i64, PlacementError> {
    // Whether an open order exists decides create-vs-merge at commit
    let existing = order::fetch_open_order(&mut *conn, customer_name, seat_number).await?;

    let mut resolved = Vec::with_capacity(lines.len());
    for line in lines {
        let size = normalize_size(&line.size);
        let item_row = item::fetch_item_row(&mut *conn, line.item)
            .await?
            .ok_or(PlacementError::ItemNotFound(line.item))?;

        let affected = item::decrement_stock(&mut *conn, line.item, &size, line.quantity).await?;
        if affected == 0 {
            // the guard failed: either the size is missing or short on stock
            return Err(
                match item::fetch_variant(&mut *conn, line.item, &size).await? {
                    Some(variant) => PlacementError::InsufficientStock {
                        item: item_row.name,
                        size,
                        requested: line.quantity,
                        available: variant.stock,
                    },
                    None => PlacementError::VariantNotFound {
                        item_id: line.item,
                        size,
                    },
                },
            );
        }

        resolved.push(ResolvedLine {
            item_id: line.item,
            name: item_row.name,
            size,
            quantity: line.quantity,
        });
    }

    let order_id = match &existing {
        Some(open) => open.id,
        None => {
            // Snowflake ids carry 12 random bits per millisecond; a burst
            // of new orders can collide, so retry the insert with a fresh id
            let mut id = snowflake_id();
            let mut attempts = 0;
            loop {
                match order::insert_order(&mut *conn, id, customer_name, seat_number, now_millis())
                    .await
                {
                    Ok(()) => break id,
                    Err(RepoError::Conflict(_)) if attempts < 3 => {
                        attempts += 1;
                        id = snowflake_id();
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        }
    };

    for line in &resolved {
        order::merge_line(
            &mut *conn,
            order_id,
            line.item_id,
            &line.name,
            &line.size,
            line.quantity,
        )
        .await?;
    }

    Ok(order_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::ItemRepository;
    use shared::models::{ItemUpsert, VariantInput};
    use tempfile::TempDir;

    async fn test_db() -> (DbService, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");
        let db = DbService::new(&path.to_string_lossy()).await.unwrap();
        (db, dir)
    }

    async fn seed_item(db: &DbService, name: &str, variants: Vec<(&str, f64, i64)>) -> i64 {
        let repo = ItemRepository::new(db.clone());
        let item = repo
            .upsert(ItemUpsert {
                name: name.to_string(),
                category: "Beverages".to_string(),
                variants: variants
                    .into_iter()
                    .map(|(size, price, stock)| VariantInput {
                        size: size.to_string(),
                        price,
                        stock,
                    })
                    .collect(),
            })
            .await
            .unwrap();
        item.id
    }

    async fn stock_of(db: &DbService, item_id: i64, size: &str) -> i64 {
        ItemRepository::new(db.clone())
            .find_variant(item_id, size)
            .await
            .unwrap()
            .stock
    }

    fn request(customer: &str, seat: &str, lines: Vec<(i64, &str, i64)>) -> PlaceOrderRequest {
        PlaceOrderRequest {
            customer_name: customer.to_string(),
            seat_number: seat.to_string(),
            items: lines
                .into_iter()
                .map(|(item, size, quantity)| OrderLineInput {
                    item,
                    size: size.to_string(),
                    quantity,
                    name: None,
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_place_creates_order_and_decrements_stock() {
        let (db, _dir) = test_db().await;
        let coffee = seed_item(&db, "Coffee", vec![("S", 2.0, 5)]).await;
        let engine = PlacementEngine::new(db.clone());

        let order = engine
            .place(request("Ana", "12", vec![(coffee, "s", 3)]))
            .await
            .unwrap();

        assert_eq!(order.customer_name, "Ana");
        assert_eq!(order.seat_number, "12");
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].item_id, coffee);
        assert_eq!(order.items[0].name, "Coffee");
        assert_eq!(order.items[0].size, "S");
        assert_eq!(order.items[0].quantity, 3);
        assert_eq!(stock_of(&db, coffee, "S").await, 2);
    }

    #[tokio::test]
    async fn test_second_place_for_same_seat_fails_and_changes_nothing() {
        // Coffee S starts at stock 5; 3 units commit, then a second request
        // for 3 more is rejected and stock stays at 2
        let (db, _dir) = test_db().await;
        let coffee = seed_item(&db, "Coffee", vec![("S", 2.0, 5)]).await;
        let engine = PlacementEngine::new(db.clone());

        engine
            .place(request("Ana", "12", vec![(coffee, "S", 3)]))
            .await
            .unwrap();

        let err = engine
            .place(request("Ana", "12", vec![(coffee, "S", 3)]))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PlacementError::InsufficientStock {
                requested: 3,
                available: 2,
                ..
            }
        ));

        assert_eq!(stock_of(&db, coffee, "S").await, 2);
        let order = crate::db::repository::OrderRepository::new(db.clone())
            .find_open("Ana", "12")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(order.items[0].quantity, 3);
    }

    #[tokio::test]
    async fn test_place_merges_into_open_order() {
        let (db, _dir) = test_db().await;
        let coffee = seed_item(&db, "Coffee", vec![("S", 2.0, 10), ("M", 2.5, 10)]).await;
        let engine = PlacementEngine::new(db.clone());

        let first = engine
            .place(request("Ana", "12", vec![(coffee, "S", 2)]))
            .await
            .unwrap();
        let second = engine
            .place(request("Ana", "12", vec![(coffee, "S", 1), (coffee, "M", 4)]))
            .await
            .unwrap();

        // same order, repeated (item, size) summed, new size appended
        assert_eq!(second.id, first.id);
        assert_eq!(second.items.len(), 2);
        assert_eq!(second.items[0].size, "S");
        assert_eq!(second.items[0].quantity, 3);
        assert_eq!(second.items[1].size, "M");
        assert_eq!(second.items[1].quantity, 4);

        let orders = crate::db::repository::OrderRepository::new(db)
            .list_all()
            .await
            .unwrap();
        assert_eq!(orders.len(), 1);
    }

    #[tokio::test]
    async fn test_failure_mid_request_rolls_back_earlier_lines() {
        let (db, _dir) = test_db().await;
        let coffee = seed_item(&db, "Coffee", vec![("S", 2.0, 5)]).await;
        let tea = seed_item(&db, "Tea", vec![("M", 1.5, 1)]).await;
        let engine = PlacementEngine::new(db.clone());

        // line 1 would succeed; line 2 exceeds stock — nothing may survive
        let err = engine
            .place(request("Ana", "12", vec![(coffee, "S", 3), (tea, "M", 2)]))
            .await
            .unwrap_err();
        assert!(matches!(err, PlacementError::InsufficientStock { .. }));

        assert_eq!(stock_of(&db, coffee, "S").await, 5);
        assert_eq!(stock_of(&db, tea, "M").await, 1);
        assert!(crate::db::repository::OrderRepository::new(db)
            .find_open("Ana", "12")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_unknown_item_aborts_whole_request() {
        let (db, _dir) = test_db().await;
        let coffee = seed_item(&db, "Coffee", vec![("S", 2.0, 5)]).await;
        let engine = PlacementEngine::new(db.clone());

        let err = engine
            .place(request("Ana", "12", vec![(coffee, "S", 2), (999, "S", 1)]))
            .await
            .unwrap_err();
        assert!(matches!(err, PlacementError::ItemNotFound(999)));
        assert_eq!(stock_of(&db, coffee, "S").await, 5);
    }

    #[tokio::test]
    async fn test_unknown_variant_aborts_whole_request() {
        let (db, _dir) = test_db().await;
        let coffee = seed_item(&db, "Coffee", vec![("S", 2.0, 5)]).await;
        let engine = PlacementEngine::new(db.clone());

        let err = engine
            .place(request("Ana", "12", vec![(coffee, "XL", 1)]))
            .await
            .unwrap_err();
        assert!(matches!(err, PlacementError::VariantNotFound { .. }));
        assert_eq!(stock_of(&db, coffee, "S").await, 5);
    }

    #[tokio::test]
    async fn test_precondition_rejections_have_no_side_effects() {
        let (db, _dir) = test_db().await;
        let coffee = seed_item(&db, "Coffee", vec![("S", 2.0, 5)]).await;
        let engine = PlacementEngine::new(db.clone());

        let err = engine
            .place(request("", "12", vec![(coffee, "S", 1)]))
            .await
            .unwrap_err();
        assert!(matches!(err, PlacementError::MissingField("customerName")));

        let err = engine
            .place(request("Ana", "  ", vec![(coffee, "S", 1)]))
            .await
            .unwrap_err();
        assert!(matches!(err, PlacementError::MissingField("seatNumber")));

        let err = engine.place(request("Ana", "12", vec![])).await.unwrap_err();
        assert!(matches!(err, PlacementError::EmptyOrder));

        let err = engine
            .place(request("Ana", "12", vec![(coffee, "S", 0)]))
            .await
            .unwrap_err();
        assert!(matches!(err, PlacementError::InvalidQuantity { .. }));

        assert_eq!(stock_of(&db, coffee, "S").await, 5);
    }

    #[tokio::test]
    async fn test_same_seat_different_customers_get_separate_orders() {
        let (db, _dir) = test_db().await;
        let coffee = seed_item(&db, "Coffee", vec![("S", 2.0, 10)]).await;
        let engine = PlacementEngine::new(db.clone());

        let ana = engine
            .place(request("Ana", "12", vec![(coffee, "S", 1)]))
            .await
            .unwrap();
        let bob = engine
            .place(request("Bob", "12", vec![(coffee, "S", 2)]))
            .await
            .unwrap();

        assert_ne!(ana.id, bob.id);
        assert_eq!(stock_of(&db, coffee, "S").await, 7);
    }

    #[tokio::test]
    async fn test_duplicate_line_in_one_request_accumulates() {
        let (db, _dir) = test_db().await;
        let coffee = seed_item(&db, "Coffee", vec![("S", 2.0, 5)]).await;
        let engine = PlacementEngine::new(db.clone());

        let order = engine
            .place(request("Ana", "12", vec![(coffee, "S", 2), (coffee, "S", 1)]))
            .await
            .unwrap();

        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].quantity, 3);
        assert_eq!(stock_of(&db, coffee, "S").await, 2);
    }
}
