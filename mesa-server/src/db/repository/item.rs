//! Item Repository (inventory store)
//!
//! Items are matched case-insensitively by name; variant sizes are
//! uppercased. Upserting an existing item replaces variant prices and
//! increments stock; unseen sizes are appended in submission order.

use super::{RepoError, RepoResult};
use crate::db::DbService;
use shared::models::item::{display_name, name_key, normalize_size};
use shared::models::{Category, Item, ItemUpsert, Variant};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqliteConnection;

/// Flat `items` row; variants are joined in by the fetch helpers
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct ItemRow {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl ItemRow {
    fn into_item(self, variants: Vec<Variant>) -> RepoResult<Item> {
        let category = Category::parse(&self.category)
            .ok_or_else(|| RepoError::Database(format!("corrupt category: {}", self.category)))?;
        Ok(Item {
            id: self.id,
            name: self.name,
            category,
            variants,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

// =============================================================================
// Row-level helpers (composable inside a caller-owned transaction)
// =============================================================================

pub(crate) async fn fetch_item_row(
    conn: &mut SqliteConnection,
    id: i64,
) -> RepoResult<Option<ItemRow>> {
    let row = sqlx::query_as::<_, ItemRow>(
        "SELECT id, name, category, created_at, updated_at FROM items WHERE id = ?1",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(row)
}

pub(crate) async fn fetch_variants(
    conn: &mut SqliteConnection,
    item_id: i64,
) -> RepoResult<Vec<Variant>> {
    let variants = sqlx::query_as::<_, Variant>(
        "SELECT size, price, stock FROM item_variants WHERE item_id = ?1 ORDER BY position",
    )
    .bind(item_id)
    .fetch_all(&mut *conn)
    .await?;
    Ok(variants)
}

pub(crate) async fn fetch_variant(
    conn: &mut SqliteConnection,
    item_id: i64,
    size: &str,
) -> RepoResult<Option<Variant>> {
    let variant = sqlx::query_as::<_, Variant>(
        "SELECT size, price, stock FROM item_variants WHERE item_id = ?1 AND size = ?2",
    )
    .bind(item_id)
    .bind(size)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(variant)
}

pub(crate) async fn fetch_item(conn: &mut SqliteConnection, id: i64) -> RepoResult<Option<Item>> {
    let Some(row) = fetch_item_row(&mut *conn, id).await? else {
        return Ok(None);
    };
    let variants = fetch_variants(&mut *conn, row.id).await?;
    Ok(Some(row.into_item(variants)?))
}

/// Conditionally decrement a variant's stock.
///
/// The `stock >= quantity` guard makes check-and-decrement one atomic
/// statement; returns the number of rows affected (0 means the variant is
/// missing or short on stock — the caller probes to tell the two apart).
pub(crate) async fn decrement_stock(
    conn: &mut SqliteConnection,
    item_id: i64,
    size: &str,
    quantity: i64,
) -> RepoResult<u64> {
    let affected = sqlx::query(
        "UPDATE item_variants SET stock = stock - ?1 \
         WHERE item_id = ?2 AND size = ?3 AND stock >= ?1",
    )
    .bind(quantity)
    .bind(item_id)
    .bind(size)
    .execute(&mut *conn)
    .await?
    .rows_affected();
    Ok(affected)
}

/// Merge one submitted variant into an item: replace price and add stock on
/// a size match, append as a new variant otherwise.
async fn merge_variant(
    conn: &mut SqliteConnection,
    item_id: i64,
    size: &str,
    price: f64,
    stock: i64,
) -> RepoResult<()> {
    let updated = sqlx::query(
        "UPDATE item_variants SET price = ?1, stock = stock + ?2 \
         WHERE item_id = ?3 AND size = ?4",
    )
    .bind(price)
    .bind(stock)
    .bind(item_id)
    .bind(size)
    .execute(&mut *conn)
    .await?
    .rows_affected();

    if updated == 0 {
        let position: i64 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(position) + 1, 0) FROM item_variants WHERE item_id = ?1",
        )
        .bind(item_id)
        .fetch_one(&mut *conn)
        .await?;
        sqlx::query(
            "INSERT INTO item_variants (item_id, size, price, stock, position) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(item_id)
        .bind(size)
        .bind(price)
        .bind(stock)
        .bind(position)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

// =============================================================================
// Item Repository
// =============================================================================

#[derive(Clone)]
pub struct ItemRepository {
    db: DbService,
}

impl ItemRepository {
    pub fn new(db: DbService) -> Self {
        Self { db }
    }

    /// Add or update an item (§ inventory contract)
    ///
    /// Creates the item on first submission for a new name; on repeat
    /// submission the variants are merged. Runs as one transaction under
    /// the write lock.
    pub async fn upsert(&self, input: ItemUpsert) -> RepoResult<Item> {
        let key = name_key(&input.name);
        if key.is_empty() {
            return Err(RepoError::Validation("name must not be empty".into()));
        }
        let category = Category::parse(input.category.trim())
            .ok_or_else(|| RepoError::InvalidCategory(input.category.clone()))?;
        if input.variants.is_empty() {
            return Err(RepoError::Validation("variants must not be empty".into()));
        }
        for v in &input.variants {
            let size = normalize_size(&v.size);
            if size.is_empty() {
                return Err(RepoError::Validation("variant size must not be empty".into()));
            }
            if !v.price.is_finite() || v.price < 0.0 {
                return Err(RepoError::InvalidPrice { size });
            }
            if v.stock < 0 {
                return Err(RepoError::InvalidStock { size });
            }
        }

        let _guard = self.db.write().await;
        let mut tx = self.db.pool.begin().await?;

        let existing = sqlx::query_as::<_, ItemRow>(
            "SELECT id, name, category, created_at, updated_at FROM items WHERE name_key = ?1",
        )
        .bind(&key)
        .fetch_optional(&mut *tx)
        .await?;

        let now = now_millis();
        let (item_id, created) = match existing {
            Some(row) => {
                sqlx::query("UPDATE items SET updated_at = ?1 WHERE id = ?2")
                    .bind(now)
                    .bind(row.id)
                    .execute(&mut *tx)
                    .await?;
                (row.id, false)
            }
            None => {
                let id = snowflake_id();
                sqlx::query(
                    "INSERT INTO items (id, name, name_key, category, created_at, updated_at) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                )
                .bind(id)
                .bind(display_name(&input.name))
                .bind(&key)
                .bind(category.as_str())
                .bind(now)
                .bind(now)
                .execute(&mut *tx)
                .await?;
                (id, true)
            }
        };

        for v in &input.variants {
            merge_variant(&mut tx, item_id, &normalize_size(&v.size), v.price, v.stock).await?;
        }

        let item = fetch_item(&mut tx, item_id)
            .await?
            .ok_or_else(|| RepoError::Database("item vanished during upsert".into()))?;

        tx.commit().await?;
        tracing::info!(
            item_id,
            name = %item.name,
            created,
            variants = item.variants.len(),
            "Item upserted"
        );
        Ok(item)
    }

    /// All items with their variants, oldest first
    pub async fn find_all(&self) -> RepoResult<Vec<Item>> {
        let mut conn = self.db.pool.acquire().await?;
        let rows = sqlx::query_as::<_, ItemRow>(
            "SELECT id, name, category, created_at, updated_at FROM items ORDER BY created_at, id",
        )
        .fetch_all(&mut *conn)
        .await?;

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            let variants = fetch_variants(&mut conn, row.id).await?;
            items.push(row.into_item(variants)?);
        }
        Ok(items)
    }

    pub async fn find_by_id(&self, id: i64) -> RepoResult<Option<Item>> {
        let mut conn = self.db.pool.acquire().await?;
        fetch_item(&mut conn, id).await
    }

    /// Look up a single variant; NotFound distinguishes missing item from
    /// missing size
    pub async fn find_variant(&self, item_id: i64, size: &str) -> RepoResult<Variant> {
        let size = normalize_size(size);
        let mut conn = self.db.pool.acquire().await?;
        match fetch_variant(&mut conn, item_id, &size).await? {
            Some(variant) => Ok(variant),
            None => {
                if fetch_item_row(&mut conn, item_id).await?.is_some() {
                    Err(RepoError::VariantNotFound { item_id, size })
                } else {
                    Err(RepoError::ItemNotFound(item_id))
                }
            }
        }
    }

    /// Apply a stock delta (positive or negative) to a variant
    ///
    /// Fails with InsufficientStock if the resulting stock would go
    /// negative; the guard clause keeps check-and-apply atomic.
    pub async fn adjust_stock(&self, item_id: i64, size: &str, delta: i64) -> RepoResult<Variant> {
        let size = normalize_size(size);
        let _guard = self.db.write().await;
        let mut conn = self.db.pool.acquire().await?;

        let affected = sqlx::query(
            "UPDATE item_variants SET stock = stock + ?1 \
             WHERE item_id = ?2 AND size = ?3 AND stock + ?1 >= 0",
        )
        .bind(delta)
        .bind(item_id)
        .bind(&size)
        .execute(&mut *conn)
        .await?
        .rows_affected();

        if affected == 0 {
            return match fetch_variant(&mut conn, item_id, &size).await? {
                Some(_) => {
                    let row = fetch_item_row(&mut conn, item_id).await?;
                    let item = row.map(|r| r.name).unwrap_or_else(|| item_id.to_string());
                    Err(RepoError::InsufficientStock { item, size })
                }
                None => {
                    if fetch_item_row(&mut conn, item_id).await?.is_some() {
                        Err(RepoError::VariantNotFound { item_id, size })
                    } else {
                        Err(RepoError::ItemNotFound(item_id))
                    }
                }
            };
        }

        fetch_variant(&mut conn, item_id, &size)
            .await?
            .ok_or_else(|| RepoError::Database("variant vanished during adjust".into()))
    }
}
