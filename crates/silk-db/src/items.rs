//! Item repository for the catalog store.
//!
//! Each mutation is a single statement. Name uniqueness is enforced by the
//! table constraint and surfaces as `ShopError::DuplicateName`.

use silk_core::{Item, ItemUpdate, NewItem, ShopError};
use sqlx::{FromRow, SqlitePool};
use tracing::{debug, info};

use crate::{db_error, is_unique_violation};

#[derive(Debug, FromRow)]
struct ItemRow {
    id: i64,
    name: String,
    image: String,
    price: f64,
    price_id: String,
}

impl From<ItemRow> for Item {
    fn from(row: ItemRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            image: row.image,
            price: row.price,
            price_id: row.price_id,
        }
    }
}

/// Repository for `items` table operations.
pub struct ItemRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ItemRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List every item in insertion order.
    pub async fn list(&self) -> Result<Vec<Item>, ShopError> {
        let rows = sqlx::query_as::<_, ItemRow>(
            "SELECT id, name, image, price, price_id FROM items ORDER BY id",
        )
        .fetch_all(self.pool)
        .await
        .map_err(db_error)?;

        Ok(rows.into_iter().map(Item::from).collect())
    }

    pub async fn count(&self) -> Result<i64, ShopError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM items")
            .fetch_one(self.pool)
            .await
            .map_err(db_error)?;
        Ok(count)
    }

    /// Get an item by id.
    ///
    /// # Errors
    ///
    /// Returns `ShopError::ItemNotFound` if no row has this id.
    pub async fn get(&self, id: i64) -> Result<Item, ShopError> {
        sqlx::query_as::<_, ItemRow>(
            "SELECT id, name, image, price, price_id FROM items WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(db_error)?
        .map(Item::from)
        .ok_or(ShopError::ItemNotFound { id })
    }

    /// Items whose name contains `term`. A blank term matches everything.
    pub async fn search(&self, term: &str) -> Result<Vec<Item>, ShopError> {
        let term = term.trim();
        if term.is_empty() {
            return self.list().await;
        }

        let pattern = format!("%{}%", escape_like(term));
        debug!("Searching items with pattern {}", pattern);

        let rows = sqlx::query_as::<_, ItemRow>(
            r"SELECT id, name, image, price, price_id FROM items WHERE name LIKE ? ESCAPE '\' ORDER BY id",
        )
        .bind(pattern)
        .fetch_all(self.pool)
        .await
        .map_err(db_error)?;

        Ok(rows.into_iter().map(Item::from).collect())
    }

    /// Insert a new item and return it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns `ShopError::DuplicateName` if the name is taken.
    pub async fn create(&self, item: &NewItem) -> Result<Item, ShopError> {
        item.validate()?;

        let row = sqlx::query_as::<_, ItemRow>(
            r#"
            INSERT INTO items (name, image, price, price_id)
            VALUES (?, ?, ?, ?)
            RETURNING id, name, image, price, price_id
            "#,
        )
        .bind(&item.name)
        .bind(&item.image)
        .bind(item.price)
        .bind(&item.price_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| name_conflict(e, &item.name))?;

        info!("Created item id={} name={}", row.id, row.name);
        Ok(row.into())
    }

    /// Apply a partial update to one item.
    ///
    /// A single statement, so concurrent edits resolve last-writer-wins.
    /// An empty update writes nothing and returns the stored item.
    ///
    /// # Errors
    ///
    /// Returns `ShopError::ItemNotFound` for an unknown id and
    /// `ShopError::DuplicateName` if renaming onto an existing name.
    pub async fn update(&self, id: i64, update: &ItemUpdate) -> Result<Item, ShopError> {
        update.validate()?;
        if update.is_empty() {
            return self.get(id).await;
        }

        let row = sqlx::query_as::<_, ItemRow>(
            r#"
            UPDATE items
            SET name = COALESCE(?, name),
                image = COALESCE(?, image),
                price = COALESCE(?, price)
            WHERE id = ?
            RETURNING id, name, image, price, price_id
            "#,
        )
        .bind(update.name.as_deref())
        .bind(update.image.as_deref())
        .bind(update.price)
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| name_conflict(e, update.name.as_deref().unwrap_or_default()))?
        .ok_or(ShopError::ItemNotFound { id })?;

        info!("Updated item id={}", id);
        Ok(row.into())
    }

    /// Delete one item by id.
    ///
    /// # Errors
    ///
    /// Returns `ShopError::ItemNotFound` if nothing was deleted.
    pub async fn delete(&self, id: i64) -> Result<(), ShopError> {
        let result = sqlx::query("DELETE FROM items WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(ShopError::ItemNotFound { id });
        }

        info!("Deleted item id={}", id);
        Ok(())
    }
}

fn name_conflict(e: sqlx::Error, name: &str) -> ShopError {
    if is_unique_violation(&e) {
        return ShopError::DuplicateName {
            name: name.to_string(),
        };
    }
    db_error(e)
}

/// Escape LIKE wildcards so the term matches literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
