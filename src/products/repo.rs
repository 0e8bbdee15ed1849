use serde::Serialize;
use sqlx::{FromRow, SqlitePool};
use time::OffsetDateTime;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image_url: String,
    pub category: String,
    pub stock: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Write-side fields shared by create and update.
#[derive(Debug, Clone)]
pub struct ProductFields {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image_url: String,
    pub category: String,
    pub stock: i64,
}

impl Product {
    pub async fn list_all(db: &SqlitePool) -> sqlx::Result<Vec<Product>> {
        sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, price, image_url, category, stock, created_at
            FROM products
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(db)
        .await
    }

    pub async fn find_by_id(db: &SqlitePool, id: i64) -> sqlx::Result<Option<Product>> {
        sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, price, image_url, category, stock, created_at
            FROM products
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    pub async fn create(db: &SqlitePool, fields: &ProductFields) -> sqlx::Result<Product> {
        sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, description, price, image_url, category, stock, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING id, name, description, price, image_url, category, stock, created_at
            "#,
        )
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(fields.price)
        .bind(&fields.image_url)
        .bind(&fields.category)
        .bind(fields.stock)
        .bind(OffsetDateTime::now_utc())
        .fetch_one(db)
        .await
    }

    /// Returns the updated row, or `None` when no product has this id.
    pub async fn update(
        db: &SqlitePool,
        id: i64,
        fields: &ProductFields,
    ) -> sqlx::Result<Option<Product>> {
        sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET name = ?, description = ?, price = ?, image_url = ?, category = ?, stock = ?
            WHERE id = ?
            RETURNING id, name, description, price, image_url, category, stock, created_at
            "#,
        )
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(fields.price)
        .bind(&fields.image_url)
        .bind(&fields.category)
        .bind(fields.stock)
        .bind(id)
        .fetch_optional(db)
        .await
    }

    /// Reports how many rows were deleted so the caller can distinguish
    /// "not found" from "deleted".
    pub async fn delete(db: &SqlitePool, id: i64) -> sqlx::Result<u64> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
pub(crate) fn fields(name: &str, price: f64, stock: i64) -> ProductFields {
    ProductFields {
        name: name.into(),
        description: String::new(),
        price,
        image_url: String::new(),
        category: "General".into(),
        stock,
    }
}
