use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use time::OffsetDateTime;

/// Payment lifecycle. `pending -> confirmed` is the only transition any code
/// path performs; `failed` is reserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Confirmed,
    Failed,
}

#[derive(Debug, Clone, FromRow)]
pub struct Payment {
    pub id: i64,
    pub user_id: i64,
    pub product_id: i64,
    pub amount: f64,
    pub payment_method: String,
    pub pix_key: String,
    pub transaction_id: String,
    pub status: PaymentStatus,
    pub created_at: OffsetDateTime,
}

/// Payment row joined with the referenced product's current name and price.
#[derive(Debug, Clone, FromRow)]
pub struct PaymentWithProduct {
    pub id: i64,
    pub user_id: i64,
    pub product_id: i64,
    pub amount: f64,
    pub payment_method: String,
    pub pix_key: String,
    pub transaction_id: String,
    pub status: PaymentStatus,
    pub created_at: OffsetDateTime,
    pub product_name: String,
    pub product_price: f64,
}

impl Payment {
    pub async fn create(
        db: &SqlitePool,
        user_id: i64,
        product_id: i64,
        amount: f64,
        pix_key: &str,
        transaction_id: &str,
        created_at: OffsetDateTime,
    ) -> sqlx::Result<Payment> {
        sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO payments
                (user_id, product_id, amount, payment_method, pix_key, transaction_id, status, created_at)
            VALUES (?, ?, ?, 'pix', ?, ?, 'pending', ?)
            RETURNING id, user_id, product_id, amount, payment_method, pix_key,
                      transaction_id, status, created_at
            "#,
        )
        .bind(user_id)
        .bind(product_id)
        .bind(amount)
        .bind(pix_key)
        .bind(transaction_id)
        .bind(created_at)
        .fetch_one(db)
        .await
    }

    /// Ownership is part of the lookup itself: a transaction belonging to
    /// another user is indistinguishable from one that does not exist.
    pub async fn find_owned(
        db: &SqlitePool,
        user_id: i64,
        transaction_id: &str,
    ) -> sqlx::Result<Option<Payment>> {
        sqlx::query_as::<_, Payment>(
            r#"
            SELECT id, user_id, product_id, amount, payment_method, pix_key,
                   transaction_id, status, created_at
            FROM payments
            WHERE transaction_id = ? AND user_id = ?
            "#,
        )
        .bind(transaction_id)
        .bind(user_id)
        .fetch_optional(db)
        .await
    }

    pub async fn find_owned_with_product(
        db: &SqlitePool,
        user_id: i64,
        transaction_id: &str,
    ) -> sqlx::Result<Option<PaymentWithProduct>> {
        sqlx::query_as::<_, PaymentWithProduct>(
            r#"
            SELECT p.id, p.user_id, p.product_id, p.amount, p.payment_method, p.pix_key,
                   p.transaction_id, p.status, p.created_at,
                   pr.name AS product_name, pr.price AS product_price
            FROM payments p
            JOIN products pr ON pr.id = p.product_id
            WHERE p.transaction_id = ? AND p.user_id = ?
            "#,
        )
        .bind(transaction_id)
        .bind(user_id)
        .fetch_optional(db)
        .await
    }

    /// Single conditional update: flips `pending` to `confirmed` and reports
    /// whether this call won. Concurrent confirmations of the same
    /// transaction race on the status predicate, so exactly one caller
    /// observes `true`.
    pub async fn confirm_pending(
        db: &SqlitePool,
        user_id: i64,
        transaction_id: &str,
    ) -> sqlx::Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE payments
            SET status = 'confirmed'
            WHERE transaction_id = ? AND user_id = ? AND status = 'pending'
            "#,
        )
        .bind(transaction_id)
        .bind(user_id)
        .execute(db)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Payment history, most recent first, joined live with the product's
    /// current name and price rather than a snapshot taken at purchase time.
    pub async fn list_for_user(
        db: &SqlitePool,
        user_id: i64,
    ) -> sqlx::Result<Vec<PaymentWithProduct>> {
        sqlx::query_as::<_, PaymentWithProduct>(
            r#"
            SELECT p.id, p.user_id, p.product_id, p.amount, p.payment_method, p.pix_key,
                   p.transaction_id, p.status, p.created_at,
                   pr.name AS product_name, pr.price AS product_price
            FROM payments p
            JOIN products pr ON pr.id = p.product_id
            WHERE p.user_id = ?
            ORDER BY p.created_at DESC, p.id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await
    }
}
