use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::payments::repo::{PaymentStatus, PaymentWithProduct};

/// Request body for creating a PIX payment. Both fields are optional at the
/// serde layer so that missing values surface as a 400 with the catalog
/// error envelope instead of a deserialization rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePixRequest {
    pub product_id: Option<i64>,
    pub amount: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub id: i64,
    pub name: String,
    pub price: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedPayment {
    pub id: i64,
    pub transaction_id: String,
    pub pix_key: String,
    pub amount: f64,
    pub status: PaymentStatus,
    pub product: ProductSummary,
    pub instructions: String,
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
}

#[derive(Debug, Serialize)]
pub struct CreatePixResponse {
    pub message: String,
    pub payment: CreatedPayment,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmedPayment {
    pub id: i64,
    pub transaction_id: String,
    pub amount: f64,
    pub status: PaymentStatus,
    pub product: String,
    #[serde(with = "time::serde::rfc3339")]
    pub confirmed_at: OffsetDateTime,
}

#[derive(Debug, Serialize)]
pub struct ConfirmResponse {
    pub message: String,
    pub payment: ConfirmedPayment,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentHistoryEntry {
    pub id: i64,
    pub transaction_id: String,
    pub amount: f64,
    pub status: PaymentStatus,
    pub payment_method: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub product: ProductSummary,
}

impl From<PaymentWithProduct> for PaymentHistoryEntry {
    fn from(row: PaymentWithProduct) -> Self {
        Self {
            id: row.id,
            transaction_id: row.transaction_id,
            amount: row.amount,
            status: row.status,
            payment_method: row.payment_method,
            created_at: row.created_at,
            product: ProductSummary {
                id: row.product_id,
                name: row.product_name,
                price: row.product_price,
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatusResponse {
    pub transaction_id: String,
    pub status: PaymentStatus,
    pub amount: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
