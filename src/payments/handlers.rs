use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use time::{Duration, OffsetDateTime};
use tracing::{info, instrument};

use crate::{
    auth::jwt::AuthUser,
    error::ApiError,
    payments::{
        dto::{
            ConfirmResponse, ConfirmedPayment, CreatePixRequest, CreatePixResponse,
            CreatedPayment, PaymentHistoryEntry, PaymentStatusResponse, ProductSummary,
        },
        pix,
        repo::{Payment, PaymentStatus},
    },
    products::repo::Product,
    state::AppState,
};

const PIX_EXPIRY_MINUTES: i64 = 30;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/payments/pix", post(create_pix))
        .route("/payments/pix/:transaction_id/confirm", post(confirm_pix))
        .route("/payments/my-payments", get(my_payments))
        .route("/payments/status/:transaction_id", get(payment_status))
}

#[instrument(skip(state, body))]
pub async fn create_pix(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<CreatePixRequest>,
) -> Result<(StatusCode, Json<CreatePixResponse>), ApiError> {
    let (Some(product_id), Some(amount)) = (body.product_id, body.amount) else {
        return Err(ApiError::InvalidArgument(
            "Product id and amount are required".into(),
        ));
    };
    if amount <= 0.0 {
        return Err(ApiError::InvalidArgument(
            "Amount must be greater than zero".into(),
        ));
    }

    let product = Product::find_by_id(&state.db, product_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Product not found".into()))?;

    // The amount is taken from the caller as-is; it is not derived from the
    // stored price. Stock is left untouched.
    let transaction_id = pix::new_transaction_id();
    let pix_key = pix::new_pix_payload();
    let payment = Payment::create(
        &state.db,
        user_id,
        product.id,
        amount,
        &pix_key,
        &transaction_id,
        OffsetDateTime::now_utc(),
    )
    .await?;

    info!(user_id, transaction_id = %payment.transaction_id, "pix payment created");
    Ok((
        StatusCode::CREATED,
        Json(CreatePixResponse {
            message: "PIX payment created successfully".into(),
            payment: CreatedPayment {
                id: payment.id,
                transaction_id: payment.transaction_id,
                pix_key: payment.pix_key,
                amount: payment.amount,
                status: payment.status,
                product: ProductSummary {
                    id: product.id,
                    name: product.name,
                    price: product.price,
                },
                instructions: pix::PAYMENT_INSTRUCTIONS.into(),
                expires_at: payment.created_at + Duration::minutes(PIX_EXPIRY_MINUTES),
            },
        }),
    ))
}

#[instrument(skip(state))]
pub async fn confirm_pix(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(transaction_id): Path<String>,
) -> Result<Json<ConfirmResponse>, ApiError> {
    let payment = Payment::find_owned_with_product(&state.db, user_id, &transaction_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Payment not found".into()))?;

    if payment.status == PaymentStatus::Confirmed {
        return Err(ApiError::AlreadyConfirmed);
    }

    // The conditional update is the real guard; a caller that loses the race
    // to a concurrent confirm lands here with zero affected rows.
    if !Payment::confirm_pending(&state.db, user_id, &transaction_id).await? {
        return Err(ApiError::AlreadyConfirmed);
    }

    info!(user_id, %transaction_id, "pix payment confirmed");
    Ok(Json(ConfirmResponse {
        message: "Payment confirmed successfully".into(),
        payment: ConfirmedPayment {
            id: payment.id,
            transaction_id: payment.transaction_id,
            amount: payment.amount,
            status: PaymentStatus::Confirmed,
            product: payment.product_name,
            confirmed_at: OffsetDateTime::now_utc(),
        },
    }))
}

#[instrument(skip(state))]
pub async fn my_payments(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<PaymentHistoryEntry>>, ApiError> {
    let rows = Payment::list_for_user(&state.db, user_id).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

#[instrument(skip(state))]
pub async fn payment_status(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(transaction_id): Path<String>,
) -> Result<Json<PaymentStatusResponse>, ApiError> {
    let payment = Payment::find_owned(&state.db, user_id, &transaction_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Payment not found".into()))?;

    Ok(Json(PaymentStatusResponse {
        transaction_id: payment.transaction_id,
        status: payment.status,
        amount: payment.amount,
        created_at: payment.created_at,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::handlers::{login, register};
    use crate::auth::jwt::JwtKeys;
    use crate::products::handlers::create_product;
    use crate::products::repo::{fields, Product};
    use axum::extract::FromRef;

    async fn payment_count(state: &AppState) -> i64 {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM payments")
            .fetch_one(&state.db)
            .await
            .expect("count")
    }

    async fn seeded_user(state: &AppState, name: &str, email: &str, cpf: &str) -> i64 {
        crate::auth::repo::User::create(&state.db, name, email, cpf, "hash")
            .await
            .expect("create user")
            .id
    }

    fn buy(product_id: i64, amount: f64) -> CreatePixRequest {
        CreatePixRequest {
            product_id: Some(product_id),
            amount: Some(amount),
        }
    }

    #[tokio::test]
    async fn end_to_end_purchase_flow() {
        let state = AppState::for_tests().await;

        // Register and log in.
        let (status, Json(registered)) = register(
            State(state.clone()),
            Json(serde_json::from_value(serde_json::json!({
                "name": "Ana",
                "email": "ana@x.com",
                "cpf": "52998224725",
                "password": "segredo1"
            }))
            .expect("payload")),
        )
        .await
        .expect("register");
        assert_eq!(status, StatusCode::CREATED);

        let Json(logged_in) = login(
            State(state.clone()),
            Json(serde_json::from_value(serde_json::json!({
                "email": "ana@x.com",
                "password": "segredo1"
            }))
            .expect("payload")),
        )
        .await
        .expect("login");
        let keys = JwtKeys::from_ref(&state);
        let user_id = keys.verify(&logged_in.token).expect("token").sub;
        assert_eq!(user_id, registered.user.id);

        // Create the product being bought.
        let (_, Json(created)) = create_product(
            State(state.clone()),
            AuthUser(user_id),
            Json(serde_json::from_value(serde_json::json!({
                "name": "Widget",
                "price": 10.00,
                "stock": 5
            }))
            .expect("payload")),
        )
        .await
        .expect("create product");
        let product_id = created.product.id;

        // Buy it.
        let (status, Json(response)) = create_pix(
            State(state.clone()),
            AuthUser(user_id),
            Json(buy(product_id, 10.00)),
        )
        .await
        .expect("create payment");
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(response.payment.status, PaymentStatus::Pending);
        assert_eq!(response.payment.amount, 10.00);
        assert_eq!(response.payment.product.id, product_id);
        assert_eq!(response.payment.product.name, "Widget");
        assert_eq!(response.payment.product.price, 10.00);
        assert!(!response.payment.pix_key.is_empty());
        let transaction_id = response.payment.transaction_id.clone();

        // Confirm once, then observe the conflict on the second attempt.
        let Json(confirmed) = confirm_pix(
            State(state.clone()),
            AuthUser(user_id),
            Path(transaction_id.clone()),
        )
        .await
        .expect("confirm");
        assert_eq!(confirmed.payment.status, PaymentStatus::Confirmed);
        assert_eq!(confirmed.payment.product, "Widget");

        let err = confirm_pix(
            State(state.clone()),
            AuthUser(user_id),
            Path(transaction_id.clone()),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::AlreadyConfirmed));

        // History holds exactly one entry for the transaction, confirmed.
        let Json(history) = my_payments(State(state), AuthUser(user_id))
            .await
            .expect("history");
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].transaction_id, transaction_id);
        assert_eq!(history[0].status, PaymentStatus::Confirmed);
    }

    #[tokio::test]
    async fn create_rejects_non_positive_amounts_without_persisting() {
        let state = AppState::for_tests().await;
        let user_id = seeded_user(&state, "Ana", "ana@x.com", "52998224725").await;
        let product = Product::create(&state.db, &fields("Widget", 10.0, 5))
            .await
            .expect("create product");

        for amount in [0.0, -5.0] {
            let err = create_pix(
                State(state.clone()),
                AuthUser(user_id),
                Json(buy(product.id, amount)),
            )
            .await
            .unwrap_err();
            assert!(matches!(err, ApiError::InvalidArgument(_)));
        }
        assert_eq!(payment_count(&state).await, 0);
    }

    #[tokio::test]
    async fn create_rejects_missing_fields() {
        let state = AppState::for_tests().await;
        let user_id = seeded_user(&state, "Ana", "ana@x.com", "52998224725").await;

        let err = create_pix(
            State(state.clone()),
            AuthUser(user_id),
            Json(CreatePixRequest {
                product_id: None,
                amount: Some(10.0),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::InvalidArgument(_)));

        let err = create_pix(
            State(state.clone()),
            AuthUser(user_id),
            Json(CreatePixRequest {
                product_id: Some(1),
                amount: None,
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::InvalidArgument(_)));
        assert_eq!(payment_count(&state).await, 0);
    }

    #[tokio::test]
    async fn create_rejects_unknown_product() {
        let state = AppState::for_tests().await;
        let user_id = seeded_user(&state, "Ana", "ana@x.com", "52998224725").await;

        let err = create_pix(State(state.clone()), AuthUser(user_id), Json(buy(999, 10.0)))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
        assert_eq!(payment_count(&state).await, 0);
    }

    #[tokio::test]
    async fn create_trusts_the_caller_amount() {
        let state = AppState::for_tests().await;
        let user_id = seeded_user(&state, "Ana", "ana@x.com", "52998224725").await;
        let product = Product::create(&state.db, &fields("Widget", 10.0, 5))
            .await
            .expect("create product");

        let (_, Json(response)) = create_pix(
            State(state),
            AuthUser(user_id),
            Json(buy(product.id, 1.0)),
        )
        .await
        .expect("create payment");
        assert_eq!(response.payment.amount, 1.0);
        assert_eq!(response.payment.product.price, 10.0);
    }

    #[tokio::test]
    async fn confirm_and_status_reject_unknown_transactions() {
        let state = AppState::for_tests().await;
        let user_id = seeded_user(&state, "Ana", "ana@x.com", "52998224725").await;

        let err = confirm_pix(
            State(state.clone()),
            AuthUser(user_id),
            Path("no-such-transaction".to_string()),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));

        let err = payment_status(
            State(state),
            AuthUser(user_id),
            Path("no-such-transaction".to_string()),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn other_users_payments_are_invisible() {
        let state = AppState::for_tests().await;
        let owner = seeded_user(&state, "Ana", "ana@x.com", "52998224725").await;
        let stranger = seeded_user(&state, "Bia", "bia@x.com", "11144477735").await;
        let product = Product::create(&state.db, &fields("Widget", 10.0, 5))
            .await
            .expect("create product");

        let (_, Json(response)) = create_pix(
            State(state.clone()),
            AuthUser(owner),
            Json(buy(product.id, 10.0)),
        )
        .await
        .expect("create payment");
        let transaction_id = response.payment.transaction_id;

        let err = confirm_pix(
            State(state.clone()),
            AuthUser(stranger),
            Path(transaction_id.clone()),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));

        let err = payment_status(
            State(state.clone()),
            AuthUser(stranger),
            Path(transaction_id.clone()),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));

        let Json(history) = my_payments(State(state.clone()), AuthUser(stranger))
            .await
            .expect("history");
        assert!(history.is_empty());

        // Still pending and visible for the owner.
        let Json(status) = payment_status(State(state), AuthUser(owner), Path(transaction_id))
            .await
            .expect("status");
        assert_eq!(status.status, PaymentStatus::Pending);
    }

    #[tokio::test]
    async fn status_reports_the_stored_payment() {
        let state = AppState::for_tests().await;
        let user_id = seeded_user(&state, "Ana", "ana@x.com", "52998224725").await;
        let product = Product::create(&state.db, &fields("Widget", 10.0, 5))
            .await
            .expect("create product");

        let (_, Json(created)) = create_pix(
            State(state.clone()),
            AuthUser(user_id),
            Json(buy(product.id, 10.0)),
        )
        .await
        .expect("create payment");

        let Json(status) = payment_status(
            State(state),
            AuthUser(user_id),
            Path(created.payment.transaction_id.clone()),
        )
        .await
        .expect("status");
        assert_eq!(status.transaction_id, created.payment.transaction_id);
        assert_eq!(status.amount, 10.0);
        assert_eq!(status.status, PaymentStatus::Pending);
    }

    #[tokio::test]
    async fn expiry_is_thirty_minutes_after_creation() {
        let state = AppState::for_tests().await;
        let user_id = seeded_user(&state, "Ana", "ana@x.com", "52998224725").await;
        let product = Product::create(&state.db, &fields("Widget", 10.0, 5))
            .await
            .expect("create product");

        let (_, Json(created)) = create_pix(
            State(state.clone()),
            AuthUser(user_id),
            Json(buy(product.id, 10.0)),
        )
        .await
        .expect("create payment");

        let stored = Payment::find_owned(&state.db, user_id, &created.payment.transaction_id)
            .await
            .expect("query")
            .expect("present");
        assert_eq!(
            created.payment.expires_at,
            stored.created_at + Duration::minutes(30)
        );
    }
}
