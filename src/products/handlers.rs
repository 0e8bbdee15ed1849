use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::jwt::AuthUser,
    error::ApiError,
    products::{
        dto::{DeleteResponse, ProductInput, ProductResponse},
        repo::Product,
    },
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products))
        .route("/products/:id", get(get_product))
        .route("/products", post(create_product))
        .route("/products/:id", put(update_product))
        .route("/products/:id", delete(delete_product))
}

fn validate(input: &ProductInput) -> Result<(), ApiError> {
    if input.name.trim().is_empty() {
        return Err(ApiError::InvalidArgument("Name and price are required".into()));
    }
    if input.price <= 0.0 {
        return Err(ApiError::InvalidArgument(
            "Price must be greater than zero".into(),
        ));
    }
    if input.stock < 0 {
        return Err(ApiError::InvalidArgument("Stock must not be negative".into()));
    }
    Ok(())
}

#[instrument(skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>, ApiError> {
    Ok(Json(Product::list_all(&state.db).await?))
}

#[instrument(skip(state))]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Product>, ApiError> {
    let product = Product::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Product not found".into()))?;
    Ok(Json(product))
}

#[instrument(skip(state, input))]
pub async fn create_product(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(input): Json<ProductInput>,
) -> Result<(StatusCode, Json<ProductResponse>), ApiError> {
    validate(&input)?;
    let product = Product::create(&state.db, &input.into_fields()).await?;
    info!(user_id, product_id = product.id, "product created");
    Ok((
        StatusCode::CREATED,
        Json(ProductResponse {
            message: "Product created successfully".into(),
            product,
        }),
    ))
}

#[instrument(skip(state, input))]
pub async fn update_product(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
    Json(input): Json<ProductInput>,
) -> Result<Json<ProductResponse>, ApiError> {
    validate(&input)?;
    let product = Product::update(&state.db, id, &input.into_fields())
        .await?
        .ok_or_else(|| ApiError::NotFound("Product not found".into()))?;
    info!(user_id, product_id = product.id, "product updated");
    Ok(Json(ProductResponse {
        message: "Product updated successfully".into(),
        product,
    }))
}

#[instrument(skip(state))]
pub async fn delete_product(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let deleted = Product::delete(&state.db, id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound("Product not found".into()));
    }
    info!(user_id, product_id = id, "product deleted");
    Ok(Json(DeleteResponse {
        message: "Product deleted successfully".into(),
    }))
}
