//! Product handlers: CRUD, the batch stock decrement, and the product-code
//! counter reset.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use souk_core::stock::StockLine;
use souk_core::validation::{
    validate_price_cents, validate_quantity, validate_required, validate_stock_batch,
};
use souk_db::{NewProduct, ProductPatch};

use crate::error::ApiResult;
use crate::response::ApiResponse;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProduct {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub name_ar: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub product_code: Option<String>,
    #[serde(default)]
    pub price_cents: i64,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub subcategory_id: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProduct {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub name_ar: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price_cents: Option<i64>,
    #[serde(default)]
    pub stock: Option<i64>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub subcategory_id: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecrementStock {
    #[serde(default)]
    pub items: Vec<StockLine>,
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateProduct>,
) -> ApiResult<impl IntoResponse> {
    let name = validate_required("name", body.name.as_deref().unwrap_or(""))?;
    validate_price_cents(body.price_cents)?;

    let product = state
        .db
        .products()
        .create(NewProduct {
            name,
            name_ar: body.name_ar,
            description: body.description,
            product_code: body.product_code,
            price_cents: body.price_cents,
            stock: body.stock.max(0),
            category_id: body.category_id,
            subcategory_id: body.subcategory_id,
            image_url: body.image_url,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(product))))
}

pub async fn list(State(state): State<Arc<AppState>>) -> ApiResult<impl IntoResponse> {
    let products = state.db.products().list().await?;
    let count = products.len() as u64;
    Ok(Json(ApiResponse::with_count(products, count)))
}

pub async fn get_one(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let product = state.db.products().get(&id).await?;
    Ok(Json(ApiResponse::ok(product)))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<UpdateProduct>,
) -> ApiResult<impl IntoResponse> {
    let name = match body.name {
        Some(name) => Some(validate_required("name", &name)?),
        None => None,
    };
    if let Some(cents) = body.price_cents {
        validate_price_cents(cents)?;
    }

    let product = state
        .db
        .products()
        .update(
            &id,
            ProductPatch {
                name,
                name_ar: body.name_ar,
                description: body.description,
                price_cents: body.price_cents,
                stock: body.stock,
                category_id: body.category_id,
                subcategory_id: body.subcategory_id,
                image_url: body.image_url,
            },
        )
        .await?;
    Ok(Json(ApiResponse::ok(product)))
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    state.db.products().delete(&id).await?;
    Ok(Json(ApiResponse::ok(json!({ "id": id }))))
}

/// Applies a batch of stock decrements in one transaction. Unmatched lines
/// are reported back, not failed; stock floors at zero.
pub async fn decrement_stock(
    State(state): State<Arc<AppState>>,
    Json(body): Json<DecrementStock>,
) -> ApiResult<impl IntoResponse> {
    validate_stock_batch(body.items.len())?;
    for line in &body.items {
        validate_quantity(line.quantity)?;
    }

    let outcome = state.db.products().decrement_stock(&body.items).await?;
    let count = outcome.count();
    Ok(Json(ApiResponse::with_count(outcome, count)))
}

/// Resets the product-code counter to zero; the next allocated code is
/// `P-000001`.
pub async fn reset_code_counter(State(state): State<Arc<AppState>>) -> ApiResult<impl IntoResponse> {
    let value = state.db.products().reset_code_counter().await?;
    info!("Reset product code counter");
    Ok(Json(ApiResponse::ok(json!({ "value": value }))))
}
