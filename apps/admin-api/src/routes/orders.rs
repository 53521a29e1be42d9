//! Special order handlers.
//!
//! Orders enter in `pending`; the status endpoint enforces the workflow
//! (`pending → approved | rejected`, `approved → sent`) before writing.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use souk_core::error::{CoreError, ValidationError};
use souk_core::types::{OrderItem, OrderStatus};
use souk_core::validation::{validate_quantity, validate_required};
use souk_db::{NewOrder, OrderPatch};

use crate::error::{ApiError, ApiResult};
use crate::response::ApiResponse;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrder {
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrder {
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub items: Option<Vec<OrderItem>>,
}

#[derive(Debug, Deserialize)]
pub struct SetStatus {
    pub status: String,
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateOrder>,
) -> ApiResult<impl IntoResponse> {
    let customer_name =
        validate_required("customerName", body.customer_name.as_deref().unwrap_or(""))?;
    let phone = validate_required("phone", body.phone.as_deref().unwrap_or(""))?;
    for item in &body.items {
        validate_quantity(item.quantity)?;
    }

    let order = state
        .db
        .orders()
        .create(NewOrder {
            customer_name,
            phone,
            email: body.email,
            notes: body.notes,
            items: body.items,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(order))))
}

pub async fn list(State(state): State<Arc<AppState>>) -> ApiResult<impl IntoResponse> {
    let orders = state.db.orders().list().await?;
    let count = orders.len() as u64;
    Ok(Json(ApiResponse::with_count(orders, count)))
}

pub async fn get_one(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let order = state.db.orders().get(&id).await?;
    Ok(Json(ApiResponse::ok(order)))
}

/// Updates an order's contact fields, notes, or items. The status is not
/// touched here; it only moves through the status endpoint.
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<UpdateOrder>,
) -> ApiResult<impl IntoResponse> {
    let customer_name = match body.customer_name {
        Some(name) => Some(validate_required("customerName", &name)?),
        None => None,
    };
    let phone = match body.phone {
        Some(phone) => Some(validate_required("phone", &phone)?),
        None => None,
    };
    if let Some(items) = &body.items {
        for item in items {
            validate_quantity(item.quantity)?;
        }
    }

    let order = state
        .db
        .orders()
        .update(
            &id,
            OrderPatch {
                customer_name,
                phone,
                email: body.email,
                notes: body.notes,
                items: body.items,
            },
        )
        .await?;
    Ok(Json(ApiResponse::ok(order)))
}

pub async fn set_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<SetStatus>,
) -> ApiResult<impl IntoResponse> {
    let requested = OrderStatus::parse(&body.status).ok_or_else(|| {
        ApiError::Validation(ValidationError::InvalidFormat {
            field: "status".to_string(),
            reason: format!("unknown status '{}'", body.status),
        })
    })?;

    let order = state.db.orders().get(&id).await?;
    if !order.status.can_transition(requested) {
        return Err(ApiError::Core(CoreError::InvalidStatusTransition {
            order_id: id,
            current: order.status.as_str().to_string(),
            requested: requested.as_str().to_string(),
        }));
    }

    let order = state.db.orders().set_status(&id, requested).await?;
    info!(id = %order.id, status = %order.status.as_str(), "Order status changed");
    Ok(Json(ApiResponse::ok(order)))
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    state.db.orders().delete(&id).await?;
    Ok(Json(ApiResponse::ok(json!({ "id": id }))))
}
