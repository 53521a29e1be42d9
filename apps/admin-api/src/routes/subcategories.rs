//! Subcategory handlers.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use souk_core::validation::validate_required;

use crate::error::ApiResult;
use crate::response::ApiResponse;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubcategory {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub name_ar: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSubcategory {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub name_ar: Option<String>,
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateSubcategory>,
) -> ApiResult<impl IntoResponse> {
    let name = validate_required("name", body.name.as_deref().unwrap_or(""))?;
    let category_id = validate_required("categoryId", body.category_id.as_deref().unwrap_or(""))?;
    let sub = state
        .db
        .catalog()
        .create_subcategory(name, body.name_ar, category_id)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(sub))))
}

pub async fn list(State(state): State<Arc<AppState>>) -> ApiResult<impl IntoResponse> {
    let subs = state.db.catalog().list_subcategories().await?;
    let count = subs.len() as u64;
    Ok(Json(ApiResponse::with_count(subs, count)))
}

pub async fn get_one(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let sub = state.db.catalog().get_subcategory(&id).await?;
    Ok(Json(ApiResponse::ok(sub)))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<UpdateSubcategory>,
) -> ApiResult<impl IntoResponse> {
    let name = match body.name {
        Some(name) => Some(validate_required("name", &name)?),
        None => None,
    };
    let sub = state
        .db
        .catalog()
        .update_subcategory(&id, name, body.name_ar)
        .await?;
    Ok(Json(ApiResponse::ok(sub)))
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    state.db.catalog().delete_subcategory(&id).await?;
    Ok(Json(ApiResponse::ok(json!({ "id": id }))))
}
