//! Category handlers. Creates and renames keep the parent main category's
//! `children`/`subchildren` caches in sync (the repository does the cache
//! writes transactionally).

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
pub struct CreateCategory {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub name_ar: Option<String>,
    #[serde(default)]
    pub main_category_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategory {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub name_ar: Option<String>,
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateCategory>,
) -> ApiResult<impl IntoResponse> {
    let name = validate_required("name", body.name.as_deref().unwrap_or(""))?;
    let main_id = validate_required(
        "mainCategoryId",
        body.main_category_id.as_deref().unwrap_or(""),
    )?;
    let category = state
        .db
        .catalog()
        .create_category(name, body.name_ar, main_id)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(category))))
}

pub async fn list(State(state): State<Arc<AppState>>) -> ApiResult<impl IntoResponse> {
    let categories = state.db.catalog().list_categories().await?;
    let count = categories.len() as u64;
    Ok(Json(ApiResponse::with_count(categories, count)))
}

pub async fn get_one(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let category = state.db.catalog().get_category(&id).await?;
    Ok(Json(ApiResponse::ok(category)))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<UpdateCategory>,
) -> ApiResult<impl IntoResponse> {
    let name = match body.name {
        Some(name) => Some(validate_required("name", &name)?),
        None => None,
    };
    let category = state
        .db
        .catalog()
        .update_category(&id, name, body.name_ar)
        .await?;
    Ok(Json(ApiResponse::ok(category)))
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    state.db.catalog().delete_category(&id).await?;
    Ok(Json(ApiResponse::ok(json!({ "id": id }))))
}
