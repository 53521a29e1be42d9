//! Main category handlers, including the tree-rebuild migration endpoint.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use souk_core::validation::validate_required;

use crate::error::ApiResult;
use crate::response::ApiResponse;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MainCategoryBody {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub name_ar: Option<String>,
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(body): Json<MainCategoryBody>,
) -> ApiResult<impl IntoResponse> {
    let name = validate_required("name", body.name.as_deref().unwrap_or(""))?;
    let main = state.db.catalog().create_main(name, body.name_ar).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(main))))
}

pub async fn list(State(state): State<Arc<AppState>>) -> ApiResult<impl IntoResponse> {
    let mains = state.db.catalog().list_mains().await?;
    let count = mains.len() as u64;
    Ok(Json(ApiResponse::with_count(mains, count)))
}

pub async fn get_one(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let main = state.db.catalog().get_main(&id).await?;
    Ok(Json(ApiResponse::ok(main)))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<MainCategoryBody>,
) -> ApiResult<impl IntoResponse> {
    let name = match body.name {
        Some(name) => Some(validate_required("name", &name)?),
        None => None,
    };
    let main = state
        .db
        .catalog()
        .update_main(&id, name, body.name_ar)
        .await?;
    Ok(Json(ApiResponse::ok(main)))
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    state.db.catalog().delete_main(&id).await?;
    Ok(Json(ApiResponse::ok(json!({ "id": id }))))
}

/// Rebuilds every main category's denormalized `children`/`subchildren`
/// caches from the relational collections. Idempotent; safe to re-run.
pub async fn migrate(State(state): State<Arc<AppState>>) -> ApiResult<impl IntoResponse> {
    let updated = state.db.catalog().rebuild_tree().await?;
    info!(updated, "Rebuilt category tree caches");
    Ok(Json(ApiResponse::with_count(
        json!({ "updated": updated }),
        updated,
    )))
}
