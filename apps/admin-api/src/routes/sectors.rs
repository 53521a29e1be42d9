//! Product sector handlers. Listing seeds the default sector set on an
//! empty collection; the image endpoint stores the upload and writes its
//! public URL onto the sector.

use std::sync::Arc;

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use souk_core::validation::validate_required;
use souk_db::SectorPatch;

use crate::error::{ApiError, ApiResult};
use crate::response::ApiResponse;
use crate::routes::uploads::extension_for;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSector {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub name_ar: Option<String>,
    #[serde(default)]
    pub display_order: i64,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSector {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub name_ar: Option<String>,
    #[serde(default)]
    pub display_order: Option<i64>,
    #[serde(default)]
    pub image_url: Option<String>,
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateSector>,
) -> ApiResult<impl IntoResponse> {
    let name = validate_required("name", body.name.as_deref().unwrap_or(""))?;
    let sector = state
        .db
        .sectors()
        .create(name, body.name_ar, body.display_order, body.image_url)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(sector))))
}

pub async fn list(State(state): State<Arc<AppState>>) -> ApiResult<impl IntoResponse> {
    let sectors = state.db.sectors().list().await?;
    let count = sectors.len() as u64;
    Ok(Json(ApiResponse::with_count(sectors, count)))
}

pub async fn get_one(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let sector = state.db.sectors().get(&id).await?;
    Ok(Json(ApiResponse::ok(sector)))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<UpdateSector>,
) -> ApiResult<impl IntoResponse> {
    let name = match body.name {
        Some(name) => Some(validate_required("name", &name)?),
        None => None,
    };
    let sector = state
        .db
        .sectors()
        .update(
            &id,
            SectorPatch {
                name,
                name_ar: body.name_ar,
                display_order: body.display_order,
                image_url: body.image_url,
            },
        )
        .await?;
    Ok(Json(ApiResponse::ok(sector)))
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    state.db.sectors().delete(&id).await?;
    Ok(Json(ApiResponse::ok(json!({ "id": id }))))
}

/// Stores an uploaded sector image and writes its public URL onto the
/// sector. Expects a single `image` part.
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> ApiResult<impl IntoResponse> {
    // 404 before reading the body when the sector doesn't exist.
    state.db.sectors().get(&id).await?;

    let mut stored = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some("image") {
            let content_type = field.content_type().map(str::to_string);
            let filename = field.file_name().map(str::to_string);
            let bytes = field.bytes().await?;
            let ext = extension_for(content_type.as_deref(), filename.as_deref());
            stored = Some((ext, bytes));
        }
    }

    let (ext, bytes) = stored
        .ok_or_else(|| ApiError::BadRequest("Missing 'image' part in multipart body".to_string()))?;

    let object = state.blobs.put_public("sectors", ext.as_deref(), &bytes).await?;
    let sector = state
        .db
        .sectors()
        .update(
            &id,
            SectorPatch {
                image_url: Some(object.public_url),
                ..SectorPatch::default()
            },
        )
        .await?;
    Ok(Json(ApiResponse::ok(sector)))
}
