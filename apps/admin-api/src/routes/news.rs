//! News handlers.
//!
//! Create and update accept either `multipart/form-data` (text parts plus an
//! optional `coverImage` file, which is stored in the blob bucket and
//! replaced by its public URL) or a plain JSON body carrying an already
//! uploaded `coverImageUrl`. The `coverImage` part is the one upload in the
//! API with an enforced `image/*` content type.

use std::sync::Arc;

use axum::extract::{FromRequest, Multipart, Path, Request, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use bytes::Bytes;
use serde::Deserialize;
use serde_json::json;

use souk_core::validation::{validate_image_mime, validate_required};
use souk_db::NewsPatch;

use crate::error::{ApiError, ApiResult};
use crate::response::ApiResponse;
use crate::routes::uploads::extension_for;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsBody {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub cover_image_url: Option<String>,
}

/// A pending cover-image upload pulled out of a multipart body.
struct CoverUpload {
    ext: Option<String>,
    bytes: Bytes,
}

/// Parses either body flavor into the common field set plus an optional
/// not-yet-stored cover image.
async fn parse_body(req: Request) -> ApiResult<(NewsBody, Option<CoverUpload>)> {
    let is_multipart = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.starts_with("multipart/form-data"))
        .unwrap_or(false);

    if !is_multipart {
        let Json(body) = Json::<NewsBody>::from_request(req, &())
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.to_string()))?;
        return Ok((body, None));
    }

    let mut multipart = Multipart::from_request(req, &())
        .await
        .map_err(|rejection| ApiError::BadRequest(rejection.to_string()))?;

    let mut body = NewsBody::default();
    let mut cover = None;

    while let Some(field) = multipart.next_field().await? {
        match field.name() {
            Some("title") => body.title = Some(field.text().await?),
            Some("body") => body.body = Some(field.text().await?),
            Some("category") => body.category = Some(field.text().await?),
            Some("coverImage") => {
                let content_type = field.content_type().map(str::to_string);
                validate_image_mime(content_type.as_deref())?;
                let filename = field.file_name().map(str::to_string);
                let bytes = field.bytes().await?;
                cover = Some(CoverUpload {
                    ext: extension_for(content_type.as_deref(), filename.as_deref()),
                    bytes,
                });
            }
            _ => {}
        }
    }

    Ok((body, cover))
}

async fn store_cover(state: &AppState, cover: CoverUpload) -> ApiResult<String> {
    let object = state
        .blobs
        .put_public("news", cover.ext.as_deref(), &cover.bytes)
        .await?;
    Ok(object.public_url)
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    req: Request,
) -> ApiResult<impl IntoResponse> {
    let (body, cover) = parse_body(req).await?;

    let title = validate_required("title", body.title.as_deref().unwrap_or(""))?;
    let text = validate_required("body", body.body.as_deref().unwrap_or(""))?;
    let category = validate_required("category", body.category.as_deref().unwrap_or(""))?;

    let cover_image_url = match cover {
        Some(cover) => Some(store_cover(&state, cover).await?),
        None => body.cover_image_url,
    };

    let item = state
        .db
        .news()
        .create(title, text, category, cover_image_url)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(item))))
}

pub async fn list(State(state): State<Arc<AppState>>) -> ApiResult<impl IntoResponse> {
    let items = state.db.news().list().await?;
    let count = items.len() as u64;
    Ok(Json(ApiResponse::with_count(items, count)))
}

pub async fn get_one(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let item = state.db.news().get(&id).await?;
    Ok(Json(ApiResponse::ok(item)))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    req: Request,
) -> ApiResult<impl IntoResponse> {
    let (body, cover) = parse_body(req).await?;

    let title = match body.title {
        Some(title) => Some(validate_required("title", &title)?),
        None => None,
    };

    let cover_image_url = match cover {
        Some(cover) => Some(store_cover(&state, cover).await?),
        None => body.cover_image_url,
    };

    let item = state
        .db
        .news()
        .update(
            &id,
            NewsPatch {
                title,
                body: body.body,
                category: body.category,
                cover_image_url,
            },
        )
        .await?;
    Ok(Json(ApiResponse::ok(item)))
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    state.db.news().delete(&id).await?;
    Ok(Json(ApiResponse::ok(json!({ "id": id }))))
}
