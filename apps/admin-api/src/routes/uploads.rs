//! Generic multipart upload endpoint.
//!
//! Accepts a `file` part and an optional `folder` text part; bytes land in
//! the blob store under `{folder}/{uuid}.{ext}` and the response carries the
//! object's key and public URL.

use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::error::{ApiError, ApiResult};
use crate::response::ApiResponse;
use crate::AppState;

/// Default key prefix when no `folder` part is given.
const DEFAULT_FOLDER: &str = "uploads";

/// Maps a content type (or, failing that, the original filename) to a file
/// extension for the stored key.
pub(crate) fn extension_for(content_type: Option<&str>, filename: Option<&str>) -> Option<String> {
    match content_type {
        Some("image/png") => return Some("png".to_string()),
        Some("image/jpeg") => return Some("jpg".to_string()),
        Some("image/webp") => return Some("webp".to_string()),
        Some("image/gif") => return Some("gif".to_string()),
        Some("application/pdf") => return Some("pdf".to_string()),
        _ => {}
    }
    filename
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty() && ext.len() <= 8)
}

pub async fn upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> ApiResult<impl IntoResponse> {
    let mut folder = DEFAULT_FOLDER.to_string();
    let mut stored = None;

    while let Some(field) = multipart.next_field().await? {
        match field.name() {
            Some("folder") => {
                let value = field.text().await?;
                let value = value.trim().trim_matches('/');
                if !value.is_empty() {
                    folder = value.to_string();
                }
            }
            Some("file") => {
                let content_type = field.content_type().map(str::to_string);
                let filename = field.file_name().map(str::to_string);
                let bytes = field.bytes().await?;
                let ext = extension_for(content_type.as_deref(), filename.as_deref());
                stored = Some((ext, bytes));
            }
            _ => {}
        }
    }

    let (ext, bytes) = stored
        .ok_or_else(|| ApiError::BadRequest("Missing 'file' part in multipart body".to_string()))?;

    let object = state
        .blobs
        .put_public(&folder, ext.as_deref(), &bytes)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(object))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_prefers_content_type() {
        assert_eq!(
            extension_for(Some("image/png"), Some("photo.jpeg")),
            Some("png".to_string())
        );
    }

    #[test]
    fn test_extension_falls_back_to_filename() {
        assert_eq!(
            extension_for(Some("application/octet-stream"), Some("report.XLSX")),
            Some("xlsx".to_string())
        );
        assert_eq!(extension_for(None, Some("Makefile")), None);
        assert_eq!(extension_for(None, None), None);
    }
}
