//! Connectivity diagnostic.
//!
//! Reports, without failing the request, whether each backing dependency is
//! reachable: the document store, the blob bucket, and the local service
//! credential file (whose `project_id` is echoed back when readable).

use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::{json, Value};

use crate::error::ApiResult;
use crate::response::ApiResponse;
use crate::AppState;

pub async fn connection(State(state): State<Arc<AppState>>) -> ApiResult<impl IntoResponse> {
    let database_ok = state.db.health_check().await;
    let storage_ok = state.blobs.health_check().await;

    let (credentials_ok, project_id) = read_project_id(&state).await;

    Ok(Json(ApiResponse::ok(json!({
        "database": database_ok,
        "storage": storage_ok,
        "credentials": credentials_ok,
        "projectId": project_id,
    }))))
}

/// Reads the credential file and extracts `project_id`. Any failure is
/// reported as a false flag, never as a request error.
async fn read_project_id(state: &AppState) -> (bool, Option<String>) {
    let raw = match tokio::fs::read_to_string(&state.config.credentials_path).await {
        Ok(raw) => raw,
        Err(_) => return (false, None),
    };
    match serde_json::from_str::<Value>(&raw) {
        Ok(creds) => {
            let project_id = creds
                .get("project_id")
                .and_then(Value::as_str)
                .map(str::to_string);
            (true, project_id)
        }
        Err(_) => (false, None),
    }
}
