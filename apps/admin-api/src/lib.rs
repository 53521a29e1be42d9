//! # Souk Admin API
//!
//! HTTP/JSON server for the catalog admin backend.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         admin-api                                   │
//! │                                                                     │
//! │  HTTP request                                                       │
//! │      │                                                              │
//! │      ▼                                                              │
//! │  routes/*         parse + validate input (souk-core validation)    │
//! │      │                                                              │
//! │      ▼                                                              │
//! │  souk-db          repositories / blob store                        │
//! │      │                                                              │
//! │      ▼                                                              │
//! │  response.rs      {success, data?, error?, code?, count?}          │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Uploaded files are served statically under `/files`, mirroring the
//! public-URL scheme the blob store hands out.

pub mod config;
pub mod error;
pub mod response;
pub mod routes;

use souk_db::{BlobStore, Database};

use crate::config::ApiConfig;

/// Shared application state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
    pub blobs: BlobStore,
    pub config: ApiConfig,
}

// =============================================================================
// Handler Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::Router;
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use souk_db::{BlobConfig, BlobStore, Database, StoreConfig};

    use super::*;

    async fn test_app() -> Router {
        let db = Database::new(StoreConfig::in_memory()).await.unwrap();
        let root = std::env::temp_dir().join(format!("souk-api-test-{}", uuid::Uuid::new_v4()));
        let blobs = BlobStore::new(BlobConfig::new(
            &root,
            "http://localhost:8080/files",
        ));
        let config = ApiConfig {
            http_port: 0,
            database_path: ":memory:".to_string(),
            storage_root: root,
            public_url_base: "http://localhost:8080/files".to_string(),
            credentials_path: "./does-not-exist.json".into(),
        };
        routes::router(Arc::new(AppState { db, blobs, config }))
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_create_and_list_main_categories() {
        let app = test_app().await;

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/main-categories",
                json!({"name": "Tools"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert!(!body["data"]["id"].as_str().unwrap().is_empty());
        assert_eq!(body["data"]["name"], "Tools");

        let response = app.oneshot(get_request("/api/main-categories")).await.unwrap();
        let body = body_json(response).await;
        assert_eq!(body["count"], 1);
    }

    #[tokio::test]
    async fn test_missing_name_is_rejected_without_mutation() {
        let app = test_app().await;

        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/main-categories", json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "name is required");

        let response = app.oneshot(get_request("/api/main-categories")).await.unwrap();
        let body = body_json(response).await;
        assert_eq!(body["count"], 0);
    }

    #[tokio::test]
    async fn test_unknown_product_is_404_with_code() {
        let app = test_app().await;

        let response = app
            .oneshot(get_request("/api/products/no-such-id"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "not_found");
    }

    #[tokio::test]
    async fn test_decrement_stock_reports_matched_and_missing() {
        let app = test_app().await;

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/products",
                json!({"name": "Hammer", "priceCents": 1500, "stock": 10}),
            ))
            .await
            .unwrap();
        let body = body_json(response).await;
        let id = body["data"]["id"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/products/decrement-stock",
                json!({"items": [
                    {"productId": id, "quantity": 4},
                    {"productCode": "P-999999", "quantity": 1},
                ]}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["count"], 1);
        assert_eq!(body["data"]["matched"][0], id.as_str());
        assert_eq!(body["data"]["missing"][0], "P-999999");

        let response = app
            .oneshot(get_request(&format!("/api/products/{id}")))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["data"]["stock"], 6);
    }

    #[tokio::test]
    async fn test_decrement_rejects_nonpositive_quantity() {
        let app = test_app().await;

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/products/decrement-stock",
                json!({"items": [{"productCode": "P-000001", "quantity": 0}]}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_migrate_is_idempotent() {
        let app = test_app().await;

        app.clone()
            .oneshot(json_request(
                "POST",
                "/api/main-categories",
                json!({"name": "Hardware"}),
            ))
            .await
            .unwrap();

        for _ in 0..2 {
            let response = app
                .clone()
                .oneshot(json_request(
                    "POST",
                    "/api/main-categories/migrate",
                    json!({}),
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            let body = body_json(response).await;
            assert_eq!(body["count"], 1);
        }
    }

    #[tokio::test]
    async fn test_category_create_updates_parent_cache() {
        let app = test_app().await;

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/main-categories",
                json!({"name": "Hardware"}),
            ))
            .await
            .unwrap();
        let main_id = body_json(response).await["data"]["id"]
            .as_str()
            .unwrap()
            .to_string();

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/categories",
                json!({"name": "Drills", "mainCategoryId": main_id}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .oneshot(get_request(&format!("/api/main-categories/{main_id}")))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["data"]["children"][0], "Drills");
        assert_eq!(body["data"]["subchildren"]["Drills"], json!([]));
    }

    #[tokio::test]
    async fn test_order_status_workflow_is_enforced() {
        let app = test_app().await;

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/orders",
                json!({"customerName": "Sami", "phone": "+961-3-123456"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        let id = body["data"]["id"].as_str().unwrap().to_string();
        assert_eq!(body["data"]["status"], "pending");

        // pending → sent is illegal
        let response = app
            .clone()
            .oneshot(json_request(
                "PATCH",
                &format!("/api/orders/{id}/status"),
                json!({"status": "sent"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        // pending → approved → sent
        for status in ["approved", "sent"] {
            let response = app
                .clone()
                .oneshot(json_request(
                    "PATCH",
                    &format!("/api/orders/{id}/status"),
                    json!({"status": status}),
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            let body = body_json(response).await;
            assert_eq!(body["data"]["status"], status);
        }
    }

    #[tokio::test]
    async fn test_order_update_edits_fields_but_not_status() {
        let app = test_app().await;

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/orders",
                json!({"customerName": "Sami", "phone": "+961-3-123456"}),
            ))
            .await
            .unwrap();
        let id = body_json(response).await["data"]["id"]
            .as_str()
            .unwrap()
            .to_string();

        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                &format!("/api/orders/{id}"),
                json!({
                    "phone": "+961-3-654321",
                    "notes": "call first",
                    "items": [{"productId": "p1", "name": "Drill", "quantity": 2}],
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["data"]["phone"], "+961-3-654321");
        assert_eq!(body["data"]["notes"], "call first");
        assert_eq!(body["data"]["customerName"], "Sami");
        assert_eq!(body["data"]["items"][0]["name"], "Drill");
        assert_eq!(body["data"]["status"], "pending");

        // Blank customerName is rejected, order untouched.
        let response = app
            .oneshot(json_request(
                "PUT",
                &format!("/api/orders/{id}"),
                json!({"customerName": "  "}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_sector_list_seeds_defaults() {
        let app = test_app().await;

        let response = app.oneshot(get_request("/api/sectors")).await.unwrap();
        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert!(body["count"].as_u64().unwrap() >= 1);
    }

    #[tokio::test]
    async fn test_generic_upload_stores_file() {
        let app = test_app().await;

        let body = concat!(
            "--X-BOUNDARY\r\n",
            "Content-Disposition: form-data; name=\"folder\"\r\n\r\n",
            "manuals\r\n",
            "--X-BOUNDARY\r\n",
            "Content-Disposition: form-data; name=\"file\"; filename=\"guide.pdf\"\r\n",
            "Content-Type: application/pdf\r\n\r\n",
            "%PDF-1.4 fake\r\n",
            "--X-BOUNDARY--\r\n",
        );
        let request = Request::builder()
            .method("POST")
            .uri("/api/uploads")
            .header(
                header::CONTENT_TYPE,
                "multipart/form-data; boundary=X-BOUNDARY",
            )
            .body(Body::from(body))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = body_json(response).await;
        let key = body["data"]["key"].as_str().unwrap();
        assert!(key.starts_with("manuals/"));
        assert!(key.ends_with(".pdf"));
        assert!(body["data"]["publicUrl"]
            .as_str()
            .unwrap()
            .ends_with(key));
    }

    #[tokio::test]
    async fn test_news_create_accepts_multipart_with_image_check() {
        let app = test_app().await;

        // Non-image cover is rejected.
        let bad = concat!(
            "--X-BOUNDARY\r\n",
            "Content-Disposition: form-data; name=\"title\"\r\n\r\n",
            "Opening hours\r\n",
            "--X-BOUNDARY\r\n",
            "Content-Disposition: form-data; name=\"body\"\r\n\r\n",
            "We are open.\r\n",
            "--X-BOUNDARY\r\n",
            "Content-Disposition: form-data; name=\"category\"\r\n\r\n",
            "store\r\n",
            "--X-BOUNDARY\r\n",
            "Content-Disposition: form-data; name=\"coverImage\"; filename=\"a.pdf\"\r\n",
            "Content-Type: application/pdf\r\n\r\n",
            "nope\r\n",
            "--X-BOUNDARY--\r\n",
        );
        let request = Request::builder()
            .method("POST")
            .uri("/api/news")
            .header(
                header::CONTENT_TYPE,
                "multipart/form-data; boundary=X-BOUNDARY",
            )
            .body(Body::from(bad))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        // Image cover is stored and its public URL lands on the item.
        let good = concat!(
            "--X-BOUNDARY\r\n",
            "Content-Disposition: form-data; name=\"title\"\r\n\r\n",
            "Opening hours\r\n",
            "--X-BOUNDARY\r\n",
            "Content-Disposition: form-data; name=\"body\"\r\n\r\n",
            "We are open.\r\n",
            "--X-BOUNDARY\r\n",
            "Content-Disposition: form-data; name=\"category\"\r\n\r\n",
            "store\r\n",
            "--X-BOUNDARY\r\n",
            "Content-Disposition: form-data; name=\"coverImage\"; filename=\"a.png\"\r\n",
            "Content-Type: image/png\r\n\r\n",
            "not-really-a-png\r\n",
            "--X-BOUNDARY--\r\n",
        );
        let request = Request::builder()
            .method("POST")
            .uri("/api/news")
            .header(
                header::CONTENT_TYPE,
                "multipart/form-data; boundary=X-BOUNDARY",
            )
            .body(Body::from(good))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = body_json(response).await;
        let url = body["data"]["coverImageUrl"].as_str().unwrap();
        assert!(url.contains("/files/news/"));
        assert!(url.ends_with(".png"));
    }

    #[tokio::test]
    async fn test_news_create_accepts_plain_json() {
        let app = test_app().await;

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/news",
                json!({
                    "title": "Opening hours",
                    "body": "We are open.",
                    "category": "store",
                    "coverImageUrl": "http://localhost:8080/files/news/x.png",
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = body_json(response).await;
        assert_eq!(
            body["data"]["coverImageUrl"],
            "http://localhost:8080/files/news/x.png"
        );
    }

    #[tokio::test]
    async fn test_debug_connection_reports_flags() {
        let app = test_app().await;

        let response = app.oneshot(get_request("/api/debug/connection")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["data"]["database"], true);
        assert_eq!(body["data"]["storage"], true);
        assert_eq!(body["data"]["credentials"], false);
    }

    #[tokio::test]
    async fn test_code_counter_reset() {
        let app = test_app().await;

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/products",
                json!({"name": "Wrench"}),
            ))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["data"]["productCode"], "P-000001");

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/products/code-counter/reset",
                json!({}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/products",
                json!({"name": "Pliers"}),
            ))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["data"]["productCode"], "P-000001");
    }
}
