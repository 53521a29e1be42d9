//! # Route Handlers
//!
//! One module per resource; every handler is thin: parse input, call a
//! repository (or the blob store), shape the envelope.
//!
//! ## Surface
//! ```text
//! /api/main-categories         GET POST         /migrate POST
//! /api/main-categories/:id     GET PUT DELETE
//! /api/categories              GET POST
//! /api/categories/:id          GET PUT DELETE
//! /api/subcategories           GET POST
//! /api/subcategories/:id       GET PUT DELETE
//! /api/products                GET POST
//! /api/products/:id            GET PUT DELETE
//! /api/products/decrement-stock        POST
//! /api/products/code-counter/reset     POST
//! /api/news                    GET POST (multipart or JSON)
//! /api/news/:id                GET PUT DELETE
//! /api/orders                  GET POST
//! /api/orders/:id              GET PUT DELETE  /status PATCH
//! /api/sectors                 GET POST
//! /api/sectors/:id             GET PUT DELETE  /image POST
//! /api/uploads                 POST (multipart)
//! /api/debug/connection        GET
//! /files/*                     static blob bucket
//! ```

pub mod categories;
pub mod debug;
pub mod main_categories;
pub mod news;
pub mod orders;
pub mod products;
pub mod sectors;
pub mod subcategories;
pub mod uploads;

use std::sync::Arc;

use axum::routing::{get, patch, post};
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Builds the full application router.
pub fn router(state: Arc<AppState>) -> Router {
    let files = ServeDir::new(state.blobs.root().to_path_buf());

    Router::new()
        .nest("/api", api())
        .nest_service("/files", files)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api() -> Router<Arc<AppState>> {
    Router::new()
        // Category tree
        .route(
            "/main-categories",
            get(main_categories::list).post(main_categories::create),
        )
        .route("/main-categories/migrate", post(main_categories::migrate))
        .route(
            "/main-categories/:id",
            get(main_categories::get_one)
                .put(main_categories::update)
                .delete(main_categories::delete),
        )
        .route("/categories", get(categories::list).post(categories::create))
        .route(
            "/categories/:id",
            get(categories::get_one)
                .put(categories::update)
                .delete(categories::delete),
        )
        .route(
            "/subcategories",
            get(subcategories::list).post(subcategories::create),
        )
        .route(
            "/subcategories/:id",
            get(subcategories::get_one)
                .put(subcategories::update)
                .delete(subcategories::delete),
        )
        // Products
        .route("/products", get(products::list).post(products::create))
        .route("/products/decrement-stock", post(products::decrement_stock))
        .route(
            "/products/code-counter/reset",
            post(products::reset_code_counter),
        )
        .route(
            "/products/:id",
            get(products::get_one)
                .put(products::update)
                .delete(products::delete),
        )
        // News
        .route("/news", get(news::list).post(news::create))
        .route(
            "/news/:id",
            get(news::get_one).put(news::update).delete(news::delete),
        )
        // Special orders
        .route("/orders", get(orders::list).post(orders::create))
        .route(
            "/orders/:id",
            get(orders::get_one).put(orders::update).delete(orders::delete),
        )
        .route("/orders/:id/status", patch(orders::set_status))
        // Sectors
        .route("/sectors", get(sectors::list).post(sectors::create))
        .route(
            "/sectors/:id",
            get(sectors::get_one)
                .put(sectors::update)
                .delete(sectors::delete),
        )
        .route("/sectors/:id/image", post(sectors::upload_image))
        // Uploads & diagnostics
        .route("/uploads", post(uploads::upload))
        .route("/debug/connection", get(debug::connection))
}
