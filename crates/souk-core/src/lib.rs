//! # souk-core: Pure Domain Logic for the Souk Admin Backend
//!
//! This crate holds everything the catalog backend knows that does not touch
//! a database or the network: entity types, input validation, the stock
//! decrement arithmetic, and the category-tree denormalization.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Souk Admin Architecture                        │
//! │                                                                     │
//! │  ┌───────────────────────────────────────────────────────────────┐ │
//! │  │                 admin-api (axum handlers)                     │ │
//! │  │   categories, products, news, orders, sectors, uploads       │ │
//! │  └──────────────────────────────┬────────────────────────────────┘ │
//! │                                 │                                   │
//! │  ┌──────────────────────────────▼────────────────────────────────┐ │
//! │  │              ★ souk-core (THIS CRATE) ★                       │ │
//! │  │                                                               │ │
//! │  │   ┌──────────┐  ┌──────────┐  ┌──────────┐  ┌────────────┐  │ │
//! │  │   │  types   │  │  stock   │  │   tree   │  │ validation │  │ │
//! │  │   │ Product  │  │  clamp   │  │ children │  │   rules    │  │ │
//! │  │   │ Category │  │          │  │subchildren│ │   checks   │  │ │
//! │  │   └──────────┘  └──────────┘  └──────────┘  └────────────┘  │ │
//! │  │                                                               │ │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS         │ │
//! │  └──────────────────────────────┬────────────────────────────────┘ │
//! │                                 │                                   │
//! │  ┌──────────────────────────────▼────────────────────────────────┐ │
//! │  │               souk-db (Storage Layer)                         │ │
//! │  │      SQLite document table, repositories, blob store          │ │
//! │  └───────────────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Document entities (Category, Product, NewsItem, ...)
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation rules
//! - [`stock`] - Stock decrement arithmetic (floor at zero)
//! - [`tree`] - Category-tree denormalization (children / subchildren)

pub mod error;
pub mod stock;
pub mod tree;
pub mod types;
pub mod validation;

pub use error::{CoreError, ValidationError};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default product sectors, seeded when the `sectors` collection is empty.
///
/// Pairs of (name, display order). Seeding happens on first list, so a fresh
/// deployment always shows a usable sector grid.
pub const DEFAULT_SECTORS: &[(&str, i64)] = &[
    ("Electronics", 1),
    ("Home & Kitchen", 2),
    ("Tools & Hardware", 3),
    ("Office Supplies", 4),
    ("Outdoor & Garden", 5),
    ("Health & Beauty", 6),
];

/// Maximum length accepted for free-text name/title fields.
pub const MAX_NAME_LEN: usize = 200;

/// Maximum number of line items accepted in a stock decrement request.
///
/// Keeps the multi-document transaction bounded; larger batches should be
/// split by the caller.
pub const MAX_STOCK_ITEMS: usize = 500;
