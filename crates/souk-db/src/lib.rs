//! # souk-db: Storage Layer for the Souk Admin Backend
//!
//! Every storage operation lives here: the SQLite-backed document table,
//! typed repositories over it, and the filesystem blob store for uploads.
//!
//! ## Module Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                           souk-db                                   │
//! │                                                                     │
//! │  pool.rs        StoreConfig, Database (SqlitePool wrapper)         │
//! │  migrations.rs  Embedded SQL migrations                            │
//! │  document.rs    Generic JSON document helpers (one table)          │
//! │  blob.rs        Filesystem blob store (public URLs)                │
//! │  repository/    Typed repositories:                                │
//! │    catalog.rs     main categories / categories / subcategories     │
//! │    product.rs     products, code counter, stock decrement txn      │
//! │    news.rs        news items                                       │
//! │    order.rs       special orders / price quotes                    │
//! │    sector.rs      product sectors (+ default seeding)              │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

pub mod blob;
pub mod document;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use blob::{BlobConfig, BlobStore, StoredObject};
pub use error::{StoreError, StoreResult};
pub use pool::{Database, StoreConfig};
pub use repository::{NewOrder, NewProduct, NewsPatch, OrderPatch, ProductPatch, SectorPatch};
