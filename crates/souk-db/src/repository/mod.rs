//! # Repository Module
//!
//! Typed repositories over the generic document table, one per entity
//! family. Each repository owns a pool clone; multi-document mutations run
//! inside a single transaction.

pub mod catalog;
pub mod news;
pub mod order;
pub mod product;
pub mod sector;

pub use catalog::CatalogRepository;
pub use news::{NewsPatch, NewsRepository};
pub use order::{NewOrder, OrderPatch, OrderRepository};
pub use product::{NewProduct, ProductPatch, ProductRepository};
pub use sector::{SectorPatch, SectorRepository};
