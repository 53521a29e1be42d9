//! # Product Repository
//!
//! Product CRUD, product-code allocation, and the stock-decrement
//! transaction.
//!
//! ## Stock Decrement
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  decrement_stock(lines)                 ← ONE transaction           │
//! │                                                                     │
//! │  for each line {productId|productCode, quantity}:                   │
//! │    resolve by id ──── found? ──┐                                    │
//! │         │ no                   │                                    │
//! │    resolve by code ─ found? ───┤                                    │
//! │         │ no                   ▼                                    │
//! │    missing.push(identifier)  new = max(0, stock - quantity)         │
//! │                              write, matched.push(id)                │
//! │                                                                     │
//! │  commit  →  {matched, missing, count = matched.len()}               │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//! All-or-nothing at the transaction level; unmatched lines are skipped,
//! not failed.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use souk_core::stock::{clamp_decrement, StockDecrementOutcome, StockLine};
use souk_core::types::{Counter, Product};

use crate::document::{self, collections, Order};
use crate::error::{StoreError, StoreResult};

/// Counter document id used for product code allocation.
const PRODUCT_CODE_COUNTER: &str = "product_code";

/// Input for a product create.
#[derive(Debug, Clone, Default)]
pub struct NewProduct {
    pub name: String,
    pub name_ar: Option<String>,
    pub description: Option<String>,
    pub product_code: Option<String>,
    pub price_cents: i64,
    pub stock: i64,
    pub category_id: Option<String>,
    pub subcategory_id: Option<String>,
    pub image_url: Option<String>,
}

/// Partial update for a product; `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub name_ar: Option<String>,
    pub description: Option<String>,
    pub price_cents: Option<i64>,
    pub stock: Option<i64>,
    pub category_id: Option<String>,
    pub subcategory_id: Option<String>,
    pub image_url: Option<String>,
}

/// Repository for product documents.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Creates a product. When no `productCode` is supplied one is
    /// allocated from the counter document, in the same transaction as the
    /// insert.
    pub async fn create(&self, new: NewProduct) -> StoreResult<Product> {
        let mut tx = self.pool.begin().await?;
        let now = Utc::now();

        let product_code = match new.product_code {
            Some(code) => Some(code),
            None => {
                let mut counter: Counter =
                    document::fetch(&mut *tx, collections::COUNTERS, PRODUCT_CODE_COUNTER)
                        .await?
                        .unwrap_or(Counter {
                            id: PRODUCT_CODE_COUNTER.to_string(),
                            value: 0,
                            created_at: now,
                            updated_at: now,
                        });
                counter.value += 1;
                counter.updated_at = now;
                document::put(
                    &mut *tx,
                    collections::COUNTERS,
                    PRODUCT_CODE_COUNTER,
                    &counter,
                    counter.created_at,
                    now,
                )
                .await?;
                Some(format!("P-{:06}", counter.value))
            }
        };

        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: new.name,
            name_ar: new.name_ar,
            description: new.description,
            product_code,
            price_cents: new.price_cents,
            stock: new.stock,
            category_id: new.category_id,
            subcategory_id: new.subcategory_id,
            image_url: new.image_url,
            created_at: now,
            updated_at: now,
        };
        document::put(
            &mut *tx,
            collections::PRODUCTS,
            &product.id,
            &product,
            now,
            now,
        )
        .await?;

        tx.commit().await?;
        debug!(id = %product.id, code = ?product.product_code, "Created product");
        Ok(product)
    }

    pub async fn list(&self) -> StoreResult<Vec<Product>> {
        document::list(&self.pool, collections::PRODUCTS, Order::CreatedDesc).await
    }

    pub async fn get(&self, id: &str) -> StoreResult<Product> {
        document::fetch(&self.pool, collections::PRODUCTS, id)
            .await?
            .ok_or_else(|| StoreError::not_found("Product", id))
    }

    pub async fn get_by_code(&self, code: &str) -> StoreResult<Option<Product>> {
        document::fetch_by_field(&self.pool, collections::PRODUCTS, "productCode", code).await
    }

    pub async fn update(&self, id: &str, patch: ProductPatch) -> StoreResult<Product> {
        let mut product = self.get(id).await?;

        if let Some(name) = patch.name {
            product.name = name;
        }
        if let Some(name_ar) = patch.name_ar {
            product.name_ar = Some(name_ar);
        }
        if let Some(description) = patch.description {
            product.description = Some(description);
        }
        if let Some(price_cents) = patch.price_cents {
            product.price_cents = price_cents;
        }
        if let Some(stock) = patch.stock {
            product.stock = stock.max(0);
        }
        if let Some(category_id) = patch.category_id {
            product.category_id = Some(category_id);
        }
        if let Some(subcategory_id) = patch.subcategory_id {
            product.subcategory_id = Some(subcategory_id);
        }
        if let Some(image_url) = patch.image_url {
            product.image_url = Some(image_url);
        }

        product.updated_at = Utc::now();
        document::put(
            &self.pool,
            collections::PRODUCTS,
            id,
            &product,
            product.created_at,
            product.updated_at,
        )
        .await?;
        Ok(product)
    }

    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        if !document::delete(&self.pool, collections::PRODUCTS, id).await? {
            return Err(StoreError::not_found("Product", id));
        }
        Ok(())
    }

    /// Applies a batch of stock decrements inside one transaction.
    ///
    /// Lines resolve by product id first, falling back to product code.
    /// Unmatched lines are reported in `missing` and skipped; matched
    /// products get `stock = max(0, stock - quantity)`.
    pub async fn decrement_stock(
        &self,
        lines: &[StockLine],
    ) -> StoreResult<StockDecrementOutcome> {
        let mut tx = self.pool.begin().await?;
        let now = Utc::now();
        let mut outcome = StockDecrementOutcome::default();

        for line in lines {
            let mut product: Option<Product> = match &line.product_id {
                Some(id) => document::fetch(&mut *tx, collections::PRODUCTS, id).await?,
                None => None,
            };
            if product.is_none() {
                if let Some(code) = &line.product_code {
                    product = document::fetch_by_field(
                        &mut *tx,
                        collections::PRODUCTS,
                        "productCode",
                        code,
                    )
                    .await?;
                }
            }

            match product {
                Some(mut product) => {
                    product.stock = clamp_decrement(product.stock, line.quantity);
                    product.updated_at = now;
                    document::put(
                        &mut *tx,
                        collections::PRODUCTS,
                        &product.id,
                        &product,
                        product.created_at,
                        now,
                    )
                    .await?;
                    outcome.matched.push(product.id);
                }
                None => outcome.missing.push(line.identifier()),
            }
        }

        tx.commit().await?;
        debug!(
            matched = outcome.matched.len(),
            missing = outcome.missing.len(),
            "Applied stock decrement batch"
        );
        Ok(outcome)
    }

    /// Resets the product-code counter to zero. Returns the new value.
    pub async fn reset_code_counter(&self) -> StoreResult<i64> {
        let now = Utc::now();
        let existing: Option<Counter> =
            document::fetch(&self.pool, collections::COUNTERS, PRODUCT_CODE_COUNTER).await?;

        let counter = Counter {
            id: PRODUCT_CODE_COUNTER.to_string(),
            value: 0,
            created_at: existing.map(|c| c.created_at).unwrap_or(now),
            updated_at: now,
        };
        document::put(
            &self.pool,
            collections::COUNTERS,
            PRODUCT_CODE_COUNTER,
            &counter,
            counter.created_at,
            now,
        )
        .await?;
        Ok(counter.value)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
