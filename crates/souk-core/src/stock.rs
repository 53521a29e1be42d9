//! # Stock Arithmetic
//!
//! The arithmetic behind the stock-decrement endpoint, kept pure so the
//! floor-at-zero rule is testable without a database.
//!
//! ## Decrement Flow
//! ```text
//! request item {productId|productCode, quantity}
//!      │
//!      ▼
//! resolve product (id first, code fallback)   ← souk-db, inside one txn
//!      │
//!      ├── not found → reported in `missing`, skipped
//!      │
//!      ▼
//! new_stock = clamp_decrement(current, quantity)   ← THIS MODULE
//!      │
//!      ▼
//! write new_stock, id reported in `matched`
//! ```

use serde::{Deserialize, Serialize};

/// Applies a decrement to a stock level, flooring at zero.
///
/// Quantities exceeding current stock drain it to exactly zero; stock is
/// never negative.
#[inline]
pub fn clamp_decrement(current: i64, quantity: i64) -> i64 {
    (current - quantity).max(0)
}

/// One line of a stock decrement request.
///
/// At least one of `product_id` / `product_code` must be present; the id
/// wins when both are given.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockLine {
    #[serde(default)]
    pub product_id: Option<String>,

    #[serde(default)]
    pub product_code: Option<String>,

    pub quantity: i64,
}

impl StockLine {
    /// The identifier to report for this line when no product matches.
    pub fn identifier(&self) -> String {
        self.product_id
            .clone()
            .or_else(|| self.product_code.clone())
            .unwrap_or_default()
    }
}

/// Outcome of a stock decrement batch.
///
/// The batch is all-or-nothing at the transaction level but tolerant of
/// unmatched lines: they land in `missing` instead of failing the batch.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockDecrementOutcome {
    /// IDs of products that were found and updated.
    pub matched: Vec<String>,

    /// Identifiers (id or code, as given) that matched no product.
    pub missing: Vec<String>,
}

impl StockDecrementOutcome {
    /// Number of products actually updated.
    pub fn count(&self) -> u64 {
        self.matched.len() as u64
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_normal_decrement() {
        assert_eq!(clamp_decrement(10, 3), 7);
        assert_eq!(clamp_decrement(1, 1), 0);
    }

    #[test]
    fn test_clamp_floors_at_zero() {
        assert_eq!(clamp_decrement(2, 5), 0);
        assert_eq!(clamp_decrement(0, 1), 0);
        assert_eq!(clamp_decrement(0, i64::MAX), 0);
    }

    #[test]
    fn test_stock_line_identifier_prefers_id() {
        let line: StockLine = serde_json::from_str(
            r#"{"productId":"p1","productCode":"P-000001","quantity":2}"#,
        )
        .unwrap();
        assert_eq!(line.identifier(), "p1");

        let line: StockLine =
            serde_json::from_str(r#"{"productCode":"P-000002","quantity":2}"#).unwrap();
        assert_eq!(line.identifier(), "P-000002");
    }
}
