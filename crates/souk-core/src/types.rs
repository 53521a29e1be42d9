//! # Domain Types
//!
//! Document entities for the catalog backend. Every entity serializes with
//! camelCase field names — that is the wire format of the JSON API and the
//! shape stored in the document table's `data` column.
//!
//! ## Entity Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        Catalog Entities                             │
//! │                                                                     │
//! │  MainCategory ──┬── children:    [category name, ...]              │
//! │                 └── subchildren: {category name: [subcat, ...]}    │
//! │        ▲                     (denormalized cache)                   │
//! │        │ mainCategoryId                                             │
//! │   Category ──── children: [subcategory name, ...]                  │
//! │        ▲                                                            │
//! │        │ categoryId                                                 │
//! │   Subcategory                                                       │
//! │                                                                     │
//! │   Product (stock, productCode)      NewsItem (coverImageUrl)       │
//! │   SpecialOrder (items, status)      ProductSector (displayOrder)   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity & Timestamps
//! Every entity has:
//! - `id`: UUID v4, immutable, assigned by the storage layer on insert
//! - `createdAt` / `updatedAt`: RFC 3339 UTC timestamps, with
//!   `updatedAt >= createdAt` always

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Category Tree
// =============================================================================

/// A top-level grouping holding the denormalized category tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MainCategory {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name. Also the key other documents reference in their caches.
    pub name: String,

    /// Localized display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_ar: Option<String>,

    /// Denormalized cache: names of categories whose `mainCategoryId` is
    /// this document's id.
    #[serde(default)]
    pub children: Vec<String>,

    /// Denormalized cache: category name → names of that category's
    /// subcategories.
    ///
    /// BTreeMap keeps key order stable, which makes the migration output
    /// deterministic and therefore idempotent.
    #[serde(default)]
    pub subchildren: BTreeMap<String, Vec<String>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A category under a main category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_ar: Option<String>,

    /// Owning main category (id reference, stable across renames).
    pub main_category_id: String,

    /// Denormalized cache: names of this category's subcategories.
    #[serde(default)]
    pub children: Vec<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A subcategory, the leaf of the category tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subcategory {
    pub id: String,
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_ar: Option<String>,

    /// Owning category (id reference).
    pub category_id: String,

    /// Owning main category (id reference).
    pub main_category_id: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Product
// =============================================================================

/// A catalog product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_ar: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Business code, allocated from the product-code counter when the
    /// create request doesn't supply one. Stock decrement accepts it as a
    /// fallback identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_code: Option<String>,

    /// Price in cents (smallest currency unit, no floats).
    pub price_cents: i64,

    /// Current stock level. Never negative: decrements floor at zero.
    pub stock: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// News
// =============================================================================

/// A news item with an optional cover image in blob storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    pub id: String,
    pub title: String,
    pub body: String,

    /// Free-form category tag (not part of the catalog tree).
    pub category: String,

    /// Public URL of the uploaded cover image, when one was uploaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image_url: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Special Orders / Price Quotes
// =============================================================================

/// Status of a special order / price quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Approved,
    Rejected,
    Sent,
}

impl OrderStatus {
    /// Parses a status string as it appears on the wire.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(OrderStatus::Pending),
            "approved" => Some(OrderStatus::Approved),
            "rejected" => Some(OrderStatus::Rejected),
            "sent" => Some(OrderStatus::Sent),
            _ => None,
        }
    }

    /// Wire representation (lowercase).
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Approved => "approved",
            OrderStatus::Rejected => "rejected",
            OrderStatus::Sent => "sent",
        }
    }

    /// Whether moving from `self` to `next` is a legal workflow step.
    ///
    /// pending → approved | rejected, approved → sent. Setting the same
    /// status again is a no-op and always allowed.
    pub fn can_transition(&self, next: OrderStatus) -> bool {
        if *self == next {
            return true;
        }
        matches!(
            (self, next),
            (OrderStatus::Pending, OrderStatus::Approved)
                | (OrderStatus::Pending, OrderStatus::Rejected)
                | (OrderStatus::Approved, OrderStatus::Sent)
        )
    }
}

/// A product line selected on a special order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: String,

    /// Name snapshot at order time, so the quote survives product renames.
    pub name: String,

    pub quantity: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_cents: Option<i64>,
}

/// A special order / price quote submitted by a customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecialOrder {
    pub id: String,
    pub customer_name: String,
    pub phone: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(default)]
    pub items: Vec<OrderItem>,

    pub status: OrderStatus,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Product Sectors
// =============================================================================

/// A product sector tile shown on the storefront, ordered by `displayOrder`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSector {
    pub id: String,
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_ar: Option<String>,

    pub display_order: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Counters
// =============================================================================

/// A named counter document (product code allocation).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Counter {
    pub id: String,
    pub value: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_case_wire_format() {
        let now = Utc::now();
        let cat = Category {
            id: "c1".to_string(),
            name: "Drills".to_string(),
            name_ar: None,
            main_category_id: "m1".to_string(),
            children: vec![],
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(&cat).unwrap();
        assert!(json.get("mainCategoryId").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("main_category_id").is_none());
    }

    #[test]
    fn test_order_status_round_trip() {
        for s in ["pending", "approved", "rejected", "sent"] {
            let status = OrderStatus::parse(s).unwrap();
            assert_eq!(status.as_str(), s);
        }
        assert!(OrderStatus::parse("shipped").is_none());
    }

    #[test]
    fn test_order_status_transitions() {
        assert!(OrderStatus::Pending.can_transition(OrderStatus::Approved));
        assert!(OrderStatus::Pending.can_transition(OrderStatus::Rejected));
        assert!(OrderStatus::Approved.can_transition(OrderStatus::Sent));
        assert!(OrderStatus::Sent.can_transition(OrderStatus::Sent));

        assert!(!OrderStatus::Rejected.can_transition(OrderStatus::Sent));
        assert!(!OrderStatus::Sent.can_transition(OrderStatus::Pending));
    }
}
