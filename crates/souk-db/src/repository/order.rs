//! # Special Order Repository
//!
//! CRUD and status updates for special orders / price quotes. The workflow
//! rules (which transitions are legal) live in souk-core; this layer just
//! reads and writes documents.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use souk_core::types::{OrderItem, OrderStatus, SpecialOrder};

use crate::document::{self, collections, Order};
use crate::error::{StoreError, StoreResult};

/// Input for an order create.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub notes: Option<String>,
    pub items: Vec<OrderItem>,
}

/// Partial update for an order's contact fields, notes, and items; `None`
/// fields are left unchanged. Status changes go through
/// [`OrderRepository::set_status`] only.
#[derive(Debug, Clone, Default)]
pub struct OrderPatch {
    pub customer_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub notes: Option<String>,
    pub items: Option<Vec<OrderItem>>,
}

/// Repository for special-order documents.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Creates an order in `pending` status.
    pub async fn create(&self, new: NewOrder) -> StoreResult<SpecialOrder> {
        let now = Utc::now();
        let order = SpecialOrder {
            id: Uuid::new_v4().to_string(),
            customer_name: new.customer_name,
            phone: new.phone,
            email: new.email,
            notes: new.notes,
            items: new.items,
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        document::put(
            &self.pool,
            collections::SPECIAL_ORDERS,
            &order.id,
            &order,
            now,
            now,
        )
        .await?;
        debug!(id = %order.id, "Created special order");
        Ok(order)
    }

    /// Newest first.
    pub async fn list(&self) -> StoreResult<Vec<SpecialOrder>> {
        document::list(&self.pool, collections::SPECIAL_ORDERS, Order::CreatedDesc).await
    }

    pub async fn get(&self, id: &str) -> StoreResult<SpecialOrder> {
        document::fetch(&self.pool, collections::SPECIAL_ORDERS, id)
            .await?
            .ok_or_else(|| StoreError::not_found("Special order", id))
    }

    pub async fn update(&self, id: &str, patch: OrderPatch) -> StoreResult<SpecialOrder> {
        let mut order = self.get(id).await?;

        if let Some(customer_name) = patch.customer_name {
            order.customer_name = customer_name;
        }
        if let Some(phone) = patch.phone {
            order.phone = phone;
        }
        if let Some(email) = patch.email {
            order.email = Some(email);
        }
        if let Some(notes) = patch.notes {
            order.notes = Some(notes);
        }
        if let Some(items) = patch.items {
            order.items = items;
        }

        order.updated_at = Utc::now();
        document::put(
            &self.pool,
            collections::SPECIAL_ORDERS,
            id,
            &order,
            order.created_at,
            order.updated_at,
        )
        .await?;
        Ok(order)
    }

    /// Writes a new status. Callers are expected to have checked the
    /// transition against [`OrderStatus::can_transition`].
    pub async fn set_status(&self, id: &str, status: OrderStatus) -> StoreResult<SpecialOrder> {
        let mut order = self.get(id).await?;
        order.status = status;
        order.updated_at = Utc::now();
        document::put(
            &self.pool,
            collections::SPECIAL_ORDERS,
            id,
            &order,
            order.created_at,
            order.updated_at,
        )
        .await?;
        Ok(order)
    }

    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        if !document::delete(&self.pool, collections::SPECIAL_ORDERS, id).await? {
            return Err(StoreError::not_found("Special order", id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, StoreConfig};

    fn new_order() -> NewOrder {
        NewOrder {
            customer_name: "Layla".into(),
            phone: "+100000000".into(),
            email: None,
            notes: None,
            items: vec![OrderItem {
                product_id: "p1".into(),
                name: "Drill".into(),
                quantity: 2,
                price_cents: Some(4999),
            }],
        }
    }

    #[tokio::test]
    async fn test_order_lifecycle() {
        let db = Database::new(StoreConfig::in_memory()).await.unwrap();
        let repo = db.orders();

        let order = repo.create(new_order()).await.unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
        assert!(!order.id.is_empty());

        let approved = repo
            .set_status(&order.id, OrderStatus::Approved)
            .await
            .unwrap();
        assert_eq!(approved.status, OrderStatus::Approved);
        assert!(approved.updated_at >= approved.created_at);

        repo.delete(&order.id).await.unwrap();
        assert!(matches!(
            repo.get(&order.id).await.unwrap_err(),
            StoreError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_update_leaves_status_untouched() {
        let db = Database::new(StoreConfig::in_memory()).await.unwrap();
        let repo = db.orders();

        let order = repo.create(new_order()).await.unwrap();
        repo.set_status(&order.id, OrderStatus::Approved)
            .await
            .unwrap();

        let updated = repo
            .update(
                &order.id,
                OrderPatch {
                    phone: Some("+200000000".into()),
                    notes: Some("deliver after 5pm".into()),
                    ..OrderPatch::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.phone, "+200000000");
        assert_eq!(updated.notes.as_deref(), Some("deliver after 5pm"));
        assert_eq!(updated.customer_name, "Layla");
        assert_eq!(updated.items.len(), 1);
        assert_eq!(updated.status, OrderStatus::Approved);
    }
}
