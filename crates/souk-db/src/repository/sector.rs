//! # Product Sector Repository
//!
//! CRUD for product sectors. Listing seeds the fixed default sector set
//! when the collection is empty, so a fresh deployment is never blank.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use souk_core::types::ProductSector;
use souk_core::DEFAULT_SECTORS;

use crate::document::{self, collections, Order};
use crate::error::{StoreError, StoreResult};

/// Partial update for a sector; `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct SectorPatch {
    pub name: Option<String>,
    pub name_ar: Option<String>,
    pub display_order: Option<i64>,
    pub image_url: Option<String>,
}

/// Repository for product-sector documents.
#[derive(Debug, Clone)]
pub struct SectorRepository {
    pool: SqlitePool,
}

impl SectorRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SectorRepository { pool }
    }

    /// Lists sectors ordered by `displayOrder`, seeding the defaults first
    /// when the collection is empty.
    pub async fn list(&self) -> StoreResult<Vec<ProductSector>> {
        if document::count(&self.pool, collections::SECTORS).await? == 0 {
            self.seed_defaults().await?;
        }

        let mut sectors: Vec<ProductSector> =
            document::list(&self.pool, collections::SECTORS, Order::CreatedAsc).await?;
        sectors.sort_by_key(|s| s.display_order);
        Ok(sectors)
    }

    /// Inserts the default sector set in one transaction.
    async fn seed_defaults(&self) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;
        let now = Utc::now();

        for (name, display_order) in DEFAULT_SECTORS {
            let sector = ProductSector {
                id: Uuid::new_v4().to_string(),
                name: (*name).to_string(),
                name_ar: None,
                display_order: *display_order,
                image_url: None,
                created_at: now,
                updated_at: now,
            };
            document::put(&mut *tx, collections::SECTORS, &sector.id, &sector, now, now).await?;
        }

        tx.commit().await?;
        info!(count = DEFAULT_SECTORS.len(), "Seeded default product sectors");
        Ok(())
    }

    pub async fn create(
        &self,
        name: String,
        name_ar: Option<String>,
        display_order: i64,
        image_url: Option<String>,
    ) -> StoreResult<ProductSector> {
        let now = Utc::now();
        let sector = ProductSector {
            id: Uuid::new_v4().to_string(),
            name,
            name_ar,
            display_order,
            image_url,
            created_at: now,
            updated_at: now,
        };
        document::put(
            &self.pool,
            collections::SECTORS,
            &sector.id,
            &sector,
            now,
            now,
        )
        .await?;
        debug!(id = %sector.id, "Created product sector");
        Ok(sector)
    }

    pub async fn get(&self, id: &str) -> StoreResult<ProductSector> {
        document::fetch(&self.pool, collections::SECTORS, id)
            .await?
            .ok_or_else(|| StoreError::not_found("Product sector", id))
    }

    pub async fn update(&self, id: &str, patch: SectorPatch) -> StoreResult<ProductSector> {
        let mut sector = self.get(id).await?;

        if let Some(name) = patch.name {
            sector.name = name;
        }
        if let Some(name_ar) = patch.name_ar {
            sector.name_ar = Some(name_ar);
        }
        if let Some(display_order) = patch.display_order {
            sector.display_order = display_order;
        }
        if let Some(image_url) = patch.image_url {
            sector.image_url = Some(image_url);
        }

        sector.updated_at = Utc::now();
        document::put(
            &self.pool,
            collections::SECTORS,
            id,
            &sector,
            sector.created_at,
            sector.updated_at,
        )
        .await?;
        Ok(sector)
    }

    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        if !document::delete(&self.pool, collections::SECTORS, id).await? {
            return Err(StoreError::not_found("Product sector", id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, StoreConfig};

    #[tokio::test]
    async fn test_list_seeds_defaults_once() {
        let db = Database::new(StoreConfig::in_memory()).await.unwrap();
        let repo = db.sectors();

        let first = repo.list().await.unwrap();
        assert_eq!(first.len(), DEFAULT_SECTORS.len());

        // Second list must not re-seed.
        let second = repo.list().await.unwrap();
        assert_eq!(second.len(), DEFAULT_SECTORS.len());

        // Sorted by display order.
        let orders: Vec<i64> = second.iter().map(|s| s.display_order).collect();
        let mut sorted = orders.clone();
        sorted.sort();
        assert_eq!(orders, sorted);
    }

    #[tokio::test]
    async fn test_sector_crud() {
        let db = Database::new(StoreConfig::in_memory()).await.unwrap();
        let repo = db.sectors();

        let sector = repo
            .create("Lighting".into(), None, 42, None)
            .await
            .unwrap();

        let updated = repo
            .update(
                &sector.id,
                SectorPatch {
                    image_url: Some("http://localhost/files/sectors/a.png".into()),
                    ..SectorPatch::default()
                },
            )
            .await
            .unwrap();
        assert!(updated.image_url.is_some());

        repo.delete(&sector.id).await.unwrap();
        assert!(matches!(
            repo.get(&sector.id).await.unwrap_err(),
            StoreError::NotFound { .. }
        ));
    }
}
