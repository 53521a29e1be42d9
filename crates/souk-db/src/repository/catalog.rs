//! # Catalog Repository
//!
//! Main categories, categories, and subcategories, plus maintenance of the
//! denormalized `children` / `subchildren` caches embedded on main-category
//! documents.
//!
//! ## Cache Maintenance
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  MainCategory "Tools" (m1)                                          │
//! │    children:    ["Drills", "Saws"]          ← category names        │
//! │    subchildren: {"Drills": ["Cordless"],    ← per-category subcat   │
//! │                  "Saws":   []}                 names                │
//! │                                                                     │
//! │  create category  → union into children, seed subchildren key      │
//! │  rename category  → swap name in children, MOVE subchildren key    │
//! │  delete category  → remove from children, drop key, cascade subs   │
//! │  create/rename/delete subcategory → union/swap/remove in           │
//! │      category.children and main.subchildren[category name]         │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every cache mutation happens in the same transaction as the document it
//! derives from. `rebuild_tree` is the wholesale repair path: it recomputes
//! every cache from the relational collections and is idempotent.

use chrono::Utc;
use sqlx::SqlitePool;
use std::collections::BTreeMap;
use tracing::{debug, info};
use uuid::Uuid;

use souk_core::tree;
use souk_core::types::{Category, MainCategory, Subcategory};

use crate::document::{self, collections, Order};
use crate::error::{StoreError, StoreResult};

/// Firestore-style array mutation: append when absent.
fn array_union(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|v| v == value) {
        list.push(value.to_string());
    }
}

/// Firestore-style array mutation: remove all occurrences.
fn array_remove(list: &mut Vec<String>, value: &str) {
    list.retain(|v| v != value);
}

/// Repository for the category tree.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CatalogRepository { pool }
    }

    // =========================================================================
    // Main Categories
    // =========================================================================

    pub async fn create_main(
        &self,
        name: String,
        name_ar: Option<String>,
    ) -> StoreResult<MainCategory> {
        let now = Utc::now();
        let main = MainCategory {
            id: Uuid::new_v4().to_string(),
            name,
            name_ar,
            children: Vec::new(),
            subchildren: BTreeMap::new(),
            created_at: now,
            updated_at: now,
        };
        document::put(
            &self.pool,
            collections::MAIN_CATEGORIES,
            &main.id,
            &main,
            now,
            now,
        )
        .await?;
        debug!(id = %main.id, name = %main.name, "Created main category");
        Ok(main)
    }

    pub async fn list_mains(&self) -> StoreResult<Vec<MainCategory>> {
        document::list(&self.pool, collections::MAIN_CATEGORIES, Order::CreatedAsc).await
    }

    pub async fn get_main(&self, id: &str) -> StoreResult<MainCategory> {
        document::fetch(&self.pool, collections::MAIN_CATEGORIES, id)
            .await?
            .ok_or_else(|| StoreError::not_found("Main category", id))
    }

    /// Updates a main category's own fields. Renaming a main category does
    /// not touch any cache: children are keyed by category names and
    /// references use the stable id.
    pub async fn update_main(
        &self,
        id: &str,
        name: Option<String>,
        name_ar: Option<String>,
    ) -> StoreResult<MainCategory> {
        let mut main = self.get_main(id).await?;
        if let Some(name) = name {
            main.name = name;
        }
        if let Some(name_ar) = name_ar {
            main.name_ar = Some(name_ar);
        }
        main.updated_at = Utc::now();
        document::put(
            &self.pool,
            collections::MAIN_CATEGORIES,
            id,
            &main,
            main.created_at,
            main.updated_at,
        )
        .await?;
        Ok(main)
    }

    /// Deletes a main category and cascades to its categories and
    /// subcategories in one transaction.
    pub async fn delete_main(&self, id: &str) -> StoreResult<()> {
        // Existence check outside the transaction keeps the 404 path cheap.
        self.get_main(id).await?;

        let mut tx = self.pool.begin().await?;

        let cats: Vec<Category> = document::list_by_field(
            &mut *tx,
            collections::CATEGORIES,
            "mainCategoryId",
            id,
        )
        .await?;
        for cat in &cats {
            document::delete(&mut *tx, collections::CATEGORIES, &cat.id).await?;
        }

        let subs: Vec<Subcategory> = document::list_by_field(
            &mut *tx,
            collections::SUBCATEGORIES,
            "mainCategoryId",
            id,
        )
        .await?;
        for sub in &subs {
            document::delete(&mut *tx, collections::SUBCATEGORIES, &sub.id).await?;
        }

        document::delete(&mut *tx, collections::MAIN_CATEGORIES, id).await?;
        tx.commit().await?;

        debug!(id = %id, categories = cats.len(), subcategories = subs.len(),
               "Deleted main category (cascade)");
        Ok(())
    }

    // =========================================================================
    // Categories
    // =========================================================================

    pub async fn create_category(
        &self,
        name: String,
        name_ar: Option<String>,
        main_category_id: String,
    ) -> StoreResult<Category> {
        let mut tx = self.pool.begin().await?;

        let mut main: MainCategory =
            document::fetch(&mut *tx, collections::MAIN_CATEGORIES, &main_category_id)
                .await?
                .ok_or_else(|| StoreError::not_found("Main category", &main_category_id))?;

        let now = Utc::now();
        let category = Category {
            id: Uuid::new_v4().to_string(),
            name,
            name_ar,
            main_category_id,
            children: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        document::put(
            &mut *tx,
            collections::CATEGORIES,
            &category.id,
            &category,
            now,
            now,
        )
        .await?;

        array_union(&mut main.children, &category.name);
        main.subchildren.entry(category.name.clone()).or_default();
        main.updated_at = now;
        document::put(
            &mut *tx,
            collections::MAIN_CATEGORIES,
            &main.id,
            &main,
            main.created_at,
            now,
        )
        .await?;

        tx.commit().await?;
        debug!(id = %category.id, name = %category.name, "Created category");
        Ok(category)
    }

    pub async fn list_categories(&self) -> StoreResult<Vec<Category>> {
        document::list(&self.pool, collections::CATEGORIES, Order::CreatedAsc).await
    }

    pub async fn get_category(&self, id: &str) -> StoreResult<Category> {
        document::fetch(&self.pool, collections::CATEGORIES, id)
            .await?
            .ok_or_else(|| StoreError::not_found("Category", id))
    }

    /// Updates a category. A rename swaps the name in the main's `children`
    /// and moves `subchildren[oldName]` to the new key in the same update,
    /// preserving the cached subcategory list.
    pub async fn update_category(
        &self,
        id: &str,
        name: Option<String>,
        name_ar: Option<String>,
    ) -> StoreResult<Category> {
        let mut tx = self.pool.begin().await?;

        let mut category: Category = document::fetch(&mut *tx, collections::CATEGORIES, id)
            .await?
            .ok_or_else(|| StoreError::not_found("Category", id))?;

        let now = Utc::now();
        let old_name = category.name.clone();

        if let Some(name_ar) = name_ar {
            category.name_ar = Some(name_ar);
        }

        if let Some(new_name) = name {
            if new_name != old_name {
                let main: Option<MainCategory> = document::fetch(
                    &mut *tx,
                    collections::MAIN_CATEGORIES,
                    &category.main_category_id,
                )
                .await?;
                if let Some(mut main) = main {
                    array_remove(&mut main.children, &old_name);
                    array_union(&mut main.children, &new_name);

                    // Move the subchildren list from the old key to the new
                    // key; after this the old key is absent.
                    let subs = main.subchildren.remove(&old_name).unwrap_or_default();
                    main.subchildren.insert(new_name.clone(), subs);

                    main.updated_at = now;
                    document::put(
                        &mut *tx,
                        collections::MAIN_CATEGORIES,
                        &main.id,
                        &main,
                        main.created_at,
                        now,
                    )
                    .await?;
                }
                category.name = new_name;
            }
        }

        category.updated_at = now;
        document::put(
            &mut *tx,
            collections::CATEGORIES,
            id,
            &category,
            category.created_at,
            now,
        )
        .await?;

        tx.commit().await?;
        debug!(id = %id, old = %old_name, new = %category.name, "Updated category");
        Ok(category)
    }

    /// Deletes a category, its subcategories, and its cache entries in one
    /// transaction.
    pub async fn delete_category(&self, id: &str) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        let category: Category = document::fetch(&mut *tx, collections::CATEGORIES, id)
            .await?
            .ok_or_else(|| StoreError::not_found("Category", id))?;

        let subs: Vec<Subcategory> =
            document::list_by_field(&mut *tx, collections::SUBCATEGORIES, "categoryId", id)
                .await?;
        for sub in &subs {
            document::delete(&mut *tx, collections::SUBCATEGORIES, &sub.id).await?;
        }

        let main: Option<MainCategory> = document::fetch(
            &mut *tx,
            collections::MAIN_CATEGORIES,
            &category.main_category_id,
        )
        .await?;
        if let Some(mut main) = main {
            array_remove(&mut main.children, &category.name);
            main.subchildren.remove(&category.name);
            main.updated_at = Utc::now();
            document::put(
                &mut *tx,
                collections::MAIN_CATEGORIES,
                &main.id,
                &main,
                main.created_at,
                main.updated_at,
            )
            .await?;
        }

        document::delete(&mut *tx, collections::CATEGORIES, id).await?;
        tx.commit().await?;

        debug!(id = %id, subcategories = subs.len(), "Deleted category (cascade)");
        Ok(())
    }

    // =========================================================================
    // Subcategories
    // =========================================================================

    pub async fn create_subcategory(
        &self,
        name: String,
        name_ar: Option<String>,
        category_id: String,
    ) -> StoreResult<Subcategory> {
        let mut tx = self.pool.begin().await?;

        let mut category: Category =
            document::fetch(&mut *tx, collections::CATEGORIES, &category_id)
                .await?
                .ok_or_else(|| StoreError::not_found("Category", &category_id))?;

        let now = Utc::now();
        let sub = Subcategory {
            id: Uuid::new_v4().to_string(),
            name,
            name_ar,
            category_id,
            main_category_id: category.main_category_id.clone(),
            created_at: now,
            updated_at: now,
        };
        document::put(&mut *tx, collections::SUBCATEGORIES, &sub.id, &sub, now, now).await?;

        array_union(&mut category.children, &sub.name);
        category.updated_at = now;
        document::put(
            &mut *tx,
            collections::CATEGORIES,
            &category.id,
            &category,
            category.created_at,
            now,
        )
        .await?;

        let main: Option<MainCategory> = document::fetch(
            &mut *tx,
            collections::MAIN_CATEGORIES,
            &sub.main_category_id,
        )
        .await?;
        if let Some(mut main) = main {
            array_union(
                main.subchildren.entry(category.name.clone()).or_default(),
                &sub.name,
            );
            main.updated_at = now;
            document::put(
                &mut *tx,
                collections::MAIN_CATEGORIES,
                &main.id,
                &main,
                main.created_at,
                now,
            )
            .await?;
        }

        tx.commit().await?;
        debug!(id = %sub.id, name = %sub.name, "Created subcategory");
        Ok(sub)
    }

    pub async fn list_subcategories(&self) -> StoreResult<Vec<Subcategory>> {
        document::list(&self.pool, collections::SUBCATEGORIES, Order::CreatedAsc).await
    }

    pub async fn get_subcategory(&self, id: &str) -> StoreResult<Subcategory> {
        document::fetch(&self.pool, collections::SUBCATEGORIES, id)
            .await?
            .ok_or_else(|| StoreError::not_found("Subcategory", id))
    }

    /// Updates a subcategory; a rename swaps its name in the parent
    /// category's `children` and the main's `subchildren[categoryName]`.
    pub async fn update_subcategory(
        &self,
        id: &str,
        name: Option<String>,
        name_ar: Option<String>,
    ) -> StoreResult<Subcategory> {
        let mut tx = self.pool.begin().await?;

        let mut sub: Subcategory = document::fetch(&mut *tx, collections::SUBCATEGORIES, id)
            .await?
            .ok_or_else(|| StoreError::not_found("Subcategory", id))?;

        let now = Utc::now();
        let old_name = sub.name.clone();

        if let Some(name_ar) = name_ar {
            sub.name_ar = Some(name_ar);
        }

        if let Some(new_name) = name {
            if new_name != old_name {
                let category: Option<Category> =
                    document::fetch(&mut *tx, collections::CATEGORIES, &sub.category_id).await?;
                let category_name = category.as_ref().map(|c| c.name.clone());

                if let Some(mut category) = category {
                    array_remove(&mut category.children, &old_name);
                    array_union(&mut category.children, &new_name);
                    category.updated_at = now;
                    document::put(
                        &mut *tx,
                        collections::CATEGORIES,
                        &category.id,
                        &category,
                        category.created_at,
                        now,
                    )
                    .await?;
                }

                if let Some(category_name) = category_name {
                    let main: Option<MainCategory> = document::fetch(
                        &mut *tx,
                        collections::MAIN_CATEGORIES,
                        &sub.main_category_id,
                    )
                    .await?;
                    if let Some(mut main) = main {
                        if let Some(list) = main.subchildren.get_mut(&category_name) {
                            array_remove(list, &old_name);
                            array_union(list, &new_name);
                        }
                        main.updated_at = now;
                        document::put(
                            &mut *tx,
                            collections::MAIN_CATEGORIES,
                            &main.id,
                            &main,
                            main.created_at,
                            now,
                        )
                        .await?;
                    }
                }

                sub.name = new_name;
            }
        }

        sub.updated_at = now;
        document::put(
            &mut *tx,
            collections::SUBCATEGORIES,
            id,
            &sub,
            sub.created_at,
            now,
        )
        .await?;

        tx.commit().await?;
        Ok(sub)
    }

    /// Deletes a subcategory and removes it from both caches.
    pub async fn delete_subcategory(&self, id: &str) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        let sub: Subcategory = document::fetch(&mut *tx, collections::SUBCATEGORIES, id)
            .await?
            .ok_or_else(|| StoreError::not_found("Subcategory", id))?;

        let now = Utc::now();

        let category: Option<Category> =
            document::fetch(&mut *tx, collections::CATEGORIES, &sub.category_id).await?;
        let category_name = category.as_ref().map(|c| c.name.clone());

        if let Some(mut category) = category {
            array_remove(&mut category.children, &sub.name);
            category.updated_at = now;
            document::put(
                &mut *tx,
                collections::CATEGORIES,
                &category.id,
                &category,
                category.created_at,
                now,
            )
            .await?;
        }

        if let Some(category_name) = category_name {
            let main: Option<MainCategory> = document::fetch(
                &mut *tx,
                collections::MAIN_CATEGORIES,
                &sub.main_category_id,
            )
            .await?;
            if let Some(mut main) = main {
                if let Some(list) = main.subchildren.get_mut(&category_name) {
                    array_remove(list, &sub.name);
                }
                main.updated_at = now;
                document::put(
                    &mut *tx,
                    collections::MAIN_CATEGORIES,
                    &main.id,
                    &main,
                    main.created_at,
                    now,
                )
                .await?;
            }
        }

        document::delete(&mut *tx, collections::SUBCATEGORIES, id).await?;
        tx.commit().await?;
        Ok(())
    }

    // =========================================================================
    // Migration
    // =========================================================================

    /// Wholesale recomputation of every main category's `children` /
    /// `subchildren` from the relational collections. Returns the number of
    /// main categories written. Idempotent: the computed content is sorted
    /// and set-valued.
    pub async fn rebuild_tree(&self) -> StoreResult<u64> {
        let mains = self.list_mains().await?;
        let categories = self.list_categories().await?;
        let subcategories = self.list_subcategories().await?;

        let snapshots = tree::rebuild(&mains, &categories, &subcategories);

        let mut tx = self.pool.begin().await?;
        let now = Utc::now();
        let mut written = 0u64;

        for mut main in mains {
            let Some(snapshot) = snapshots.get(&main.id) else {
                continue;
            };
            main.children = snapshot.children.clone();
            main.subchildren = snapshot.subchildren.clone();
            main.updated_at = now;
            document::put(
                &mut *tx,
                collections::MAIN_CATEGORIES,
                &main.id,
                &main,
                main.created_at,
                now,
            )
            .await?;
            written += 1;
        }

        tx.commit().await?;
        info!(main_categories = written, "Rebuilt category tree caches");
        Ok(written)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, StoreConfig};

    async fn db() -> Database {
        Database::new(StoreConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_category_updates_main_caches() {
        let db = db().await;
        let repo = db.catalog();

        let main = repo.create_main("Tools".into(), None).await.unwrap();
        repo.create_category("Drills".into(), None, main.id.clone())
            .await
            .unwrap();

        let main = repo.get_main(&main.id).await.unwrap();
        assert_eq!(main.children, vec!["Drills"]);
        assert!(main.subchildren["Drills"].is_empty());
    }

    #[tokio::test]
    async fn test_create_category_requires_existing_main() {
        let db = db().await;
        let repo = db.catalog();

        let err = repo
            .create_category("Drills".into(), None, "missing".into())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
        assert!(repo.list_categories().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rename_category_moves_subchildren_key() {
        let db = db().await;
        let repo = db.catalog();

        let main = repo.create_main("Tools".into(), None).await.unwrap();
        let cat = repo
            .create_category("Drills".into(), None, main.id.clone())
            .await
            .unwrap();
        repo.create_subcategory("Cordless".into(), None, cat.id.clone())
            .await
            .unwrap();
        repo.create_subcategory("Hammer".into(), None, cat.id.clone())
            .await
            .unwrap();

        repo.update_category(&cat.id, Some("Power Drills".into()), None)
            .await
            .unwrap();

        let main = repo.get_main(&main.id).await.unwrap();
        assert!(!main.subchildren.contains_key("Drills"));
        assert_eq!(main.subchildren["Power Drills"], vec!["Cordless", "Hammer"]);
        assert_eq!(main.children, vec!["Power Drills"]);
    }

    #[tokio::test]
    async fn test_subcategory_lifecycle_maintains_caches() {
        let db = db().await;
        let repo = db.catalog();

        let main = repo.create_main("Tools".into(), None).await.unwrap();
        let cat = repo
            .create_category("Saws".into(), None, main.id.clone())
            .await
            .unwrap();
        let sub = repo
            .create_subcategory("Circular".into(), None, cat.id.clone())
            .await
            .unwrap();

        let main_doc = repo.get_main(&main.id).await.unwrap();
        assert_eq!(main_doc.subchildren["Saws"], vec!["Circular"]);
        assert_eq!(repo.get_category(&cat.id).await.unwrap().children, vec!["Circular"]);

        repo.update_subcategory(&sub.id, Some("Table".into()), None)
            .await
            .unwrap();
        let main_doc = repo.get_main(&main.id).await.unwrap();
        assert_eq!(main_doc.subchildren["Saws"], vec!["Table"]);

        repo.delete_subcategory(&sub.id).await.unwrap();
        let main_doc = repo.get_main(&main.id).await.unwrap();
        assert!(main_doc.subchildren["Saws"].is_empty());
        assert!(repo.get_category(&cat.id).await.unwrap().children.is_empty());
    }

    #[tokio::test]
    async fn test_delete_category_cascades() {
        let db = db().await;
        let repo = db.catalog();

        let main = repo.create_main("Tools".into(), None).await.unwrap();
        let cat = repo
            .create_category("Drills".into(), None, main.id.clone())
            .await
            .unwrap();
        repo.create_subcategory("Cordless".into(), None, cat.id.clone())
            .await
            .unwrap();

        repo.delete_category(&cat.id).await.unwrap();

        let main = repo.get_main(&main.id).await.unwrap();
        assert!(main.children.is_empty());
        assert!(main.subchildren.is_empty());
        assert!(repo.list_subcategories().await.unwrap().is_empty());
        assert!(matches!(
            repo.get_category(&cat.id).await.unwrap_err(),
            StoreError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_rebuild_tree_repairs_and_is_idempotent() {
        let db = db().await;
        let repo = db.catalog();

        let main = repo.create_main("Tools".into(), None).await.unwrap();
        let cat = repo
            .create_category("Drills".into(), None, main.id.clone())
            .await
            .unwrap();
        repo.create_subcategory("Cordless".into(), None, cat.id.clone())
            .await
            .unwrap();

        // Corrupt the cache, then repair it.
        let mut broken = repo.get_main(&main.id).await.unwrap();
        broken.children = vec!["Bogus".into()];
        broken.subchildren.clear();
        document::put(
            db.pool(),
            collections::MAIN_CATEGORIES,
            &broken.id,
            &broken,
            broken.created_at,
            Utc::now(),
        )
        .await
        .unwrap();

        assert_eq!(repo.rebuild_tree().await.unwrap(), 1);
        let repaired = repo.get_main(&main.id).await.unwrap();
        assert_eq!(repaired.children, vec!["Drills"]);
        assert_eq!(repaired.subchildren["Drills"], vec!["Cordless"]);

        repo.rebuild_tree().await.unwrap();
        let again = repo.get_main(&main.id).await.unwrap();
        assert_eq!(again.children, repaired.children);
        assert_eq!(again.subchildren, repaired.subchildren);
    }
}
