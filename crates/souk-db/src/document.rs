//! # Generic Document Layer
//!
//! All entities live in one `documents` table as JSON rows grouped by
//! collection name. The helpers here are generic over a sqlx executor so
//! every operation runs equally on the pool or inside a transaction — the
//! stock-decrement flow and the catalog cache updates rely on the latter.
//!
//! ## Table Shape
//! ```text
//! documents (collection, id, data JSON, created_at, updated_at)
//!            └── PRIMARY KEY (collection, id)
//! ```
//!
//! Timestamps are mirrored as columns for ordering; the authoritative copy
//! is the camelCase `createdAt`/`updatedAt` inside `data`.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::sqlite::Sqlite;
use sqlx::Executor;

use crate::error::{StoreError, StoreResult};

/// Collection names used by the repositories.
pub mod collections {
    pub const MAIN_CATEGORIES: &str = "main_categories";
    pub const CATEGORIES: &str = "categories";
    pub const SUBCATEGORIES: &str = "subcategories";
    pub const PRODUCTS: &str = "products";
    pub const NEWS: &str = "news";
    pub const SPECIAL_ORDERS: &str = "special_orders";
    pub const SECTORS: &str = "sectors";
    pub const COUNTERS: &str = "counters";
}

/// Listing order for [`list`].
#[derive(Debug, Clone, Copy)]
pub enum Order {
    CreatedAsc,
    CreatedDesc,
}

#[derive(Debug, sqlx::FromRow)]
struct DocRow {
    id: String,
    data: String,
}

fn decode<T: DeserializeOwned>(collection: &str, row: DocRow) -> StoreResult<T> {
    serde_json::from_str(&row.data).map_err(|e| StoreError::Corrupt {
        collection: collection.to_string(),
        id: row.id,
        message: e.to_string(),
    })
}

fn encode<T: Serialize>(collection: &str, id: &str, doc: &T) -> StoreResult<String> {
    serde_json::to_string(doc).map_err(|e| StoreError::Corrupt {
        collection: collection.to_string(),
        id: id.to_string(),
        message: e.to_string(),
    })
}

/// Inserts or replaces a document.
///
/// The caller owns id and timestamp assignment; this function mirrors them
/// into the ordering columns.
pub async fn put<'e, E, T>(
    executor: E,
    collection: &str,
    id: &str,
    doc: &T,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
) -> StoreResult<()>
where
    E: Executor<'e, Database = Sqlite>,
    T: Serialize,
{
    let data = encode(collection, id, doc)?;
    sqlx::query(
        r#"
        INSERT INTO documents (collection, id, data, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5)
        ON CONFLICT (collection, id) DO UPDATE SET
            data = excluded.data,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(collection)
    .bind(id)
    .bind(data)
    .bind(created_at.to_rfc3339())
    .bind(updated_at.to_rfc3339())
    .execute(executor)
    .await?;
    Ok(())
}

/// Fetches a document by id.
pub async fn fetch<'e, E, T>(executor: E, collection: &str, id: &str) -> StoreResult<Option<T>>
where
    E: Executor<'e, Database = Sqlite>,
    T: DeserializeOwned,
{
    let row: Option<DocRow> = sqlx::query_as(
        "SELECT id, data FROM documents WHERE collection = ?1 AND id = ?2",
    )
    .bind(collection)
    .bind(id)
    .fetch_optional(executor)
    .await?;

    row.map(|r| decode(collection, r)).transpose()
}

/// Fetches the first document whose JSON field equals `value`.
///
/// `field` is a top-level camelCase key inside `data` (e.g. `productCode`).
pub async fn fetch_by_field<'e, E, T>(
    executor: E,
    collection: &str,
    field: &str,
    value: &str,
) -> StoreResult<Option<T>>
where
    E: Executor<'e, Database = Sqlite>,
    T: DeserializeOwned,
{
    let path = format!("$.{field}");
    let row: Option<DocRow> = sqlx::query_as(
        r#"
        SELECT id, data FROM documents
        WHERE collection = ?1 AND json_extract(data, ?2) = ?3
        LIMIT 1
        "#,
    )
    .bind(collection)
    .bind(path)
    .bind(value)
    .fetch_optional(executor)
    .await?;

    row.map(|r| decode(collection, r)).transpose()
}

/// Lists every document whose JSON field equals `value`.
pub async fn list_by_field<'e, E, T>(
    executor: E,
    collection: &str,
    field: &str,
    value: &str,
) -> StoreResult<Vec<T>>
where
    E: Executor<'e, Database = Sqlite>,
    T: DeserializeOwned,
{
    let path = format!("$.{field}");
    let rows: Vec<DocRow> = sqlx::query_as(
        r#"
        SELECT id, data FROM documents
        WHERE collection = ?1 AND json_extract(data, ?2) = ?3
        ORDER BY created_at ASC
        "#,
    )
    .bind(collection)
    .bind(path)
    .bind(value)
    .fetch_all(executor)
    .await?;

    rows.into_iter().map(|r| decode(collection, r)).collect()
}

/// Lists every document in a collection.
pub async fn list<'e, E, T>(executor: E, collection: &str, order: Order) -> StoreResult<Vec<T>>
where
    E: Executor<'e, Database = Sqlite>,
    T: DeserializeOwned,
{
    let sql = match order {
        Order::CreatedAsc => {
            "SELECT id, data FROM documents WHERE collection = ?1 ORDER BY created_at ASC"
        }
        Order::CreatedDesc => {
            "SELECT id, data FROM documents WHERE collection = ?1 ORDER BY created_at DESC"
        }
    };
    let rows: Vec<DocRow> = sqlx::query_as(sql)
        .bind(collection)
        .fetch_all(executor)
        .await?;

    rows.into_iter().map(|r| decode(collection, r)).collect()
}

/// Deletes a document. Returns whether a row was removed.
pub async fn delete<'e, E>(executor: E, collection: &str, id: &str) -> StoreResult<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("DELETE FROM documents WHERE collection = ?1 AND id = ?2")
        .bind(collection)
        .bind(id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Counts documents in a collection.
pub async fn count<'e, E>(executor: E, collection: &str) -> StoreResult<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM documents WHERE collection = ?1")
        .bind(collection)
        .fetch_one(executor)
        .await?;
    Ok(count)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, StoreConfig};
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Doc {
        id: String,
        name: String,
    }

    async fn db() -> Database {
        Database::new(StoreConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_put_fetch_round_trip() {
        let db = db().await;
        let now = Utc::now();
        let doc = Doc {
            id: "d1".to_string(),
            name: "hello".to_string(),
        };

        put(db.pool(), "things", "d1", &doc, now, now).await.unwrap();
        let loaded: Option<Doc> = fetch(db.pool(), "things", "d1").await.unwrap();
        assert_eq!(loaded.unwrap(), doc);

        let absent: Option<Doc> = fetch(db.pool(), "things", "nope").await.unwrap();
        assert!(absent.is_none());
    }

    #[tokio::test]
    async fn test_fetch_by_field() {
        let db = db().await;
        let now = Utc::now();
        let doc = Doc {
            id: "d1".to_string(),
            name: "target".to_string(),
        };
        put(db.pool(), "things", "d1", &doc, now, now).await.unwrap();

        let found: Option<Doc> = fetch_by_field(db.pool(), "things", "name", "target")
            .await
            .unwrap();
        assert!(found.is_some());

        let missing: Option<Doc> = fetch_by_field(db.pool(), "things", "name", "other")
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_delete_and_count() {
        let db = db().await;
        let now = Utc::now();
        for i in 0..3 {
            let doc = Doc {
                id: format!("d{i}"),
                name: format!("doc {i}"),
            };
            put(db.pool(), "things", &doc.id, &doc, now, now)
                .await
                .unwrap();
        }

        assert_eq!(count(db.pool(), "things").await.unwrap(), 3);
        assert!(delete(db.pool(), "things", "d1").await.unwrap());
        assert!(!delete(db.pool(), "things", "d1").await.unwrap());
        assert_eq!(count(db.pool(), "things").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_collections_are_isolated() {
        let db = db().await;
        let now = Utc::now();
        let doc = Doc {
            id: "d1".to_string(),
            name: "x".to_string(),
        };
        put(db.pool(), "a", "d1", &doc, now, now).await.unwrap();

        let other: Option<Doc> = fetch(db.pool(), "b", "d1").await.unwrap();
        assert!(other.is_none());
    }
}
