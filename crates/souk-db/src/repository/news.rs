//! # News Repository
//!
//! CRUD for news items. The cover image itself lives in the blob store;
//! documents only carry its public URL.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use souk_core::types::NewsItem;

use crate::document::{self, collections, Order};
use crate::error::{StoreError, StoreResult};

/// Partial update for a news item; `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct NewsPatch {
    pub title: Option<String>,
    pub body: Option<String>,
    pub category: Option<String>,
    pub cover_image_url: Option<String>,
}

/// Repository for news documents.
#[derive(Debug, Clone)]
pub struct NewsRepository {
    pool: SqlitePool,
}

impl NewsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        NewsRepository { pool }
    }

    pub async fn create(
        &self,
        title: String,
        body: String,
        category: String,
        cover_image_url: Option<String>,
    ) -> StoreResult<NewsItem> {
        let now = Utc::now();
        let item = NewsItem {
            id: Uuid::new_v4().to_string(),
            title,
            body,
            category,
            cover_image_url,
            created_at: now,
            updated_at: now,
        };
        document::put(&self.pool, collections::NEWS, &item.id, &item, now, now).await?;
        debug!(id = %item.id, "Created news item");
        Ok(item)
    }

    /// Newest first.
    pub async fn list(&self) -> StoreResult<Vec<NewsItem>> {
        document::list(&self.pool, collections::NEWS, Order::CreatedDesc).await
    }

    pub async fn get(&self, id: &str) -> StoreResult<NewsItem> {
        document::fetch(&self.pool, collections::NEWS, id)
            .await?
            .ok_or_else(|| StoreError::not_found("News item", id))
    }

    pub async fn update(&self, id: &str, patch: NewsPatch) -> StoreResult<NewsItem> {
        let mut item = self.get(id).await?;

        if let Some(title) = patch.title {
            item.title = title;
        }
        if let Some(body) = patch.body {
            item.body = body;
        }
        if let Some(category) = patch.category {
            item.category = category;
        }
        if let Some(url) = patch.cover_image_url {
            item.cover_image_url = Some(url);
        }

        item.updated_at = Utc::now();
        document::put(
            &self.pool,
            collections::NEWS,
            id,
            &item,
            item.created_at,
            item.updated_at,
        )
        .await?;
        Ok(item)
    }

    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        if !document::delete(&self.pool, collections::NEWS, id).await? {
            return Err(StoreError::not_found("News item", id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, StoreConfig};

    #[tokio::test]
    async fn test_news_lifecycle() {
        let db = Database::new(StoreConfig::in_memory()).await.unwrap();
        let repo = db.news();

        let item = repo
            .create(
                "Launch".into(),
                "We opened.".into(),
                "announcements".into(),
                None,
            )
            .await
            .unwrap();
        assert!(!item.id.is_empty());
        assert!(item.updated_at >= item.created_at);

        let updated = repo
            .update(
                &item.id,
                NewsPatch {
                    cover_image_url: Some("http://localhost/files/news/x.png".into()),
                    ..NewsPatch::default()
                },
            )
            .await
            .unwrap();
        assert!(updated.cover_image_url.is_some());
        assert!(updated.updated_at >= updated.created_at);

        repo.delete(&item.id).await.unwrap();
        assert!(matches!(
            repo.get(&item.id).await.unwrap_err(),
            StoreError::NotFound { .. }
        ));
    }
}
