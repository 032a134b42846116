//! Content store accessor.
//!
//! Reads come in two flavours: the plain ones used by public rendering log a
//! storage failure and degrade to "no data", the `try_` ones report it.
//! Writes always report storage failures.

use chrono::{SecondsFormat, Utc};
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::ContentBlock;
use crate::schema::validate_content_data;

/// Access to the `content_blocks` table.
#[derive(Clone)]
pub struct ContentStore {
    pool: SqlitePool,
}

impl ContentStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a block by slug, or `None` when absent or unreadable.
    pub async fn fetch_content_block(&self, slug: &str) -> Option<ContentBlock> {
        match self.try_fetch_content_block(slug).await {
            Ok(block) => block,
            Err(e) => {
                tracing::warn!("Reading content block '{}' failed, serving none: {}", slug, e);
                None
            }
        }
    }

    /// Get a block by slug.
    pub async fn try_fetch_content_block(
        &self,
        slug: &str,
    ) -> Result<Option<ContentBlock>, AppError> {
        let row = sqlx::query("SELECT slug, data, updated_at FROM content_blocks WHERE slug = ?")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(block_from_row).transpose()
    }

    /// List all blocks ordered by slug, or nothing when storage fails.
    pub async fn fetch_all_content_blocks(&self) -> Vec<ContentBlock> {
        match self.try_fetch_all_content_blocks().await {
            Ok(blocks) => blocks,
            Err(e) => {
                tracing::warn!("Reading content blocks failed, serving none: {}", e);
                Vec::new()
            }
        }
    }

    /// List all blocks ordered by slug.
    pub async fn try_fetch_all_content_blocks(&self) -> Result<Vec<ContentBlock>, AppError> {
        let rows = sqlx::query("SELECT slug, data, updated_at FROM content_blocks ORDER BY slug")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(block_from_row).collect()
    }

    /// Validate `raw` against the slug's schema and insert or replace the block.
    ///
    /// Nothing touches the database when validation fails. Concurrent writers
    /// to the same slug are last-write-wins.
    pub async fn upsert_content_block(
        &self,
        slug: &str,
        raw: &serde_json::Value,
    ) -> Result<ContentBlock, AppError> {
        let data = validate_content_data(slug, raw)?;
        let data_json = data.to_value()?.to_string();
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

        let row = sqlx::query(
            r#"
            INSERT INTO content_blocks (slug, data, updated_at) VALUES (?, ?, ?)
            ON CONFLICT(slug) DO UPDATE SET data = excluded.data, updated_at = excluded.updated_at
            RETURNING slug, data, updated_at
            "#,
        )
        .bind(data.slug().as_str())
        .bind(&data_json)
        .bind(&now)
        .fetch_one(&self.pool)
        .await?;

        let block = block_from_row(&row)?;
        tracing::info!("Saved content block '{}' at {}", block.slug, block.updated_at);

        Ok(block)
    }
}

// Helper functions for row conversion

fn block_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<ContentBlock, AppError> {
    let slug: String = row.get("slug");
    let data: String = row.get("data");
    let data = serde_json::from_str(&data).map_err(|e| {
        AppError::Storage(format!("Stored data for '{}' is not valid JSON: {}", slug, e))
    })?;

    Ok(ContentBlock {
        slug,
        data,
        updated_at: row.get("updated_at"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_database;
    use serde_json::json;
    use tempfile::TempDir;

    async fn store() -> (ContentStore, SqlitePool, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let pool = init_database(&temp_dir.path().join("content.sqlite"))
            .await
            .unwrap();
        (ContentStore::new(pool.clone()), pool, temp_dir)
    }

    #[tokio::test]
    async fn test_missing_block_is_none() {
        let (store, _pool, _dir) = store().await;

        assert!(store.fetch_content_block("hours").await.is_none());
        assert!(store.try_fetch_content_block("hours").await.unwrap().is_none());
        assert!(store.fetch_all_content_blocks().await.is_empty());
    }

    #[tokio::test]
    async fn test_upsert_then_fetch() {
        let (store, _pool, _dir) = store().await;

        let saved = store
            .upsert_content_block("hours", &json!({ "text": "Po-Pá 9-17" }))
            .await
            .unwrap();
        assert_eq!(saved.slug, "hours");
        assert_eq!(saved.data, json!({ "text": "Po-Pá 9-17" }));
        assert!(saved.updated_at.ends_with('Z'));

        let fetched = store.fetch_content_block("hours").await.unwrap();
        assert_eq!(fetched, saved);
    }

    #[tokio::test]
    async fn test_upsert_is_idempotent_on_data() {
        let (store, _pool, _dir) = store().await;
        let payload = json!({ "rows": [{ "duration": "1 h", "adults": "150", "kids": "100" }] });

        let first = store.upsert_content_block("pricing", &payload).await.unwrap();
        let second = store.upsert_content_block("pricing", &payload).await.unwrap();

        assert_eq!(first.data, second.data);
        assert_eq!(store.fetch_all_content_blocks().await.len(), 1);
    }

    #[tokio::test]
    async fn test_upsert_replaces_data() {
        let (store, _pool, _dir) = store().await;

        store
            .upsert_content_block("hours", &json!({ "text": "9-17" }))
            .await
            .unwrap();
        store
            .upsert_content_block("hours", &json!({ "text": "10-16" }))
            .await
            .unwrap();

        let block = store.fetch_content_block("hours").await.unwrap();
        assert_eq!(block.data["text"], "10-16");
    }

    #[tokio::test]
    async fn test_upsert_stores_normalized_data() {
        let (store, _pool, _dir) = store().await;

        let block = store
            .upsert_content_block(
                "hero",
                &json!({ "tagline": "Vlek", "webcamUrl": "https://cam.cz", "junk": true }),
            )
            .await
            .unwrap();

        assert_eq!(
            block.data,
            json!({
                "tagline": "Vlek",
                "webcamUrl": "https://cam.cz",
                "noticeBanner": { "isVisible": false, "text": "" }
            })
        );
    }

    #[tokio::test]
    async fn test_invalid_payload_writes_nothing() {
        let (store, _pool, _dir) = store().await;

        let err = store
            .upsert_content_block("hero", &json!({ "tagline": "T", "webcamUrl": "not-a-url" }))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let err = store
            .upsert_content_block("params", &json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UnknownSlug(_)));

        assert!(store.fetch_all_content_blocks().await.is_empty());
    }

    #[tokio::test]
    async fn test_list_is_ordered_by_slug() {
        let (store, _pool, _dir) = store().await;

        store
            .upsert_content_block("pricing", &json!({ "rows": [] }))
            .await
            .unwrap();
        store
            .upsert_content_block("hours", &json!({ "text": "9-17" }))
            .await
            .unwrap();
        store
            .upsert_content_block("admin-allowlist", &json!({ "emails": [] }))
            .await
            .unwrap();

        let slugs: Vec<String> = store
            .fetch_all_content_blocks()
            .await
            .into_iter()
            .map(|b| b.slug)
            .collect();
        assert_eq!(slugs, vec!["admin-allowlist", "hours", "pricing"]);
    }

    #[tokio::test]
    async fn test_reads_degrade_but_writes_fail_when_storage_is_gone() {
        let (store, pool, _dir) = store().await;
        store
            .upsert_content_block("hours", &json!({ "text": "9-17" }))
            .await
            .unwrap();

        pool.close().await;

        assert!(store.fetch_content_block("hours").await.is_none());
        assert!(store.fetch_all_content_blocks().await.is_empty());
        assert!(matches!(
            store.try_fetch_content_block("hours").await,
            Err(AppError::Storage(_))
        ));

        let err = store
            .upsert_content_block("hours", &json!({ "text": "10-16" }))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));
    }
}
