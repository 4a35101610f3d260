use async_trait::async_trait;
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use super::SqliteRepository;
use crate::repository::{CacheEntryRecord, CacheStore, StorageError};

fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn map_entry(row: &SqliteRow) -> Result<CacheEntryRecord, StorageError> {
    let status: i64 = row.try_get("status").map_err(ser)?;
    let status = u16::try_from(status).map_err(ser)?;
    Ok(CacheEntryRecord {
        status,
        content_type: row.try_get("content_type").map_err(ser)?,
        body: row.try_get("body").map_err(ser)?,
    })
}

#[async_trait]
impl CacheStore for SqliteRepository {
    async fn open_cache(&self, cache_name: &str) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO caches (name, created_at)
            VALUES (?1, datetime('now'))
            ON CONFLICT(name) DO NOTHING
            ",
        )
        .bind(cache_name)
        .execute(&self.pool)
        .await
        .map_err(conn)?;
        Ok(())
    }

    async fn cache_names(&self) -> Result<Vec<String>, StorageError> {
        let rows = sqlx::query("SELECT name FROM caches ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(conn)?;
        rows.iter()
            .map(|row| row.try_get::<String, _>("name").map_err(ser))
            .collect()
    }

    async fn delete_cache(&self, cache_name: &str) -> Result<bool, StorageError> {
        let res = sqlx::query("DELETE FROM caches WHERE name = ?1")
            .bind(cache_name)
            .execute(&self.pool)
            .await
            .map_err(conn)?;
        Ok(res.rows_affected() > 0)
    }

    async fn match_entry(
        &self,
        cache_name: &str,
        request_key: &str,
    ) -> Result<Option<CacheEntryRecord>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT status, content_type, body
            FROM cache_entries
            WHERE cache_name = ?1 AND request_key = ?2
            ",
        )
        .bind(cache_name)
        .bind(request_key)
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?;

        row.as_ref().map(map_entry).transpose()
    }

    async fn put_entry(
        &self,
        cache_name: &str,
        request_key: &str,
        entry: &CacheEntryRecord,
    ) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await.map_err(conn)?;

        sqlx::query(
            r"
            INSERT INTO caches (name, created_at)
            VALUES (?1, datetime('now'))
            ON CONFLICT(name) DO NOTHING
            ",
        )
        .bind(cache_name)
        .execute(&mut *tx)
        .await
        .map_err(conn)?;

        sqlx::query(
            r"
            INSERT INTO cache_entries (cache_name, request_key, status, content_type, body)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(cache_name, request_key) DO UPDATE SET
                status = excluded.status,
                content_type = excluded.content_type,
                body = excluded.body
            ",
        )
        .bind(cache_name)
        .bind(request_key)
        .bind(i64::from(entry.status))
        .bind(entry.content_type.as_deref())
        .bind(entry.body.as_slice())
        .execute(&mut *tx)
        .await
        .map_err(conn)?;

        tx.commit().await.map_err(conn)?;
        Ok(())
    }

    async fn keys(&self, cache_name: &str) -> Result<Vec<String>, StorageError> {
        let exists = sqlx::query("SELECT 1 FROM caches WHERE name = ?1")
            .bind(cache_name)
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?;
        if exists.is_none() {
            return Err(StorageError::NotFound);
        }

        let rows = sqlx::query(
            "SELECT request_key FROM cache_entries WHERE cache_name = ?1 ORDER BY request_key",
        )
        .bind(cache_name)
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;
        rows.iter()
            .map(|row| row.try_get::<String, _>("request_key").map_err(ser))
            .collect()
    }
}
