//! Upload metadata types and repository for the Depot index.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::{DepotError, Result};

/// One completed upload: the generated storage name, the original
/// client-supplied filename and the time of upload.
///
/// Records are written once and never modified. They are also never
/// removed automatically, so the table reads as an upload history
/// rather than a live inventory of the repository.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UploadRecord {
    /// Unique record ID.
    pub id: i64,
    /// Original filename supplied by the client (not unique).
    pub original_name: String,
    /// Generated storage name (UUID.ext format, unique).
    pub stored_name: String,
    /// When the upload completed.
    pub upload_time: DateTime<Utc>,
}

/// Data for recording a new upload.
#[derive(Debug, Clone)]
pub struct NewUpload {
    /// Original filename supplied by the client.
    pub original_name: String,
    /// Generated storage name.
    pub stored_name: String,
    /// When the upload completed.
    pub upload_time: DateTime<Utc>,
}

impl NewUpload {
    /// Create a new NewUpload stamped with the current time.
    pub fn new(original_name: impl Into<String>, stored_name: impl Into<String>) -> Self {
        Self {
            original_name: original_name.into(),
            stored_name: stored_name.into(),
            upload_time: Utc::now(),
        }
    }

    /// Set an explicit upload time.
    pub fn with_upload_time(mut self, upload_time: DateTime<Utc>) -> Self {
        self.upload_time = upload_time;
        self
    }
}

/// Repository for upload metadata operations.
pub struct UploadRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UploadRepository<'a> {
    /// Create a new UploadRepository with the given pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Append one immutable upload record.
    ///
    /// The stored name must be unique; the schema enforces it as a
    /// backstop for the generated-name guarantee.
    pub async fn record(&self, upload: &NewUpload) -> Result<UploadRecord> {
        let result = sqlx::query(
            "INSERT INTO uploads (original_name, stored_name, upload_time) VALUES (?, ?, ?)",
        )
        .bind(&upload.original_name)
        .bind(&upload.stored_name)
        .bind(upload.upload_time)
        .execute(self.pool)
        .await
        .map_err(|e| DepotError::Database(e.to_string()))?;

        let id = result.last_insert_rowid();
        self.get_by_id(id)
            .await?
            .ok_or_else(|| DepotError::NotFound("upload record".to_string()))
    }

    /// Get an upload record by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<UploadRecord>> {
        let record = sqlx::query_as::<_, UploadRecord>(
            "SELECT id, original_name, stored_name, upload_time FROM uploads WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| DepotError::Database(e.to_string()))?;

        Ok(record)
    }

    /// Get an upload record by stored name.
    pub async fn get_by_stored_name(&self, stored_name: &str) -> Result<Option<UploadRecord>> {
        let record = sqlx::query_as::<_, UploadRecord>(
            "SELECT id, original_name, stored_name, upload_time FROM uploads WHERE stored_name = ?",
        )
        .bind(stored_name)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| DepotError::Database(e.to_string()))?;

        Ok(record)
    }

    /// List all upload records, most recent upload first.
    pub async fn list_all(&self) -> Result<Vec<UploadRecord>> {
        let records = sqlx::query_as::<_, UploadRecord>(
            "SELECT id, original_name, stored_name, upload_time FROM uploads
             ORDER BY upload_time DESC, id DESC",
        )
        .fetch_all(self.pool)
        .await
        .map_err(|e| DepotError::Database(e.to_string()))?;

        Ok(records)
    }

    /// Count all upload records.
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM uploads")
            .fetch_one(self.pool)
            .await
            .map_err(|e| DepotError::Database(e.to_string()))?;

        Ok(count)
    }
}
