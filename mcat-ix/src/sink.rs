//! Catalog sinks
//!
//! One scan pipeline, two persistence strategies: accumulate-then-flush
//! to a JSON document, or upsert-per-record into the catalog database.

use async_trait::async_trait;
use mcat_common::db::songs;
use mcat_common::models::SongRecord;
use sqlx::SqlitePool;
use std::path::PathBuf;
use thiserror::Error;

/// Sink errors; all of them abort the run
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Failed to write catalog {0}: {1}")]
    WriteCatalog(PathBuf, std::io::Error),

    #[error("Failed to serialize catalog: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Store(#[from] mcat_common::Error),
}

/// Persistence capability injected into the scan pipeline
#[async_trait]
pub trait CatalogSink {
    /// Persist one record
    async fn persist(&mut self, record: SongRecord) -> Result<(), SinkError>;

    /// Flush anything accumulated; called exactly once after the walk
    async fn finalize(&mut self) -> Result<(), SinkError>;
}

/// Accumulates records in walk order and writes the whole catalog as one
/// pretty-printed JSON array on finalize, overwriting any previous file
pub struct JsonFileSink {
    output_path: PathBuf,
    records: Vec<SongRecord>,
}

impl JsonFileSink {
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
            records: Vec::new(),
        }
    }

    pub fn output_path(&self) -> &std::path::Path {
        &self.output_path
    }
}

#[async_trait]
impl CatalogSink for JsonFileSink {
    async fn persist(&mut self, record: SongRecord) -> Result<(), SinkError> {
        self.records.push(record);
        Ok(())
    }

    async fn finalize(&mut self) -> Result<(), SinkError> {
        let json = serde_json::to_string_pretty(&self.records)?;
        std::fs::write(&self.output_path, json)
            .map_err(|e| SinkError::WriteCatalog(self.output_path.clone(), e))?;

        tracing::info!(
            "Wrote {} records to {}",
            self.records.len(),
            self.output_path.display()
        );
        Ok(())
    }
}

/// Upserts each record into the songs table as it is produced, keyed on
/// `full_path`. Replace semantics: a re-scan overwrites the whole record.
pub struct DatabaseSink {
    pool: SqlitePool,
}

impl DatabaseSink {
    /// The pool is opened once at pipeline start and lives for the whole
    /// run; dropping the sink releases it.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogSink for DatabaseSink {
    async fn persist(&mut self, record: SongRecord) -> Result<(), SinkError> {
        songs::upsert_song(&self.pool, &record).await?;
        Ok(())
    }

    async fn finalize(&mut self) -> Result<(), SinkError> {
        // Each record was already written durably
        tracing::debug!("Database sink finalized");
        Ok(())
    }
}
