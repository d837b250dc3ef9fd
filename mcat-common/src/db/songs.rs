//! Song database operations
//!
//! The songs table is the database-backed catalog sink: one row per
//! scanned file, keyed on `full_path`, replaced wholesale on re-scan.

use crate::models::SongRecord;
use crate::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// A song row as stored in the catalog database
#[derive(Debug, Clone, Serialize)]
pub struct StoredSong {
    pub guid: Uuid,
    #[serde(flatten)]
    pub record: SongRecord,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert or replace a song keyed on `full_path`.
///
/// Replace semantics, not merge: every record field (including
/// `thumbnail_path`) takes the new value. The `guid` and `created_at` of
/// an existing row are preserved; `updated_at` is refreshed.
pub async fn upsert_song(pool: &SqlitePool, record: &SongRecord) -> Result<()> {
    let now = Utc::now().to_rfc3339();

    sqlx::query(
        r#"
        INSERT INTO songs (guid, filename, full_path, title, artist, album, thumbnail_path, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(full_path) DO UPDATE SET
            filename = excluded.filename,
            title = excluded.title,
            artist = excluded.artist,
            album = excluded.album,
            thumbnail_path = excluded.thumbnail_path,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(&record.filename)
    .bind(&record.full_path)
    .bind(&record.title)
    .bind(&record.artist)
    .bind(&record.album)
    .bind(&record.thumbnail_path)
    .bind(&now)
    .bind(&now)
    .execute(pool)
    .await?;

    Ok(())
}

/// Load one song by guid
pub async fn load_song(pool: &SqlitePool, guid: Uuid) -> Result<Option<StoredSong>> {
    let row = sqlx::query(
        r#"
        SELECT guid, filename, full_path, title, artist, album, thumbnail_path, created_at, updated_at
        FROM songs
        WHERE guid = ?
        "#,
    )
    .bind(guid.to_string())
    .fetch_optional(pool)
    .await?;

    row.map(row_to_song).transpose()
}

/// Load one song by its full path
pub async fn load_song_by_path(pool: &SqlitePool, full_path: &str) -> Result<Option<StoredSong>> {
    let row = sqlx::query(
        r#"
        SELECT guid, filename, full_path, title, artist, album, thumbnail_path, created_at, updated_at
        FROM songs
        WHERE full_path = ?
        "#,
    )
    .bind(full_path)
    .fetch_optional(pool)
    .await?;

    row.map(row_to_song).transpose()
}

/// Load the whole catalog, newest first
pub async fn load_all_songs(pool: &SqlitePool) -> Result<Vec<StoredSong>> {
    let rows = sqlx::query(
        r#"
        SELECT guid, filename, full_path, title, artist, album, thumbnail_path, created_at, updated_at
        FROM songs
        ORDER BY created_at DESC, full_path
        "#,
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(row_to_song).collect()
}

/// Delete one song by guid, returning the deleted row so the caller can
/// clean up its thumbnail file
pub async fn delete_song(pool: &SqlitePool, guid: Uuid) -> Result<Option<StoredSong>> {
    let song = load_song(pool, guid).await?;

    if song.is_some() {
        sqlx::query("DELETE FROM songs WHERE guid = ?")
            .bind(guid.to_string())
            .execute(pool)
            .await?;
    }

    Ok(song)
}

/// Count songs in the catalog
pub async fn count_songs(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM songs")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

fn row_to_song(row: sqlx::sqlite::SqliteRow) -> Result<StoredSong> {
    let guid_str: String = row.get("guid");
    let guid = Uuid::parse_str(&guid_str)
        .map_err(|e| crate::Error::Internal(format!("Invalid guid in songs table: {}", e)))?;

    let created_at = parse_timestamp(&row, "created_at")?;
    let updated_at = parse_timestamp(&row, "updated_at")?;

    Ok(StoredSong {
        guid,
        record: SongRecord {
            filename: row.get("filename"),
            full_path: row.get("full_path"),
            title: row.get("title"),
            artist: row.get("artist"),
            album: row.get("album"),
            thumbnail_path: row.get("thumbnail_path"),
        },
        created_at,
        updated_at,
    })
}

fn parse_timestamp(row: &sqlx::sqlite::SqliteRow, column: &str) -> Result<DateTime<Utc>> {
    let value: String = row.get(column);
    DateTime::parse_from_rfc3339(&value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| crate::Error::Internal(format!("Invalid {} in songs table: {}", column, e)))
}
