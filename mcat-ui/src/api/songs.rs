//! Song catalog endpoints
//!
//! GET /api/songs, GET /api/songs/:guid, DELETE /api/songs/:guid,
//! GET /api/songs/:guid/stream

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde_json::json;
use uuid::Uuid;

use crate::{api::stream, ApiError, ApiResult, AppState};
use mcat_common::db::songs::{self, StoredSong};

/// Build song routes
pub fn song_routes() -> Router<AppState> {
    Router::new()
        .route("/songs", get(list_songs))
        .route("/songs/:guid", get(get_song).delete(delete_song))
        .route("/songs/:guid/stream", get(stream::stream_song))
}

/// GET /api/songs
///
/// The whole catalog, newest first.
pub async fn list_songs(State(state): State<AppState>) -> ApiResult<Json<Vec<StoredSong>>> {
    let songs = songs::load_all_songs(&state.db).await?;
    Ok(Json(songs))
}

/// GET /api/songs/:guid
pub async fn get_song(
    State(state): State<AppState>,
    Path(guid): Path<Uuid>,
) -> ApiResult<Json<StoredSong>> {
    songs::load_song(&state.db, guid)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Song not found: {}", guid)))
}

/// DELETE /api/songs/:guid
///
/// Removes the row and best-effort deletes its thumbnail file.
pub async fn delete_song(
    State(state): State<AppState>,
    Path(guid): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let song = songs::delete_song(&state.db, guid)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Song not found: {}", guid)))?;

    if let Some(thumbnail) = &song.record.thumbnail_path {
        // The row is already gone; a missing thumbnail is not an error
        if let Err(e) = std::fs::remove_file(thumbnail) {
            tracing::warn!("Failed to delete thumbnail {}: {}", thumbnail, e);
        }
    }

    tracing::info!(guid = %guid, path = %song.record.full_path, "Song deleted");

    Ok(Json(json!({ "message": "Song deleted from catalog" })))
}
