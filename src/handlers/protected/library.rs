use axum::{extract::Path, Extension, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::PgPool;
use uuid::Uuid;

use crate::api::ApiJson;
use crate::db::models::{LikedTrackRow, SavedAlbumRow};
use crate::db::{self, DbError};
use crate::error::ApiError;
use crate::middleware::AuthUser;

#[derive(Debug, Serialize)]
pub struct LibraryOverview {
    pub albums: Vec<SavedAlbumRow>,
    pub tracks: Vec<LikedTrackRow>,
}

/// GET /api/library - saved albums and liked tracks in one response, the
/// two list reads issued concurrently.
pub async fn overview(
    Extension(user): Extension<AuthUser>,
) -> Result<Json<LibraryOverview>, ApiError> {
    let pool = db::pool().await?;

    let (albums, tracks) = tokio::join!(saved_albums(&pool, user.id), liked_tracks(&pool, user.id));

    match (albums, tracks) {
        (Ok(albums), Ok(tracks)) => Ok(Json(LibraryOverview { albums, tracks })),
        (albums, tracks) => {
            for err in [albums.err(), tracks.err()].into_iter().flatten() {
                tracing::error!("library read failed: {}", err);
            }
            Err(ApiError::internal_server_error("Failed to load library"))
        }
    }
}

async fn saved_albums(pool: &PgPool, user_id: Uuid) -> Result<Vec<SavedAlbumRow>, DbError> {
    let rows = sqlx::query_as::<_, SavedAlbumRow>(
        "SELECT s.album_id, a.title, b.name AS band_name, a.cover_url, \
                s.created_at AS saved_at \
         FROM saved_albums s \
         JOIN albums a ON a.id = s.album_id \
         JOIN bands b ON b.id = a.band_id \
         WHERE s.user_id = $1 \
         ORDER BY s.created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

async fn liked_tracks(pool: &PgPool, user_id: Uuid) -> Result<Vec<LikedTrackRow>, DbError> {
    let rows = sqlx::query_as::<_, LikedTrackRow>(
        "SELECT l.track_id, t.title, a.title AS album_title, b.name AS band_name, \
                l.created_at AS liked_at \
         FROM liked_tracks l \
         JOIN tracks t ON t.id = l.track_id \
         JOIN albums a ON a.id = t.album_id \
         JOIN bands b ON b.id = t.band_id \
         WHERE l.user_id = $1 \
         ORDER BY l.created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

#[derive(Debug, Deserialize)]
pub struct SaveAlbumRequest {
    pub album_id: Uuid,
}

/// POST /api/library/albums - save an album to the caller's library
pub async fn save_album(
    Extension(user): Extension<AuthUser>,
    ApiJson(body): ApiJson<SaveAlbumRequest>,
) -> Result<Json<Value>, ApiError> {
    let pool = db::pool().await?;

    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM albums WHERE id = $1)")
        .bind(body.album_id)
        .fetch_one(&pool)
        .await
        .map_err(DbError::from)?;
    if !exists {
        return Err(ApiError::not_found("album not found"));
    }

    sqlx::query(
        "INSERT INTO saved_albums (user_id, album_id) VALUES ($1, $2) \
         ON CONFLICT (user_id, album_id) DO NOTHING",
    )
    .bind(user.id)
    .bind(body.album_id)
    .execute(&pool)
    .await
    .map_err(DbError::from)?;

    Ok(Json(json!({ "saved": true })))
}

/// DELETE /api/library/albums/:album_id
pub async fn unsave_album(
    Extension(user): Extension<AuthUser>,
    Path(album_id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let pool = db::pool().await?;

    sqlx::query("DELETE FROM saved_albums WHERE user_id = $1 AND album_id = $2")
        .bind(user.id)
        .bind(album_id)
        .execute(&pool)
        .await
        .map_err(DbError::from)?;

    Ok(Json(json!({ "saved": false })))
}

#[derive(Debug, Deserialize)]
pub struct LikeTrackRequest {
    pub track_id: Uuid,
}

/// POST /api/library/tracks - like a track
pub async fn like_track(
    Extension(user): Extension<AuthUser>,
    ApiJson(body): ApiJson<LikeTrackRequest>,
) -> Result<Json<Value>, ApiError> {
    let pool = db::pool().await?;

    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM tracks WHERE id = $1)")
        .bind(body.track_id)
        .fetch_one(&pool)
        .await
        .map_err(DbError::from)?;
    if !exists {
        return Err(ApiError::not_found("track not found"));
    }

    sqlx::query(
        "INSERT INTO liked_tracks (user_id, track_id) VALUES ($1, $2) \
         ON CONFLICT (user_id, track_id) DO NOTHING",
    )
    .bind(user.id)
    .bind(body.track_id)
    .execute(&pool)
    .await
    .map_err(DbError::from)?;

    Ok(Json(json!({ "liked": true })))
}

/// DELETE /api/library/tracks/:track_id
pub async fn unlike_track(
    Extension(user): Extension<AuthUser>,
    Path(track_id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let pool = db::pool().await?;

    sqlx::query("DELETE FROM liked_tracks WHERE user_id = $1 AND track_id = $2")
        .bind(user.id)
        .bind(track_id)
        .execute(&pool)
        .await
        .map_err(DbError::from)?;

    Ok(Json(json!({ "liked": false })))
}
