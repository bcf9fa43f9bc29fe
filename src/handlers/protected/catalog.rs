//! Artist-side catalog writes: bands, albums, track submissions. Reads of
//! the public catalog are served elsewhere; these endpoints only create.

use axum::{http::StatusCode, Extension, Json};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::api::ApiJson;
use crate::db::models::{AlbumRow, BandRow};
use crate::db::{self, rpc, DbError};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::services::moderation;

#[derive(Debug, Deserialize)]
pub struct CreateBandRequest {
    pub name: String,
    pub genre: Option<String>,
    pub bio: Option<String>,
}

/// POST /api/bands
pub async fn create_band(
    Extension(user): Extension<AuthUser>,
    ApiJson(body): ApiJson<CreateBandRequest>,
) -> Result<(StatusCode, Json<BandRow>), ApiError> {
    let name = body.name.trim();
    if name.is_empty() {
        return Err(ApiError::bad_request("band name is required"));
    }

    let pool = db::pool().await?;
    let band = sqlx::query_as::<_, BandRow>(
        "INSERT INTO bands (owner_id, name, genre, bio) \
         VALUES ($1, $2, $3, $4) \
         RETURNING id, owner_id, name, genre, bio, created_at",
    )
    .bind(user.id)
    .bind(name)
    .bind(body.genre.as_deref())
    .bind(body.bio.as_deref())
    .fetch_one(&pool)
    .await
    .map_err(DbError::from)?;

    Ok((StatusCode::CREATED, Json(band)))
}

#[derive(Debug, Deserialize)]
pub struct CreateAlbumRequest {
    pub band_id: Uuid,
    pub title: String,
    pub genre: Option<String>,
    /// Storage key of an already-uploaded cover image.
    pub cover_key: Option<String>,
}

/// POST /api/albums - only the band owner may add albums to it. New albums
/// start unpublished.
pub async fn create_album(
    Extension(user): Extension<AuthUser>,
    ApiJson(body): ApiJson<CreateAlbumRequest>,
) -> Result<(StatusCode, Json<AlbumRow>), ApiError> {
    let title = body.title.trim();
    if title.is_empty() {
        return Err(ApiError::bad_request("album title is required"));
    }

    let pool = db::pool().await?;

    let owner: Option<Uuid> = sqlx::query_scalar("SELECT owner_id FROM bands WHERE id = $1")
        .bind(body.band_id)
        .fetch_optional(&pool)
        .await
        .map_err(DbError::from)?;
    let owner = owner.ok_or_else(|| ApiError::not_found("band not found"))?;
    if owner != user.id {
        return Err(ApiError::forbidden("not the band owner"));
    }

    let album = sqlx::query_as::<_, AlbumRow>(
        "INSERT INTO albums (band_id, title, genre, cover_url, published) \
         VALUES ($1, $2, $3, $4, FALSE) \
         RETURNING id, band_id, title, genre, cover_url, published, created_at",
    )
    .bind(body.band_id)
    .bind(title)
    .bind(body.genre.as_deref())
    .bind(body.cover_key.as_deref())
    .fetch_one(&pool)
    .await
    .map_err(DbError::from)?;

    Ok((StatusCode::CREATED, Json(album)))
}

#[derive(Debug, Deserialize)]
pub struct SubmitTrackRequest {
    pub album_id: Uuid,
    pub title: String,
    /// Storage key returned by the audio upload endpoint.
    pub audio_key: String,
    pub duration_secs: Option<i32>,
}

/// POST /api/tracks - submit a track to an album the caller owns. Whether
/// the submission lands in the moderation queue comes from the cached
/// platform setting; the write itself is a single procedure call either way.
pub async fn submit_track(
    Extension(user): Extension<AuthUser>,
    ApiJson(body): ApiJson<SubmitTrackRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let title = body.title.trim();
    if title.is_empty() {
        return Err(ApiError::bad_request("track title is required"));
    }
    if body.audio_key.trim().is_empty() {
        return Err(ApiError::bad_request("audio_key is required"));
    }

    let pool = db::pool().await?;

    let owner: Option<Uuid> = sqlx::query_scalar(
        "SELECT b.owner_id FROM albums a JOIN bands b ON b.id = a.band_id WHERE a.id = $1",
    )
    .bind(body.album_id)
    .fetch_optional(&pool)
    .await
    .map_err(DbError::from)?;
    let owner = owner.ok_or_else(|| ApiError::not_found("album not found"))?;
    if owner != user.id {
        return Err(ApiError::forbidden("not the album owner"));
    }

    let review_required = moderation::review_required().await?;

    let track = rpc::submit_track(
        &pool,
        body.album_id,
        title,
        body.audio_key.trim(),
        body.duration_secs,
        user.id,
        review_required,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(track)))
}
