//! Relationship-status probes. These sit on public routes because the
//! client asks them before login too; anonymous callers get the documented
//! negative default instead of a 401.

use axum::{extract::Query, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::db::{self, DbError};
use crate::error::ApiError;
use crate::middleware::OptionalUser;

#[derive(Debug, Deserialize)]
pub struct BandQuery {
    pub band_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct AlbumQuery {
    pub album_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct TrackQuery {
    pub track_id: Uuid,
}

/// GET /api/follows/status
pub async fn follow_status(
    OptionalUser(user): OptionalUser,
    Query(query): Query<BandQuery>,
) -> Result<Json<Value>, ApiError> {
    let Some(user) = user else {
        return Ok(Json(json!({ "following": false })));
    };

    let pool = db::pool().await?;
    let following: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM follows WHERE user_id = $1 AND band_id = $2)",
    )
    .bind(user.id)
    .bind(query.band_id)
    .fetch_one(&pool)
    .await
    .map_err(DbError::from)?;

    Ok(Json(json!({ "following": following })))
}

/// GET /api/library/albums/status
pub async fn album_status(
    OptionalUser(user): OptionalUser,
    Query(query): Query<AlbumQuery>,
) -> Result<Json<Value>, ApiError> {
    let Some(user) = user else {
        return Ok(Json(json!({ "saved": false })));
    };

    let pool = db::pool().await?;
    let saved: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM saved_albums WHERE user_id = $1 AND album_id = $2)",
    )
    .bind(user.id)
    .bind(query.album_id)
    .fetch_one(&pool)
    .await
    .map_err(DbError::from)?;

    Ok(Json(json!({ "saved": saved })))
}

/// GET /api/library/tracks/status
pub async fn track_status(
    OptionalUser(user): OptionalUser,
    Query(query): Query<TrackQuery>,
) -> Result<Json<Value>, ApiError> {
    let Some(user) = user else {
        return Ok(Json(json!({ "liked": false })));
    };

    let pool = db::pool().await?;
    let liked: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM liked_tracks WHERE user_id = $1 AND track_id = $2)",
    )
    .bind(user.id)
    .bind(query.track_id)
    .fetch_one(&pool)
    .await
    .map_err(DbError::from)?;

    Ok(Json(json!({ "liked": liked })))
}
