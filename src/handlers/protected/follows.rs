use axum::{extract::Path, Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::api::ApiJson;
use crate::db::{self, DbError};
use crate::error::ApiError;
use crate::middleware::AuthUser;

#[derive(Debug, Deserialize)]
pub struct FollowRequest {
    pub band_id: Uuid,
}

/// POST /api/follows - follow a band. Following twice is a no-op, not an
/// error.
pub async fn create(
    Extension(user): Extension<AuthUser>,
    ApiJson(body): ApiJson<FollowRequest>,
) -> Result<Json<Value>, ApiError> {
    let pool = db::pool().await?;

    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM bands WHERE id = $1)")
        .bind(body.band_id)
        .fetch_one(&pool)
        .await
        .map_err(DbError::from)?;
    if !exists {
        return Err(ApiError::not_found("band not found"));
    }

    sqlx::query(
        "INSERT INTO follows (user_id, band_id) VALUES ($1, $2) \
         ON CONFLICT (user_id, band_id) DO NOTHING",
    )
    .bind(user.id)
    .bind(body.band_id)
    .execute(&pool)
    .await
    .map_err(DbError::from)?;

    Ok(Json(json!({ "following": true })))
}

/// DELETE /api/follows/:band_id - unfollow. Removing an absent follow is a
/// no-op too.
pub async fn remove(
    Extension(user): Extension<AuthUser>,
    Path(band_id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let pool = db::pool().await?;

    sqlx::query("DELETE FROM follows WHERE user_id = $1 AND band_id = $2")
        .bind(user.id)
        .bind(band_id)
        .execute(&pool)
        .await
        .map_err(DbError::from)?;

    Ok(Json(json!({ "following": false })))
}
