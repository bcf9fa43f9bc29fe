use axum::{extract::Path, Json};
use serde::Deserialize;

use crate::api::ApiJson;
use crate::db::models::SettingRow;
use crate::db::{self, DbError};
use crate::error::ApiError;

/// GET /api/admin/settings
pub async fn list() -> Result<Json<Vec<SettingRow>>, ApiError> {
    let pool = db::pool().await?;

    let rows = sqlx::query_as::<_, SettingRow>(
        "SELECT key, value, description, updated_at FROM platform_settings ORDER BY key",
    )
    .fetch_all(&pool)
    .await
    .map_err(DbError::from)?;

    Ok(Json(rows))
}

#[derive(Debug, Deserialize)]
pub struct UpsertSettingRequest {
    pub value: String,
    pub description: Option<String>,
}

/// PUT /api/admin/settings/:key - create or update a setting. Readers cache
/// these with a short freshness window, so a write may take up to that
/// window to be observed.
pub async fn upsert(
    Path(key): Path<String>,
    ApiJson(body): ApiJson<UpsertSettingRequest>,
) -> Result<Json<SettingRow>, ApiError> {
    let key = key.trim();
    if key.is_empty() {
        return Err(ApiError::bad_request("setting key is required"));
    }

    let pool = db::pool().await?;
    let row = sqlx::query_as::<_, SettingRow>(
        "INSERT INTO platform_settings (key, value, description, updated_at) \
         VALUES ($1, $2, $3, NOW()) \
         ON CONFLICT (key) DO UPDATE SET \
             value = EXCLUDED.value, \
             description = COALESCE(EXCLUDED.description, platform_settings.description), \
             updated_at = NOW() \
         RETURNING key, value, description, updated_at",
    )
    .bind(key)
    .bind(&body.value)
    .bind(body.description.as_deref())
    .fetch_one(&pool)
    .await
    .map_err(DbError::from)?;

    Ok(Json(row))
}
