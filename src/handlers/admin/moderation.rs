use axum::{extract::Path, Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::api::ApiJson;
use crate::db::models::ModerationEntryRow;
use crate::db::{self, rpc, DbError};
use crate::error::ApiError;
use crate::middleware::AuthUser;

/// GET /api/admin/moderation - pending submissions, oldest first
pub async fn queue() -> Result<Json<Vec<ModerationEntryRow>>, ApiError> {
    let pool = db::pool().await?;

    let rows = sqlx::query_as::<_, ModerationEntryRow>(
        "SELECT m.id, m.track_id, m.band_id, m.submitted_by, m.status, m.reason, \
                m.created_at, t.title AS track_title, b.name AS band_name \
         FROM moderation_queue m \
         JOIN tracks t ON t.id = m.track_id \
         JOIN bands b ON b.id = m.band_id \
         WHERE m.status = 'pending' \
         ORDER BY m.created_at ASC",
    )
    .fetch_all(&pool)
    .await
    .map_err(DbError::from)?;

    Ok(Json(rows))
}

/// POST /api/admin/moderation/:id/approve - the procedure flips the entry
/// and publishes the track in one transaction. An entry that is missing or
/// already reviewed reads as 404.
pub async fn approve(
    Extension(admin): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let pool = db::pool().await?;

    let found = rpc::approve_submission(&pool, id, admin.id).await?;
    if !found {
        return Err(ApiError::not_found("pending submission not found"));
    }

    Ok(Json(json!({ "ok": true })))
}

#[derive(Debug, Deserialize)]
pub struct RejectRequest {
    pub reason: String,
}

/// POST /api/admin/moderation/:id/reject - rejection always carries a
/// reason; it ends up in the artist's notification.
pub async fn reject(
    Extension(admin): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    ApiJson(body): ApiJson<RejectRequest>,
) -> Result<Json<Value>, ApiError> {
    let reason = body.reason.trim();
    if reason.is_empty() {
        return Err(ApiError::bad_request("a rejection reason is required"));
    }

    let pool = db::pool().await?;

    let found = rpc::reject_submission(&pool, id, admin.id, reason).await?;
    if !found {
        return Err(ApiError::not_found("pending submission not found"));
    }

    Ok(Json(json!({ "ok": true })))
}
