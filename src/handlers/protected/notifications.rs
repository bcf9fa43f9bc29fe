use axum::{extract::Path, Extension, Json};
use serde_json::{json, Value};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::NotificationRow;
use crate::db::{self, DbError};
use crate::error::ApiError;
use crate::middleware::AuthUser;

/// GET /api/notifications - newest first, with the unread count derived
/// from the same rows rather than a second query.
pub async fn list(Extension(user): Extension<AuthUser>) -> Result<Json<Value>, ApiError> {
    let pool = db::pool().await?;

    let rows = sqlx::query_as::<_, NotificationRow>(
        "SELECT id, user_id, kind, body, read, created_at \
         FROM notifications WHERE user_id = $1 \
         ORDER BY created_at DESC",
    )
    .bind(user.id)
    .fetch_all(&pool)
    .await
    .map_err(DbError::from)?;

    let unread = rows.iter().filter(|n| !n.read).count();

    Ok(Json(json!({ "notifications": rows, "unread": unread })))
}

/// The recipient check is separate from the update so a wrong id gets 404
/// and someone else's notification gets 403.
async fn load_recipient(pool: &PgPool, id: Uuid) -> Result<Uuid, ApiError> {
    let recipient: Option<Uuid> =
        sqlx::query_scalar("SELECT user_id FROM notifications WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(DbError::from)?;
    recipient.ok_or_else(|| ApiError::not_found("notification not found"))
}

/// PUT /api/notifications/:id/read
pub async fn mark_read(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let pool = db::pool().await?;

    let recipient = load_recipient(&pool, id).await?;
    if recipient != user.id {
        return Err(ApiError::forbidden("not your notification"));
    }

    sqlx::query("UPDATE notifications SET read = TRUE WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await
        .map_err(DbError::from)?;

    Ok(Json(json!({ "ok": true })))
}

/// PUT /api/notifications/read-all
pub async fn mark_all_read(Extension(user): Extension<AuthUser>) -> Result<Json<Value>, ApiError> {
    let pool = db::pool().await?;

    let done = sqlx::query("UPDATE notifications SET read = TRUE WHERE user_id = $1 AND read = FALSE")
        .bind(user.id)
        .execute(&pool)
        .await
        .map_err(DbError::from)?;

    Ok(Json(json!({ "updated": done.rows_affected() })))
}

/// DELETE /api/notifications/:id
pub async fn remove(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let pool = db::pool().await?;

    let recipient = load_recipient(&pool, id).await?;
    if recipient != user.id {
        return Err(ApiError::forbidden("not your notification"));
    }

    sqlx::query("DELETE FROM notifications WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await
        .map_err(DbError::from)?;

    Ok(Json(json!({ "ok": true })))
}
