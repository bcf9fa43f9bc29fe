use axum::{extract::Path, Extension, Json};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::db::models::PayoutRow;
use crate::db::{self, rpc, DbError};
use crate::error::ApiError;
use crate::middleware::AuthUser;

/// GET /api/admin/payouts - most recent period first
pub async fn list() -> Result<Json<Vec<PayoutRow>>, ApiError> {
    let pool = db::pool().await?;

    let rows = sqlx::query_as::<_, PayoutRow>(
        "SELECT p.id, p.band_id, p.amount_cents, p.status, p.period_start, \
                p.period_end, p.completed_at, b.name AS band_name \
         FROM payouts p \
         JOIN bands b ON b.id = p.band_id \
         ORDER BY p.period_end DESC, b.name",
    )
    .fetch_all(&pool)
    .await
    .map_err(DbError::from)?;

    Ok(Json(rows))
}

/// POST /api/admin/payouts/:id/complete - mark a payout as paid out. The
/// procedure records who completed it and notifies the band; completing a
/// missing or already-completed payout reads as 404.
pub async fn complete(
    Extension(admin): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let pool = db::pool().await?;

    let found = rpc::complete_payout(&pool, id, admin.id).await?;
    if !found {
        return Err(ApiError::not_found("pending payout not found"));
    }

    Ok(Json(json!({ "ok": true })))
}
