//! Thin wrappers over the data platform's named procedures. Multi-table
//! writes (submissions, moderation decisions, support payments, payouts)
//! happen inside these procedures so the API never runs its own
//! transactions for them.

use serde_json::Value;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::manager::DbError;

/// Procedure-raised errors carry a message written for the caller; pull it
/// out so it can be surfaced instead of a generic database failure.
fn map_rpc_err(err: sqlx::Error) -> DbError {
    match err {
        sqlx::Error::Database(db) => DbError::Rpc(db.message().to_string()),
        other => DbError::Sqlx(other),
    }
}

/// Create a track row and, when review is required, its moderation queue
/// entry, in one procedure call. Returns the created track as JSON.
pub async fn submit_track(
    pool: &PgPool,
    album_id: Uuid,
    title: &str,
    audio_key: &str,
    duration_secs: Option<i32>,
    submitted_by: Uuid,
    review_required: bool,
) -> Result<Value, DbError> {
    let row = sqlx::query(
        "SELECT row_to_json(t) AS track FROM submit_track($1, $2, $3, $4, $5, $6) AS t",
    )
    .bind(album_id)
    .bind(title)
    .bind(audio_key)
    .bind(duration_secs)
    .bind(submitted_by)
    .bind(review_required)
    .fetch_one(pool)
    .await
    .map_err(map_rpc_err)?;

    Ok(row.try_get("track")?)
}

/// Returns false when the submission does not exist or was already reviewed.
pub async fn approve_submission(
    pool: &PgPool,
    entry_id: Uuid,
    reviewer: Uuid,
) -> Result<bool, DbError> {
    let found: bool = sqlx::query_scalar("SELECT approve_submission($1, $2)")
        .bind(entry_id)
        .bind(reviewer)
        .fetch_one(pool)
        .await
        .map_err(map_rpc_err)?;
    Ok(found)
}

/// Returns false when the submission does not exist or was already reviewed.
pub async fn reject_submission(
    pool: &PgPool,
    entry_id: Uuid,
    reviewer: Uuid,
    reason: &str,
) -> Result<bool, DbError> {
    let found: bool = sqlx::query_scalar("SELECT reject_submission($1, $2, $3)")
        .bind(entry_id)
        .bind(reviewer)
        .bind(reason)
        .fetch_one(pool)
        .await
        .map_err(map_rpc_err)?;
    Ok(found)
}

/// Record a one-off tip and its artist notification; returns the tip id.
pub async fn record_artist_tip(
    pool: &PgPool,
    tipper: Uuid,
    band_id: Uuid,
    amount_cents: i64,
    message: Option<&str>,
) -> Result<Uuid, DbError> {
    let id: Uuid = sqlx::query_scalar("SELECT record_artist_tip($1, $2, $3, $4)")
        .bind(tipper)
        .bind(band_id)
        .bind(amount_cents)
        .bind(message)
        .fetch_one(pool)
        .await
        .map_err(map_rpc_err)?;
    Ok(id)
}

/// Record a recurring-boost payment event; returns the boost id.
pub async fn record_artist_boost(
    pool: &PgPool,
    backer: Uuid,
    band_id: Uuid,
    amount_cents: i64,
) -> Result<Uuid, DbError> {
    let id: Uuid = sqlx::query_scalar("SELECT record_artist_boost($1, $2, $3)")
        .bind(backer)
        .bind(band_id)
        .bind(amount_cents)
        .fetch_one(pool)
        .await
        .map_err(map_rpc_err)?;
    Ok(id)
}

/// Returns false when the payout does not exist or is already completed.
pub async fn complete_payout(
    pool: &PgPool,
    payout_id: Uuid,
    admin: Uuid,
) -> Result<bool, DbError> {
    let found: bool = sqlx::query_scalar("SELECT complete_payout($1, $2)")
        .bind(payout_id)
        .bind(admin)
        .fetch_one(pool)
        .await
        .map_err(map_rpc_err)?;
    Ok(found)
}
