use axum::{extract::Path, Json};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{self, DbError};
use crate::error::ApiError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BandStats {
    pub band_id: Uuid,
    pub followers: i64,
    pub tip_total_cents: i64,
    pub boost_total_cents: i64,
}

/// GET /api/bands/:id/stats - public counters for an artist page. The three
/// aggregates are read concurrently; a failure in any of them fails the
/// whole response rather than reporting partial numbers.
pub async fn stats(Path(band_id): Path<Uuid>) -> Result<Json<BandStats>, ApiError> {
    let pool = db::pool().await?;

    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM bands WHERE id = $1)")
        .bind(band_id)
        .fetch_one(&pool)
        .await
        .map_err(DbError::from)?;
    if !exists {
        return Err(ApiError::not_found("band not found"));
    }

    let (followers, tips, boosts) = tokio::join!(
        follower_count(&pool, band_id),
        tip_total(&pool, band_id),
        boost_total(&pool, band_id),
    );

    match (followers, tips, boosts) {
        (Ok(followers), Ok(tip_total_cents), Ok(boost_total_cents)) => Ok(Json(BandStats {
            band_id,
            followers,
            tip_total_cents,
            boost_total_cents,
        })),
        (followers, tips, boosts) => {
            for err in [followers.err(), tips.err(), boosts.err()]
                .into_iter()
                .flatten()
            {
                tracing::error!("band stats aggregate failed: {}", err);
            }
            Err(ApiError::internal_server_error(
                "Failed to aggregate band stats",
            ))
        }
    }
}

async fn follower_count(pool: &PgPool, band_id: Uuid) -> Result<i64, DbError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM follows WHERE band_id = $1")
        .bind(band_id)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

// SUM over bigint widens to numeric in postgres; cast back down.

async fn tip_total(pool: &PgPool, band_id: Uuid) -> Result<i64, DbError> {
    let total: i64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(amount_cents), 0)::BIGINT FROM artist_tips WHERE band_id = $1",
    )
    .bind(band_id)
    .fetch_one(pool)
    .await?;
    Ok(total)
}

async fn boost_total(pool: &PgPool, band_id: Uuid) -> Result<i64, DbError> {
    let total: i64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(amount_cents), 0)::BIGINT FROM artist_boosts WHERE band_id = $1",
    )
    .bind(band_id)
    .fetch_one(pool)
    .await?;
    Ok(total)
}
