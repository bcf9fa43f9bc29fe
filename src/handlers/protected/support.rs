//! Direct artist support: one-off tips and recurring boosts. Amounts are
//! integer cents end to end. The actual charge happens at the billing
//! provider; these endpoints record the resulting payment event through the
//! data platform's procedures, which also notify the artist.

use axum::{http::StatusCode, Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::PgPool;
use uuid::Uuid;

use crate::api::ApiJson;
use crate::db::{self, rpc, DbError};
use crate::error::ApiError;
use crate::middleware::AuthUser;

async fn ensure_band_exists(pool: &PgPool, band_id: Uuid) -> Result<(), ApiError> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM bands WHERE id = $1)")
        .bind(band_id)
        .fetch_one(pool)
        .await
        .map_err(DbError::from)?;
    if exists {
        Ok(())
    } else {
        Err(ApiError::not_found("band not found"))
    }
}

#[derive(Debug, Deserialize)]
pub struct TipRequest {
    pub band_id: Uuid,
    pub amount_cents: i64,
    pub message: Option<String>,
}

/// POST /api/tips
pub async fn create_tip(
    Extension(user): Extension<AuthUser>,
    ApiJson(body): ApiJson<TipRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    if body.amount_cents <= 0 {
        return Err(ApiError::bad_request("tip amount must be positive"));
    }

    let pool = db::pool().await?;
    ensure_band_exists(&pool, body.band_id).await?;

    let tip_id = rpc::record_artist_tip(
        &pool,
        user.id,
        body.band_id,
        body.amount_cents,
        body.message.as_deref(),
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": tip_id,
            "band_id": body.band_id,
            "amount_cents": body.amount_cents,
        })),
    ))
}

#[derive(Debug, Deserialize)]
pub struct BoostRequest {
    pub band_id: Uuid,
    pub amount_cents: i64,
}

/// POST /api/boosts
pub async fn create_boost(
    Extension(user): Extension<AuthUser>,
    ApiJson(body): ApiJson<BoostRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    if body.amount_cents <= 0 {
        return Err(ApiError::bad_request("boost amount must be positive"));
    }

    let pool = db::pool().await?;
    ensure_band_exists(&pool, body.band_id).await?;

    let boost_id =
        rpc::record_artist_boost(&pool, user.id, body.band_id, body.amount_cents).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": boost_id,
            "band_id": body.band_id,
            "amount_cents": body.amount_cents,
        })),
    ))
}
