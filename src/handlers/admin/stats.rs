use axum::Json;
use serde::Serialize;
use sqlx::PgPool;

use crate::db::{self, DbError};
use crate::error::ApiError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub profiles: i64,
    pub albums: i64,
    pub tracks: i64,
    pub pending_moderation: i64,
}

/// GET /api/admin/stats - dashboard counters, all four reads concurrent,
/// all-or-nothing like the other aggregate endpoints.
pub async fn overview() -> Result<Json<AdminStats>, ApiError> {
    let pool = db::pool().await?;

    let (profiles, albums, tracks, pending) = tokio::join!(
        count_rows(&pool, "SELECT COUNT(*) FROM profiles"),
        count_rows(&pool, "SELECT COUNT(*) FROM albums"),
        count_rows(&pool, "SELECT COUNT(*) FROM tracks"),
        count_rows(
            &pool,
            "SELECT COUNT(*) FROM moderation_queue WHERE status = 'pending'"
        ),
    );

    match (profiles, albums, tracks, pending) {
        (Ok(profiles), Ok(albums), Ok(tracks), Ok(pending_moderation)) => Ok(Json(AdminStats {
            profiles,
            albums,
            tracks,
            pending_moderation,
        })),
        (profiles, albums, tracks, pending) => {
            for err in [profiles.err(), albums.err(), tracks.err(), pending.err()]
                .into_iter()
                .flatten()
            {
                tracing::error!("admin stats aggregate failed: {}", err);
            }
            Err(ApiError::internal_server_error(
                "Failed to aggregate platform stats",
            ))
        }
    }
}

async fn count_rows(pool: &PgPool, sql: &'static str) -> Result<i64, DbError> {
    let count: i64 = sqlx::query_scalar(sql).fetch_one(pool).await?;
    Ok(count)
}
