use axum::Json;
use serde_json::{json, Value};

use crate::db;
use crate::db::placements::{self, PlacementKind};
use crate::error::ApiError;

/// GET /api/featured - the three curated homepage sections, read
/// concurrently. Any failure collapses into one aggregate error; the
/// homepage either renders fully or not at all.
pub async fn list() -> Result<Json<Value>, ApiError> {
    let pool = db::pool().await?;

    let (albums, genres, zine) = tokio::join!(
        placements::list(&pool, PlacementKind::FeaturedAlbums),
        placements::list(&pool, PlacementKind::FeaturedGenres),
        placements::list(&pool, PlacementKind::ZineAlbums),
    );

    match (albums, genres, zine) {
        (Ok(albums), Ok(genres), Ok(zine)) => Ok(Json(json!({
            "albums": albums,
            "genres": genres,
            "zine": zine,
        }))),
        (albums, genres, zine) => {
            for err in [albums.err(), genres.err(), zine.err()].into_iter().flatten() {
                tracing::error!("featured content read failed: {}", err);
            }
            Err(ApiError::internal_server_error(
                "Failed to load featured content",
            ))
        }
    }
}
