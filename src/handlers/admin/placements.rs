//! Curation endpoints. The :kind path segment selects one of the three
//! placement lists (albums, genres, zine); an unknown kind is a 404.

use axum::{extract::Path, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::api::ApiJson;
use crate::db::placements::{self, PlacementKind, PlacementTarget};
use crate::db::{self, DbError};
use crate::error::ApiError;

fn parse_kind(slug: &str) -> Result<PlacementKind, ApiError> {
    PlacementKind::from_slug(slug)
        .ok_or_else(|| ApiError::not_found(format!("unknown placement kind '{}'", slug)))
}

/// GET /api/admin/featured/:kind
pub async fn list(Path(kind): Path<String>) -> Result<Json<Vec<Value>>, ApiError> {
    let kind = parse_kind(&kind)?;
    let pool = db::pool().await?;
    Ok(Json(placements::list(&pool, kind).await?))
}

#[derive(Debug, Deserialize)]
pub struct CreatePlacementRequest {
    pub album_id: Option<Uuid>,
    pub genre: Option<String>,
}

/// POST /api/admin/featured/:kind - append at the end of the list
pub async fn create(
    Path(kind): Path<String>,
    ApiJson(body): ApiJson<CreatePlacementRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let kind = parse_kind(&kind)?;
    let pool = db::pool().await?;

    let target = if kind.references_albums() {
        let album_id = body
            .album_id
            .ok_or_else(|| ApiError::bad_request("album_id is required"))?;

        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM albums WHERE id = $1)")
            .bind(album_id)
            .fetch_one(&pool)
            .await
            .map_err(DbError::from)?;
        if !exists {
            return Err(ApiError::not_found("album not found"));
        }
        PlacementTarget::Album(album_id)
    } else {
        let genre = body
            .genre
            .as_deref()
            .map(str::trim)
            .filter(|genre| !genre.is_empty())
            .ok_or_else(|| ApiError::bad_request("genre is required"))?;
        PlacementTarget::Genre(genre.to_string())
    };

    let row = placements::append(&pool, kind, target).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// DELETE /api/admin/featured/:kind/:id
pub async fn remove(Path((kind, id)): Path<(String, Uuid)>) -> Result<Json<Value>, ApiError> {
    let kind = parse_kind(&kind)?;
    let pool = db::pool().await?;

    let deleted = placements::remove(&pool, kind, id).await?;
    if !deleted {
        return Err(ApiError::not_found("placement not found"));
    }

    Ok(Json(json!({ "ok": true })))
}

#[derive(Debug, Deserialize)]
pub struct ReorderPlacementsRequest {
    pub ids: Vec<Uuid>,
}

/// PUT /api/admin/featured/:kind/reorder - same index-as-position contract
/// as playlist reordering, same non-transactional caveat.
pub async fn reorder(
    Path(kind): Path<String>,
    ApiJson(body): ApiJson<ReorderPlacementsRequest>,
) -> Result<Json<Value>, ApiError> {
    let kind = parse_kind(&kind)?;
    let pool = db::pool().await?;

    placements::reorder(&pool, kind, &body.ids).await?;

    Ok(Json(json!({ "ok": true, "count": body.ids.len() })))
}
