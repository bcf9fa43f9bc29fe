//! Playlist CRUD plus track and collaborator management. Access rules:
//! the owner can do everything; collaborators can view and edit tracks;
//! anyone can view a public playlist. Existence is always checked before
//! permission, so a missing playlist reads as 404 rather than 403.

use axum::{extract::Path, http::StatusCode, Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::PgPool;
use uuid::Uuid;

use crate::api::ApiJson;
use crate::db::models::{PlaylistRow, PlaylistSummaryRow, PlaylistTrackRow};
use crate::db::{self, positions, DbError};
use crate::error::ApiError;
use crate::middleware::AuthUser;

async fn load_playlist(pool: &PgPool, id: Uuid) -> Result<PlaylistRow, ApiError> {
    let playlist = sqlx::query_as::<_, PlaylistRow>(
        "SELECT id, owner_id, name, description, is_public, created_at \
         FROM playlists WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(DbError::from)?;

    playlist.ok_or_else(|| ApiError::not_found("playlist not found"))
}

async fn is_collaborator(pool: &PgPool, playlist_id: Uuid, user_id: Uuid) -> Result<bool, DbError> {
    let collaborating: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM playlist_collaborators \
         WHERE playlist_id = $1 AND user_id = $2)",
    )
    .bind(playlist_id)
    .bind(user_id)
    .fetch_one(pool)
    .await?;
    Ok(collaborating)
}

async fn ensure_can_edit_tracks(
    pool: &PgPool,
    playlist: &PlaylistRow,
    user_id: Uuid,
) -> Result<(), ApiError> {
    if playlist.owner_id == user_id {
        return Ok(());
    }
    if is_collaborator(pool, playlist.id, user_id).await? {
        return Ok(());
    }
    Err(ApiError::forbidden(
        "not a playlist owner or collaborator",
    ))
}

/// The owner may remove anyone; a collaborator may only remove themselves.
fn may_remove_collaborator(owner_id: Uuid, principal_id: Uuid, member_id: Uuid) -> bool {
    owner_id == principal_id || member_id == principal_id
}

/// GET /api/playlists - playlists the caller owns or collaborates on, with
/// track counts.
pub async fn list(
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<PlaylistSummaryRow>>, ApiError> {
    let pool = db::pool().await?;

    let rows = sqlx::query_as::<_, PlaylistSummaryRow>(
        "SELECT p.id, p.owner_id, p.name, p.description, p.is_public, p.created_at, \
                (SELECT COUNT(*) FROM playlist_tracks pt WHERE pt.playlist_id = p.id) \
                    AS track_count \
         FROM playlists p \
         WHERE p.owner_id = $1 \
            OR EXISTS (SELECT 1 FROM playlist_collaborators c \
                       WHERE c.playlist_id = p.id AND c.user_id = $1) \
         ORDER BY p.created_at DESC",
    )
    .bind(user.id)
    .fetch_all(&pool)
    .await
    .map_err(DbError::from)?;

    Ok(Json(rows))
}

#[derive(Debug, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub is_public: bool,
}

/// POST /api/playlists
pub async fn create(
    Extension(user): Extension<AuthUser>,
    ApiJson(body): ApiJson<CreatePlaylistRequest>,
) -> Result<(StatusCode, Json<PlaylistRow>), ApiError> {
    let name = body.name.trim();
    if name.is_empty() {
        return Err(ApiError::bad_request("playlist name is required"));
    }

    let pool = db::pool().await?;
    let playlist = sqlx::query_as::<_, PlaylistRow>(
        "INSERT INTO playlists (owner_id, name, description, is_public) \
         VALUES ($1, $2, $3, $4) \
         RETURNING id, owner_id, name, description, is_public, created_at",
    )
    .bind(user.id)
    .bind(name)
    .bind(body.description.as_deref())
    .bind(body.is_public)
    .fetch_one(&pool)
    .await
    .map_err(DbError::from)?;

    Ok((StatusCode::CREATED, Json(playlist)))
}

/// GET /api/playlists/:id - playlist with its tracks in position order
pub async fn show(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let pool = db::pool().await?;
    let playlist = load_playlist(&pool, id).await?;

    let can_view = playlist.is_public
        || playlist.owner_id == user.id
        || is_collaborator(&pool, playlist.id, user.id).await?;
    if !can_view {
        return Err(ApiError::forbidden("playlist is private"));
    }

    let tracks = sqlx::query_as::<_, PlaylistTrackRow>(
        "SELECT pt.track_id, pt.position, t.title, t.duration_secs, \
                a.title AS album_title, b.name AS band_name \
         FROM playlist_tracks pt \
         JOIN tracks t ON t.id = pt.track_id \
         JOIN albums a ON a.id = t.album_id \
         JOIN bands b ON b.id = t.band_id \
         WHERE pt.playlist_id = $1 \
         ORDER BY pt.position",
    )
    .bind(playlist.id)
    .fetch_all(&pool)
    .await
    .map_err(DbError::from)?;

    Ok(Json(json!({ "playlist": playlist, "tracks": tracks })))
}

#[derive(Debug, Deserialize)]
pub struct UpdatePlaylistRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_public: Option<bool>,
}

/// PUT /api/playlists/:id - owner-only metadata update; absent fields keep
/// their current value.
pub async fn update(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    ApiJson(body): ApiJson<UpdatePlaylistRequest>,
) -> Result<Json<PlaylistRow>, ApiError> {
    if let Some(name) = &body.name {
        if name.trim().is_empty() {
            return Err(ApiError::bad_request("playlist name cannot be blank"));
        }
    }

    let pool = db::pool().await?;
    let playlist = load_playlist(&pool, id).await?;
    if playlist.owner_id != user.id {
        return Err(ApiError::forbidden("only the owner may edit a playlist"));
    }

    let updated = sqlx::query_as::<_, PlaylistRow>(
        "UPDATE playlists SET \
             name = COALESCE($2, name), \
             description = COALESCE($3, description), \
             is_public = COALESCE($4, is_public) \
         WHERE id = $1 \
         RETURNING id, owner_id, name, description, is_public, created_at",
    )
    .bind(playlist.id)
    .bind(body.name.as_deref().map(str::trim))
    .bind(body.description.as_deref())
    .bind(body.is_public)
    .fetch_one(&pool)
    .await
    .map_err(DbError::from)?;

    Ok(Json(updated))
}

/// DELETE /api/playlists/:id - owner only; entries and collaborator rows go
/// with it via cascade.
pub async fn remove(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let pool = db::pool().await?;
    let playlist = load_playlist(&pool, id).await?;
    if playlist.owner_id != user.id {
        return Err(ApiError::forbidden("only the owner may delete a playlist"));
    }

    sqlx::query("DELETE FROM playlists WHERE id = $1")
        .bind(playlist.id)
        .execute(&pool)
        .await
        .map_err(DbError::from)?;

    Ok(Json(json!({ "ok": true })))
}

#[derive(Debug, Deserialize)]
pub struct AddTrackRequest {
    pub track_id: Uuid,
}

/// POST /api/playlists/:id/tracks - append a track at the end. Adding a
/// track that is already present is a no-op.
pub async fn add_track(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    ApiJson(body): ApiJson<AddTrackRequest>,
) -> Result<Json<Value>, ApiError> {
    let pool = db::pool().await?;
    let playlist = load_playlist(&pool, id).await?;
    ensure_can_edit_tracks(&pool, &playlist, user.id).await?;

    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM tracks WHERE id = $1)")
        .bind(body.track_id)
        .fetch_one(&pool)
        .await
        .map_err(DbError::from)?;
    if !exists {
        return Err(ApiError::not_found("track not found"));
    }

    sqlx::query(
        "INSERT INTO playlist_tracks (playlist_id, track_id, position, added_by) \
         VALUES ($1, $2, (SELECT COALESCE(MAX(position) + 1, 0) \
                          FROM playlist_tracks WHERE playlist_id = $1), $3) \
         ON CONFLICT (playlist_id, track_id) DO NOTHING",
    )
    .bind(playlist.id)
    .bind(body.track_id)
    .bind(user.id)
    .execute(&pool)
    .await
    .map_err(DbError::from)?;

    Ok(Json(json!({ "ok": true })))
}

/// DELETE /api/playlists/:id/tracks/:track_id
pub async fn remove_track(
    Extension(user): Extension<AuthUser>,
    Path((id, track_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Value>, ApiError> {
    let pool = db::pool().await?;
    let playlist = load_playlist(&pool, id).await?;
    ensure_can_edit_tracks(&pool, &playlist, user.id).await?;

    sqlx::query("DELETE FROM playlist_tracks WHERE playlist_id = $1 AND track_id = $2")
        .bind(playlist.id)
        .bind(track_id)
        .execute(&pool)
        .await
        .map_err(DbError::from)?;

    Ok(Json(json!({ "ok": true })))
}

#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub track_ids: Vec<Uuid>,
}

/// PUT /api/playlists/:id/tracks/reorder - the client sends every track id
/// in its new order; each entry's position becomes its index. Updates run
/// concurrently and are not transactional; on partial failure the response
/// is an aggregate 500 and the committed updates stay.
pub async fn reorder_tracks(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    ApiJson(body): ApiJson<ReorderRequest>,
) -> Result<Json<Value>, ApiError> {
    let pool = db::pool().await?;
    let playlist = load_playlist(&pool, id).await?;
    ensure_can_edit_tracks(&pool, &playlist, user.id).await?;

    positions::update_positions(
        &pool,
        "UPDATE playlist_tracks SET position = $1 \
         WHERE playlist_id = $2 AND track_id = $3",
        Some(playlist.id),
        &body.track_ids,
    )
    .await?;

    Ok(Json(json!({ "ok": true, "count": body.track_ids.len() })))
}

#[derive(Debug, Deserialize)]
pub struct AddCollaboratorRequest {
    pub user_id: Uuid,
}

/// POST /api/playlists/:id/collaborators - owner only
pub async fn add_collaborator(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    ApiJson(body): ApiJson<AddCollaboratorRequest>,
) -> Result<Json<Value>, ApiError> {
    let pool = db::pool().await?;
    let playlist = load_playlist(&pool, id).await?;
    if playlist.owner_id != user.id {
        return Err(ApiError::forbidden(
            "only the owner may add collaborators",
        ));
    }
    if body.user_id == user.id {
        return Err(ApiError::bad_request("the owner is already a member"));
    }

    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM profiles WHERE id = $1)")
        .bind(body.user_id)
        .fetch_one(&pool)
        .await
        .map_err(DbError::from)?;
    if !exists {
        return Err(ApiError::not_found("user not found"));
    }

    sqlx::query(
        "INSERT INTO playlist_collaborators (playlist_id, user_id) VALUES ($1, $2) \
         ON CONFLICT (playlist_id, user_id) DO NOTHING",
    )
    .bind(playlist.id)
    .bind(body.user_id)
    .execute(&pool)
    .await
    .map_err(DbError::from)?;

    Ok(Json(json!({ "ok": true })))
}

/// DELETE /api/playlists/:id/collaborators/:user_id - the owner may remove
/// anyone; a collaborator may remove only themselves.
pub async fn remove_collaborator(
    Extension(user): Extension<AuthUser>,
    Path((id, member_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Value>, ApiError> {
    let pool = db::pool().await?;
    let playlist = load_playlist(&pool, id).await?;

    if !may_remove_collaborator(playlist.owner_id, user.id, member_id) {
        return Err(ApiError::forbidden(
            "only the owner may remove other collaborators",
        ));
    }

    sqlx::query("DELETE FROM playlist_collaborators WHERE playlist_id = $1 AND user_id = $2")
        .bind(playlist.id)
        .bind(member_id)
        .execute(&pool)
        .await
        .map_err(DbError::from)?;

    Ok(Json(json!({ "ok": true })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_may_remove_any_collaborator() {
        let owner = Uuid::new_v4();
        let member = Uuid::new_v4();

        assert!(may_remove_collaborator(owner, owner, member));
        assert!(may_remove_collaborator(owner, owner, owner));
    }

    #[test]
    fn collaborator_may_only_remove_themselves() {
        let owner = Uuid::new_v4();
        let member = Uuid::new_v4();
        let other_member = Uuid::new_v4();

        assert!(may_remove_collaborator(owner, member, member));
        assert!(!may_remove_collaborator(owner, member, other_member));
        assert!(!may_remove_collaborator(owner, member, owner));
    }
}
