use axum::{Extension, Json};
use serde::Deserialize;

use crate::api::ApiJson;
use crate::db::models::Profile;
use crate::db::{self, DbError};
use crate::error::ApiError;
use crate::middleware::AuthUser;

/// GET /api/profile - the caller's own profile row. A valid token with no
/// profile row is a 404; provisioning happens at signup, outside this API.
pub async fn show(Extension(user): Extension<AuthUser>) -> Result<Json<Profile>, ApiError> {
    let pool = db::pool().await?;

    let profile = sqlx::query_as::<_, Profile>(
        "SELECT id, email, display_name, role, avatar_url, created_at \
         FROM profiles WHERE id = $1",
    )
    .bind(user.id)
    .fetch_optional(&pool)
    .await
    .map_err(DbError::from)?;

    profile
        .map(Json)
        .ok_or_else(|| ApiError::not_found("profile not found"))
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

/// PUT /api/profile - update display fields; absent fields are untouched.
/// Email and role are not editable here.
pub async fn update(
    Extension(user): Extension<AuthUser>,
    ApiJson(body): ApiJson<UpdateProfileRequest>,
) -> Result<Json<Profile>, ApiError> {
    let pool = db::pool().await?;

    let profile = sqlx::query_as::<_, Profile>(
        "UPDATE profiles SET \
             display_name = COALESCE($2, display_name), \
             avatar_url = COALESCE($3, avatar_url) \
         WHERE id = $1 \
         RETURNING id, email, display_name, role, avatar_url, created_at",
    )
    .bind(user.id)
    .bind(body.display_name.as_deref())
    .bind(body.avatar_url.as_deref())
    .fetch_optional(&pool)
    .await
    .map_err(DbError::from)?;

    profile
        .map(Json)
        .ok_or_else(|| ApiError::not_found("profile not found"))
}
