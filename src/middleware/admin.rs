use axum::{extract::Request, middleware::Next, response::Response};

use super::auth::AuthUser;
use crate::db::{self, DbError};
use crate::error::ApiError;

/// Rejects the request with 403 unless the authenticated user's profile
/// carries the admin role. Runs after `require_auth`, which put the
/// identity into request extensions; the role itself lives in the database,
/// not in the token, so a role change takes effect on the next request.
pub async fn require_admin(request: Request, next: Next) -> Result<Response, ApiError> {
    let user = request
        .extensions()
        .get::<AuthUser>()
        .cloned()
        .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

    let pool = db::pool().await?;
    let role: Option<String> = sqlx::query_scalar("SELECT role FROM profiles WHERE id = $1")
        .bind(user.id)
        .fetch_optional(&pool)
        .await
        .map_err(DbError::from)?;

    match role.as_deref() {
        Some("admin") => Ok(next.run(request).await),
        Some(other) => {
            tracing::warn!(
                "user {} attempted an admin route with role '{}'",
                user.id,
                other
            );
            Err(ApiError::forbidden("Admin role required"))
        }
        None => Err(ApiError::forbidden("Admin role required")),
    }
}
