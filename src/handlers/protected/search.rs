use axum::{extract::Query, Extension, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::format::mask_email;
use crate::db::{self, DbError};
use crate::error::ApiError;
use crate::middleware::AuthUser;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct UserHit {
    pub id: Uuid,
    pub display_name: Option<String>,
    pub email: String,
}

/// GET /api/search/users - used by collaborator pickers. Emails come back
/// masked; the full address never leaves the server.
pub async fn users(
    Extension(_user): Extension<AuthUser>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<UserHit>>, ApiError> {
    let q = query.q.trim();
    if q.is_empty() {
        return Err(ApiError::bad_request("search query is required"));
    }

    let pool = db::pool().await?;
    let rows: Vec<(Uuid, Option<String>, String)> = sqlx::query_as(
        "SELECT id, display_name, email FROM profiles \
         WHERE email ILIKE $1 OR display_name ILIKE $1 \
         ORDER BY display_name NULLS LAST \
         LIMIT 20",
    )
    .bind(like_pattern(q))
    .fetch_all(&pool)
    .await
    .map_err(DbError::from)?;

    let hits = rows
        .into_iter()
        .map(|(id, display_name, email)| UserHit {
            id,
            display_name,
            email: mask_email(&email),
        })
        .collect();

    Ok(Json(hits))
}

/// Escape LIKE metacharacters so user input matches literally.
fn like_pattern(q: &str) -> String {
    let escaped = q
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_the_query_in_wildcards() {
        assert_eq!(like_pattern("dana"), "%dana%");
    }

    #[test]
    fn escapes_like_metacharacters() {
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("back\\slash"), "%back\\\\slash%");
    }
}
