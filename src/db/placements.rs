//! Curated homepage placements. Three tables share one shape (an ordered
//! list managed by admins), so the queries are written once and dispatch on
//! the placement kind.

use serde_json::Value;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::manager::DbError;
use super::positions::{self, ReorderError};
use super::rows_to_values;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementKind {
    FeaturedAlbums,
    FeaturedGenres,
    ZineAlbums,
}

/// What a placement row points at. Genre placements carry a label; the other
/// two kinds reference an album.
#[derive(Debug, Clone)]
pub enum PlacementTarget {
    Album(Uuid),
    Genre(String),
}

impl PlacementKind {
    /// URL slug used by the admin endpoints.
    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "albums" => Some(Self::FeaturedAlbums),
            "genres" => Some(Self::FeaturedGenres),
            "zine" => Some(Self::ZineAlbums),
            _ => None,
        }
    }

    fn table(self) -> &'static str {
        match self {
            Self::FeaturedAlbums => "featured_albums",
            Self::FeaturedGenres => "featured_genres",
            Self::ZineAlbums => "zine_albums",
        }
    }

    pub fn references_albums(self) -> bool {
        !matches!(self, Self::FeaturedGenres)
    }
}

/// Current placements in display order, joined with album and band names
/// where the kind references albums.
pub async fn list(pool: &PgPool, kind: PlacementKind) -> Result<Vec<Value>, DbError> {
    let sql = if kind.references_albums() {
        format!(
            "SELECT row_to_json(t) AS row FROM ( \
               SELECT f.id, f.position, a.id AS album_id, a.title, a.cover_url, \
                      b.name AS band_name \
               FROM {table} f \
               JOIN albums a ON a.id = f.album_id \
               JOIN bands b ON b.id = a.band_id \
               ORDER BY f.position \
             ) t",
            table = kind.table()
        )
    } else {
        "SELECT row_to_json(t) AS row FROM ( \
           SELECT id, position, genre FROM featured_genres ORDER BY position \
         ) t"
            .to_string()
    };

    let rows = sqlx::query(&sql).fetch_all(pool).await?;
    Ok(rows_to_values(rows)?)
}

/// Append a placement at the end of the list. Position assignment races
/// between concurrent appends; the reorder endpoint repairs any collision.
pub async fn append(
    pool: &PgPool,
    kind: PlacementKind,
    target: PlacementTarget,
) -> Result<Value, DbError> {
    let table = kind.table();
    let row = match target {
        PlacementTarget::Album(album_id) => {
            let sql = format!(
                "INSERT INTO {table} (album_id, position) \
                 VALUES ($1, (SELECT COALESCE(MAX(position) + 1, 0) FROM {table})) \
                 RETURNING row_to_json({table}) AS row"
            );
            sqlx::query(&sql).bind(album_id).fetch_one(pool).await?
        }
        PlacementTarget::Genre(genre) => {
            let sql = format!(
                "INSERT INTO {table} (genre, position) \
                 VALUES ($1, (SELECT COALESCE(MAX(position) + 1, 0) FROM {table})) \
                 RETURNING row_to_json({table}) AS row"
            );
            sqlx::query(&sql).bind(genre).fetch_one(pool).await?
        }
    };
    Ok(row.try_get("row")?)
}

/// Returns false when no placement with that id exists.
pub async fn remove(pool: &PgPool, kind: PlacementKind, id: Uuid) -> Result<bool, DbError> {
    let sql = format!("DELETE FROM {} WHERE id = $1 RETURNING id", kind.table());
    let deleted = sqlx::query(&sql).bind(id).fetch_optional(pool).await?;
    Ok(deleted.is_some())
}

pub async fn reorder(
    pool: &PgPool,
    kind: PlacementKind,
    ids: &[Uuid],
) -> Result<(), ReorderError> {
    let statement = format!("UPDATE {} SET position = $1 WHERE id = $2", kind.table());
    positions::update_positions(pool, &statement, None, ids).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs_map_to_kinds() {
        assert_eq!(
            PlacementKind::from_slug("albums"),
            Some(PlacementKind::FeaturedAlbums)
        );
        assert_eq!(
            PlacementKind::from_slug("genres"),
            Some(PlacementKind::FeaturedGenres)
        );
        assert_eq!(
            PlacementKind::from_slug("zine"),
            Some(PlacementKind::ZineAlbums)
        );
        assert_eq!(PlacementKind::from_slug("singles"), None);
    }

    #[test]
    fn only_genre_placements_skip_the_album_join() {
        assert!(PlacementKind::FeaturedAlbums.references_albums());
        assert!(PlacementKind::ZineAlbums.references_albums());
        assert!(!PlacementKind::FeaturedGenres.references_albums());
    }
}
