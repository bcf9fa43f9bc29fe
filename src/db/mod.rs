pub mod manager;
pub mod models;
pub mod placements;
pub mod positions;
pub mod rpc;

pub use manager::{health_check, pool, DbError};

use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::Row;

/// Collect the results of a `row_to_json(...) AS row` query into JSON values.
/// Join-heavy list endpoints use this instead of a dedicated row struct. A
/// row whose `row` column fails to decode fails the whole read; the caller
/// surfaces it as a downstream failure rather than returning a short list.
pub fn rows_to_values(rows: Vec<PgRow>) -> Result<Vec<Value>, sqlx::Error> {
    rows.into_iter()
        .map(|row| row.try_get::<Value, _>("row"))
        .collect()
}
