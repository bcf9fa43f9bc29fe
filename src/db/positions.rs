//! Drag-and-drop reorder support. The client sends the full identifier list
//! in its new order; each identifier gets its index as the new position.

use futures::future::join_all;
use sqlx::PgPool;
use std::collections::HashSet;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ReorderError {
    #[error("duplicate identifier in reorder input: {0}")]
    Duplicate(Uuid),

    /// Updates run independently, so the ones that succeeded stay written.
    #[error("{failed} of {total} position updates failed")]
    Incomplete { failed: usize, total: usize },
}

/// Pair each identifier with its zero-based position. Duplicates would make
/// two rows race for the same slot, so they are rejected up front.
pub fn position_assignments(ids: &[Uuid]) -> Result<Vec<(Uuid, i32)>, ReorderError> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter()
        .enumerate()
        .map(|(index, id)| {
            if seen.insert(*id) {
                Ok((*id, index as i32))
            } else {
                Err(ReorderError::Duplicate(*id))
            }
        })
        .collect()
}

/// Issue one position update per identifier, all concurrently, and report
/// failures in aggregate. `statement` binds `$1` = position, then the scope
/// id when `scope` is set, then the row identifier last. An update that
/// matches no row counts as a failure.
pub async fn update_positions(
    pool: &PgPool,
    statement: &str,
    scope: Option<Uuid>,
    ids: &[Uuid],
) -> Result<(), ReorderError> {
    let assignments = position_assignments(ids)?;
    let total = assignments.len();
    if total == 0 {
        return Ok(());
    }

    let updates = assignments.iter().map(|&(id, position)| {
        let query = sqlx::query(statement).bind(position);
        let query = match scope {
            Some(scope_id) => query.bind(scope_id),
            None => query,
        };
        query.bind(id).execute(pool)
    });

    let results = join_all(updates).await;
    let failed = results
        .iter()
        .filter(|result| !matches!(result, Ok(done) if done.rows_affected() > 0))
        .count();

    if failed > 0 {
        for err in results.iter().filter_map(|result| result.as_ref().err()) {
            tracing::error!("position update failed: {}", err);
        }
        return Err(ReorderError::Incomplete { failed, total });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignments_follow_input_order() {
        let ids = vec![Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];

        let assignments = position_assignments(&ids).unwrap();

        assert_eq!(assignments.len(), 3);
        for (index, (id, position)) in assignments.iter().enumerate() {
            assert_eq!(*id, ids[index]);
            assert_eq!(*position, index as i32);
        }
    }

    #[test]
    fn duplicate_identifiers_are_rejected() {
        let id = Uuid::new_v4();
        let ids = vec![id, Uuid::new_v4(), id];

        let err = position_assignments(&ids).unwrap_err();
        assert!(matches!(err, ReorderError::Duplicate(dup) if dup == id));
    }

    #[test]
    fn empty_input_yields_no_assignments() {
        assert!(position_assignments(&[]).unwrap().is_empty());
    }
}
