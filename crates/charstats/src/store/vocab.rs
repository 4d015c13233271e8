//! Vocab persistence.

use sea_orm::{
    ConnectionTrait, DatabaseBackend, DatabaseConnection, EntityTrait, Iterable,
    sea_query::OnConflict,
};

use super::errors::{Result, StoreError};
use crate::entity::vocab::{ActiveModel, Column, Entity as Vocab};

/// Most bind parameters one statement may carry on `backend`.
fn max_bind_params(backend: DatabaseBackend) -> Option<usize> {
    match backend {
        DatabaseBackend::Sqlite => Some(32_766),
        DatabaseBackend::Postgres => Some(65_535),
        _ => None,
    }
}

/// ON CONFLICT clause for vocab: a re-seen ID only refreshes `created_at`.
pub(crate) fn vocab_on_conflict() -> OnConflict {
    OnConflict::column(Column::Id)
        .update_column(Column::CreatedAt)
        .to_owned()
}

/// Upsert the whole vocab collection in one statement.
///
/// Existing rows keep every column except `created_at`. Returns rows affected
/// as reported by the driver; an empty input issues no statement.
///
/// # Errors
///
/// [`StoreError::InvalidInput`] if the collection needs more bind parameters
/// than the backend accepts in one statement. Nothing is written in that case.
pub async fn upsert_vocabs(db: &DatabaseConnection, models: Vec<ActiveModel>) -> Result<u64> {
    if models.is_empty() {
        return Ok(0);
    }

    let count = models.len();
    let params = count * Column::iter().count();
    if let Some(limit) = max_bind_params(db.get_database_backend())
        && params > limit
    {
        return Err(StoreError::InvalidInput {
            message: format!(
                "{count} vocabs need {params} bind parameters in one statement, \
                 over the database limit of {limit}"
            ),
        });
    }

    let rows = Vocab::insert_many(models)
        .on_conflict(vocab_on_conflict())
        .exec_without_returning(db)
        .await?;

    tracing::debug!(count, rows, "Upserted vocab");
    Ok(rows)
}
