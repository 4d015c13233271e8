//! Item persistence and the watermark query.

use chrono::{DateTime, Utc};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    DatabaseConnection, EntityTrait, QueryOrder, QuerySelect, sea_query::OnConflict,
};

use super::errors::{Result, StoreError};
use crate::entity::item::{ActiveModel, Column, Entity as Item};
use crate::sync::{ProgressCallback, SyncProgress, emit};

/// ON CONFLICT clause for items: every non-key column is replaced.
pub(crate) fn item_on_conflict() -> OnConflict {
    OnConflict::column(Column::Id)
        .update_columns([
            Column::Lang,
            Column::Style,
            Column::Changed,
            Column::Last,
            Column::CreatedAt,
            Column::Next,
            Column::Reviews,
            Column::Successes,
            Column::TimeStudied,
            Column::Interval,
            Column::PreviousInterval,
            Column::PreviousSuccess,
            Column::VocabId,
            Column::Part,
        ])
        .to_owned()
}

/// Most recent `changed` timestamp across stored items.
///
/// Returns `None` when no items are stored yet.
pub async fn latest_changed(db: &DatabaseConnection) -> Result<Option<DateTime<Utc>>> {
    let latest = Item::find()
        .select_only()
        .column(Column::Changed)
        .order_by_desc(Column::Changed)
        .limit(1)
        .into_tuple::<DateTimeWithTimeZone>()
        .one(db)
        .await?;

    Ok(latest.map(|dt| dt.with_timezone(&Utc)))
}

/// Write items in sequential batches of `batch_size` rows, replacing any
/// existing row with the same ID.
///
/// Returns the summed rows affected. A failing batch stops the run; the rows
/// of earlier batches remain committed and are reported in
/// [`StoreError::Batch`].
pub async fn replace_items(
    db: &DatabaseConnection,
    models: Vec<ActiveModel>,
    batch_size: usize,
    on_progress: Option<&ProgressCallback>,
) -> Result<u64> {
    if batch_size == 0 {
        return Err(StoreError::InvalidInput {
            message: "batch size must be greater than zero".to_string(),
        });
    }

    let total_batches = models.len().div_ceil(batch_size);
    let mut committed: u64 = 0;
    let mut remaining = models.into_iter();

    for batch in 1..=total_batches {
        let chunk: Vec<ActiveModel> = remaining.by_ref().take(batch_size).collect();
        let size = chunk.len();

        emit(
            on_progress,
            SyncProgress::PersistingBatch {
                batch,
                total_batches,
                size,
            },
        );

        let rows = Item::insert_many(chunk)
            .on_conflict(item_on_conflict())
            .exec_without_returning(db)
            .await
            .map_err(|source| StoreError::Batch {
                batch,
                total_batches,
                committed,
                source,
            })?;

        committed += rows;
        tracing::debug!(batch, total_batches, size, rows, "Wrote item batch");
        emit(
            on_progress,
            SyncProgress::PersistedBatch {
                batch,
                total_batches,
                rows_affected: rows,
            },
        );
    }

    Ok(committed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult, QueryTrait, Set, Value};
    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex};

    fn model(id: usize) -> ActiveModel {
        let ts = Utc::now().fixed_offset();
        ActiveModel {
            id: Set(format!("item-{id}")),
            lang: Set("zh".to_string()),
            style: Set("simp".to_string()),
            changed: Set(ts),
            last: Set(ts),
            created_at: Set(ts),
            next: Set(ts),
            reviews: Set(1),
            successes: Set(1),
            time_studied: Set(5),
            interval: Set(600),
            previous_interval: Set(0),
            previous_success: Set(true),
            vocab_id: Set("v1".to_string()),
            part: Set("rune".to_string()),
        }
    }

    fn exec(rows: u64) -> MockExecResult {
        MockExecResult {
            rows_affected: rows,
            last_insert_id: 0,
        }
    }

    fn recorder() -> (ProgressCallback, Arc<Mutex<Vec<SyncProgress>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let events_clone = Arc::clone(&events);
        let callback: ProgressCallback = Box::new(move |event| {
            events_clone.lock().expect("lock").push(event);
        });
        (callback, events)
    }

    #[test]
    fn conflict_clause_replaces_all_non_key_columns() {
        let sql = Item::insert_many(vec![model(1)])
            .on_conflict(item_on_conflict())
            .build(DatabaseBackend::Sqlite)
            .to_string();

        assert!(sql.contains(r#"ON CONFLICT ("id") DO UPDATE"#), "{sql}");
        for column in ["reviews", "successes", "changed", "vocab_id", "part"] {
            let set = format!(r#""{column}" = "excluded"."{column}""#);
            assert!(sql.contains(&set), "missing {set} in {sql}");
        }
    }

    #[tokio::test]
    async fn replace_items_writes_250_rows_as_100_100_50() {
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_exec_results([exec(100), exec(100), exec(50)])
            .into_connection();
        let (callback, events) = recorder();

        let models = (0..250).map(model).collect();
        let rows = replace_items(&db, models, 100, Some(&callback))
            .await
            .expect("replace should succeed");

        assert_eq!(rows, 250);

        let sizes: Vec<usize> = events
            .lock()
            .expect("lock")
            .iter()
            .filter_map(|event| match event {
                SyncProgress::PersistingBatch {
                    size,
                    total_batches: 3,
                    ..
                } => Some(*size),
                _ => None,
            })
            .collect();
        assert_eq!(sizes, vec![100, 100, 50]);
        assert_eq!(db.into_transaction_log().len(), 3);
    }

    #[tokio::test]
    async fn replace_items_with_no_models_issues_nothing() {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();
        let rows = replace_items(&db, Vec::new(), 100, None)
            .await
            .expect("should succeed");
        assert_eq!(rows, 0);
        assert!(db.into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn replace_items_rejects_zero_batch_size() {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();
        let err = replace_items(&db, vec![model(1)], 0, None)
            .await
            .expect_err("zero batch size is invalid");
        assert!(matches!(err, StoreError::InvalidInput { .. }));
    }

    #[tokio::test]
    async fn replace_items_stops_at_failing_batch() {
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_exec_results([exec(2)])
            .append_exec_errors([DbErr::Custom("constraint violated".to_string())])
            .append_exec_results([exec(1)])
            .into_connection();

        let models = (0..5).map(model).collect();
        let err = replace_items(&db, models, 2, None)
            .await
            .expect_err("second batch fails");

        match err {
            StoreError::Batch {
                batch,
                total_batches,
                committed,
                source,
            } => {
                assert_eq!(batch, 2);
                assert_eq!(total_batches, 3);
                assert_eq!(committed, 2);
                assert!(source.to_string().contains("constraint violated"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(
            db.into_transaction_log().len(),
            2,
            "third batch must not run"
        );
    }

    #[tokio::test]
    async fn latest_changed_is_none_for_empty_store() {
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_query_results([Vec::<BTreeMap<&str, Value>>::new()])
            .into_connection();

        let latest = latest_changed(&db).await.expect("query should succeed");
        assert_eq!(latest, None);
    }

    #[tokio::test]
    async fn latest_changed_returns_stored_timestamp_in_utc() {
        let changed = Utc
            .with_ymd_and_hms(2024, 2, 29, 8, 30, 0)
            .single()
            .expect("valid date");
        let row: BTreeMap<&str, Value> =
            BTreeMap::from([("changed", Value::from(changed.fixed_offset()))]);
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_query_results([vec![row]])
            .into_connection();

        let latest = latest_changed(&db).await.expect("query should succeed");
        assert_eq!(latest, Some(changed));
    }
}
