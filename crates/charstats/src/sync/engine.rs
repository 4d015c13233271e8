//! The sync run: watermark, fetch, normalize, persist.

use chrono::Utc;
use sea_orm::DatabaseConnection;

use super::progress::{ProgressCallback, SyncProgress, emit};
use super::types::{SyncError, SyncOptions, SyncSummary};
use super::watermark::resolve_watermark;
use crate::entity::item::ActiveModel as ItemActiveModel;
use crate::entity::vocab::ActiveModel as VocabActiveModel;
use crate::skritter::{SkritterClient, item_to_active_model, vocab_to_active_model};
use crate::store;

/// Run one sync against the local store.
///
/// Steps run strictly in sequence and the first failure aborts the run. Item
/// batches already written before a failure stay committed.
///
/// # Example
///
/// ```ignore
/// let db = charstats::connect_and_migrate("sqlite://skritter.db?mode=rwc").await?;
/// let client = SkritterClient::new(DEFAULT_BASE_URL, &token)?;
/// let summary = run_sync(&db, &client, &SyncOptions::default(), None).await?;
/// println!("{} items written", summary.items_affected);
/// ```
pub async fn run_sync(
    db: &DatabaseConnection,
    client: &SkritterClient,
    options: &SyncOptions,
    on_progress: Option<&ProgressCallback>,
) -> Result<SyncSummary, SyncError> {
    let watermark = resolve_watermark(db, options.full).await?;
    emit(on_progress, SyncProgress::WatermarkResolved { since: watermark });

    let fetched = client.fetch_changed(watermark, on_progress).await?;
    tracing::info!(
        pages = fetched.pages,
        vocabs = fetched.vocabs.len(),
        items = fetched.items.len(),
        "Fetched changes"
    );

    // One timestamp for every vocab touched by this run.
    let synced_at = Utc::now().fixed_offset();
    let vocab_models: Vec<VocabActiveModel> = fetched
        .vocabs
        .iter()
        .map(|v| vocab_to_active_model(v, synced_at))
        .collect();
    let item_models = fetched
        .items
        .iter()
        .map(item_to_active_model)
        .collect::<Result<Vec<ItemActiveModel>, _>>()?;
    emit(
        on_progress,
        SyncProgress::Normalized {
            vocabs: vocab_models.len(),
            items: item_models.len(),
        },
    );

    emit(
        on_progress,
        SyncProgress::PersistingVocabs {
            count: vocab_models.len(),
        },
    );
    let vocabs_affected = store::upsert_vocabs(db, vocab_models).await?;
    emit(
        on_progress,
        SyncProgress::PersistedVocabs {
            rows_affected: vocabs_affected,
        },
    );

    let items_affected =
        store::replace_items(db, item_models, options.batch_size, on_progress).await?;

    emit(
        on_progress,
        SyncProgress::SyncComplete {
            vocabs_affected,
            items_affected,
        },
    );
    tracing::info!(vocabs_affected, items_affected, "Sync complete");

    Ok(SyncSummary {
        watermark,
        pages: fetched.pages,
        vocabs_fetched: fetched.vocabs.len(),
        items_fetched: fetched.items.len(),
        vocabs_affected,
        items_affected,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{HttpResponse, MockTransport};
    use crate::skritter::{ConvertError, SkritterError};
    use crate::store::StoreError;
    use chrono::{TimeZone, Utc};
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult, Value};
    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex};

    const BASE: &str = "https://skritter.test/api/v0";
    const FIRST_PAGE: &str =
        "https://skritter.test/api/v0/items?include_vocabs=true&include_heisigs=true";

    fn ok(body: serde_json::Value) -> HttpResponse {
        HttpResponse::new(200, serde_json::to_vec(&body).expect("serialize"))
    }

    fn item(id: &str, vocab_ids: &[&str]) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "part": "rune",
            "changed": 1_700_000_000,
            "last": 1_700_000_000,
            "created": 1_600_000_000,
            "next": 1_700_100_000,
            "reviews": 3,
            "successes": 2,
            "vocabIds": vocab_ids,
        })
    }

    fn exec(rows: u64) -> MockExecResult {
        MockExecResult {
            rows_affected: rows,
            last_insert_id: 0,
        }
    }

    fn client(transport: &MockTransport) -> SkritterClient {
        SkritterClient::new_with_transport(BASE, "token", Arc::new(transport.clone()))
    }

    #[tokio::test]
    async fn full_sync_fetches_normalizes_and_writes() {
        let transport = MockTransport::new();
        transport.push_response(
            FIRST_PAGE,
            ok(serde_json::json!({
                "cursor": "p2",
                "Vocabs": [{"id": "v1", "writing": "人"}],
                "Items": [item("i1", &["v1"]), item("i2", &["v1"])],
            })),
        );
        transport.push_response(
            format!("{FIRST_PAGE}&cursor=p2"),
            ok(serde_json::json!({
                "cursor": "",
                "Vocabs": [{"id": "v2", "writing": "大"}],
                "Items": [item("i3", &["v2"])],
            })),
        );

        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_exec_results([exec(2), exec(2), exec(1)])
            .into_connection();

        let events = Arc::new(Mutex::new(Vec::new()));
        let events_clone = Arc::clone(&events);
        let callback: ProgressCallback = Box::new(move |event| {
            events_clone.lock().expect("lock").push(event);
        });

        let options = SyncOptions {
            full: true,
            batch_size: 2,
        };
        let summary = run_sync(&db, &client(&transport), &options, Some(&callback))
            .await
            .expect("sync should succeed");

        assert_eq!(
            summary,
            SyncSummary {
                watermark: None,
                pages: 2,
                vocabs_fetched: 2,
                items_fetched: 3,
                vocabs_affected: 2,
                items_affected: 3,
            }
        );

        // vocab upsert + two item batches
        assert_eq!(db.into_transaction_log().len(), 3);

        let events = events.lock().expect("lock");
        assert!(matches!(
            events.first(),
            Some(SyncProgress::WatermarkResolved { since: None })
        ));
        assert!(matches!(
            events.last(),
            Some(SyncProgress::SyncComplete {
                vocabs_affected: 2,
                items_affected: 3
            })
        ));
    }

    #[tokio::test]
    async fn incremental_sync_requests_changes_since_watermark() {
        let changed = Utc
            .timestamp_opt(1_700_000_000, 0)
            .single()
            .expect("valid ts");
        let row: BTreeMap<&str, Value> =
            BTreeMap::from([("changed", Value::from(changed.fixed_offset()))]);

        let transport = MockTransport::new();
        transport.push_response(
            format!("{FIRST_PAGE}&sort=changed&offset=1700000000"),
            ok(serde_json::json!({"cursor": "", "Vocabs": [], "Items": []})),
        );

        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_query_results([vec![row]])
            .into_connection();

        let summary = run_sync(&db, &client(&transport), &SyncOptions::default(), None)
            .await
            .expect("sync should succeed");

        assert_eq!(summary.watermark, Some(changed));
        assert_eq!(summary.items_affected, 0);
        assert_eq!(summary.vocabs_affected, 0);
    }

    #[tokio::test]
    async fn item_without_vocab_aborts_before_any_write() {
        let transport = MockTransport::new();
        transport.push_response(
            FIRST_PAGE,
            ok(serde_json::json!({
                "cursor": "",
                "Vocabs": [{"id": "v1"}],
                "Items": [item("orphan", &[])],
            })),
        );
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let options = SyncOptions {
            full: true,
            ..SyncOptions::default()
        };
        let err = run_sync(&db, &client(&transport), &options, None)
            .await
            .expect_err("orphan item must fail");

        assert!(matches!(
            err,
            SyncError::InvalidRecord(ConvertError::MissingVocab { ref item_id }) if item_id == "orphan"
        ));
        assert!(db.into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn fetch_failure_aborts_before_any_write() {
        let transport = MockTransport::new();
        transport.push_response(
            FIRST_PAGE,
            HttpResponse::new(401, "invalid token"),
        );
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let options = SyncOptions {
            full: true,
            ..SyncOptions::default()
        };
        let err = run_sync(&db, &client(&transport), &options, None)
            .await
            .expect_err("401 must fail");

        assert!(matches!(
            err,
            SyncError::Fetch(SkritterError::Api { status: 401, .. })
        ));
        assert!(db.into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn store_failure_surfaces_batch_context() {
        let transport = MockTransport::new();
        transport.push_response(
            FIRST_PAGE,
            ok(serde_json::json!({
                "cursor": "",
                "Vocabs": [{"id": "v1"}],
                "Items": [item("i1", &["v1"])],
            })),
        );
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_exec_results([exec(1)])
            .append_exec_errors([DbErr::Custom("disk I/O error".to_string())])
            .into_connection();

        let options = SyncOptions {
            full: true,
            ..SyncOptions::default()
        };
        let err = run_sync(&db, &client(&transport), &options, None)
            .await
            .expect_err("write failure must surface");

        assert!(matches!(
            err,
            SyncError::Store(StoreError::Batch {
                batch: 1,
                total_batches: 1,
                committed: 0,
                ..
            })
        ));
    }
}
