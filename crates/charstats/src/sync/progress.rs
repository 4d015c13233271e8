//! Progress reporting types for sync runs.
//!
//! Events are emitted in run order: watermark, fetch pages, normalization,
//! then persistence. The CLI turns them into spinners or log lines.

use chrono::{DateTime, Utc};

/// Progress events emitted during a sync run.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum SyncProgress {
    /// The sync boundary has been decided.
    WatermarkResolved {
        /// `None` means a full sync.
        since: Option<DateTime<Utc>>,
    },

    /// Fetched one page from the remote service.
    FetchedPage {
        /// Page number (1-indexed).
        page: u32,
        /// Vocabs on this page.
        vocabs: usize,
        /// Items on this page.
        items: usize,
        /// Whether the server returned a continuation cursor.
        has_more: bool,
    },

    /// Pagination finished; counts are after deduplication.
    FetchComplete {
        pages: u32,
        vocabs: usize,
        items: usize,
    },

    /// Records have been mapped to the local schema.
    Normalized { vocabs: usize, items: usize },

    /// About to upsert the vocab collection.
    PersistingVocabs { count: usize },

    /// Vocab upsert finished.
    PersistedVocabs { rows_affected: u64 },

    /// About to write one batch of items.
    PersistingBatch {
        /// Batch number (1-indexed).
        batch: usize,
        total_batches: usize,
        /// Rows in this batch.
        size: usize,
    },

    /// One item batch committed.
    PersistedBatch {
        batch: usize,
        total_batches: usize,
        rows_affected: u64,
    },

    /// The whole run finished.
    SyncComplete {
        vocabs_affected: u64,
        items_affected: u64,
    },
}

/// Callback type for progress reporting.
pub type ProgressCallback = Box<dyn Fn(SyncProgress) + Send + Sync>;

/// Emit a progress event if a callback is provided.
///
/// # Example
///
/// ```ignore
/// emit(on_progress, SyncProgress::Normalized { vocabs: 3, items: 9 });
/// ```
pub fn emit(on_progress: Option<&ProgressCallback>, event: SyncProgress) {
    if let Some(cb) = on_progress {
        cb(event);
    }
}
