//! Sync options, results and errors.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::skritter::{ConvertError, SkritterError};
use crate::store::StoreError;

/// Number of item rows written per statement.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Options for a sync run.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Ignore the local watermark and fetch everything.
    pub full: bool,
    /// Items per write statement.
    pub batch_size: usize,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            full: false,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

/// What a sync run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncSummary {
    /// Boundary used for the fetch; `None` for a full sync.
    pub watermark: Option<DateTime<Utc>>,
    /// Pages requested from the remote service.
    pub pages: u32,
    /// Distinct vocabs fetched.
    pub vocabs_fetched: usize,
    /// Distinct items fetched.
    pub items_fetched: usize,
    /// Rows reported affected by the vocab upsert.
    pub vocabs_affected: u64,
    /// Summed rows affected across all item batches.
    pub items_affected: u64,
}

/// Failures that abort a sync run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Fetching pages from the remote service failed.
    #[error("fetch failed: {0}")]
    Fetch(#[from] SkritterError),

    /// A fetched record could not be mapped to the local schema.
    #[error("invalid record: {0}")]
    InvalidRecord(#[from] ConvertError),

    /// Reading or writing the local store failed.
    #[error("store failed: {0}")]
    Store(#[from] StoreError),
}
