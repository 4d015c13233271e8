use sea_orm::DbErr;
use thiserror::Error;

/// Errors that can occur reading or writing the local store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from sea-orm.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// An item batch failed. Earlier batches stay committed.
    #[error("Item batch {batch}/{total_batches} failed after {committed} rows committed: {source}")]
    Batch {
        /// 1-indexed batch that failed.
        batch: usize,
        total_batches: usize,
        /// Rows affected by the batches that succeeded.
        committed: u64,
        #[source]
        source: DbErr,
    },

    /// Invalid input data.
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },
}

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
