//! Sync of Skritter study records into the local store.
//!
//! # Module Structure
//!
//! - [`types`] - `SyncOptions`, `SyncSummary`, `SyncError`
//! - [`progress`] - Progress reporting: `SyncProgress`, `ProgressCallback`, `emit()`
//! - [`watermark`] - Full vs. incremental boundary selection
//! - [`engine`] - The sync run itself: `run_sync()`

mod engine;
mod progress;
mod types;
mod watermark;

pub use engine::run_sync;
pub use progress::{ProgressCallback, SyncProgress, emit};
pub use types::{DEFAULT_BATCH_SIZE, SyncError, SyncOptions, SyncSummary};
pub use watermark::resolve_watermark;
