//! Local store operations for vocab and items.
//!
//! Writes are idempotent: re-running a sync with the same records leaves the
//! same rows behind (vocab `created_at` aside).

mod errors;
mod items;
mod report;
mod vocab;

pub use errors::{Result, StoreError};
pub use items::{latest_changed, replace_items};
pub use report::{DEFAULT_REPORT_LIMIT, DifficultItem, DifficultyQuery, hardest_items};
pub use vocab::upsert_vocabs;
