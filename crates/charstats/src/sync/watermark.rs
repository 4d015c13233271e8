//! Sync boundary selection.

use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;

use crate::store::{self, StoreError};

/// Decide the `changed` lower bound for a sync.
///
/// `full` forces a full sync. Otherwise the newest stored item change is
/// used, and an empty store also yields a full sync.
pub async fn resolve_watermark(
    db: &DatabaseConnection,
    full: bool,
) -> Result<Option<DateTime<Utc>>, StoreError> {
    if full {
        tracing::debug!("Full sync requested, ignoring local watermark");
        return Ok(None);
    }

    let since = store::latest_changed(db).await?;
    match since {
        Some(ts) => tracing::debug!(since = %ts, "Incremental sync from local watermark"),
        None => tracing::debug!("No local items, falling back to full sync"),
    }
    Ok(since)
}
