use charstats::sync::SyncProgress;

/// Logging reporter using tracing for structured output.
pub struct LoggingReporter;

impl LoggingReporter {
    pub fn new() -> Self {
        Self
    }

    pub fn handle(&self, event: SyncProgress) {
        match event {
            SyncProgress::WatermarkResolved { since } => match since {
                Some(since) => tracing::info!(since = %since, "Incremental sync"),
                None => tracing::info!("Full sync"),
            },

            SyncProgress::FetchedPage {
                page,
                vocabs,
                items,
                has_more,
            } => {
                tracing::debug!(page, vocabs, items, has_more, "Fetched page");
            }

            SyncProgress::FetchComplete {
                pages,
                vocabs,
                items,
            } => {
                tracing::info!(pages, vocabs, items, "Fetch complete");
            }

            SyncProgress::Normalized { vocabs, items } => {
                tracing::debug!(vocabs, items, "Records normalized");
            }

            SyncProgress::PersistingVocabs { count } => {
                tracing::debug!(count, "Saving vocabs");
            }

            SyncProgress::PersistedVocabs { rows_affected } => {
                tracing::info!(rows_affected, "Vocabs saved");
            }

            SyncProgress::PersistingBatch {
                batch,
                total_batches,
                size,
            } => {
                tracing::debug!(batch, total_batches, size, "Saving item batch");
            }

            SyncProgress::PersistedBatch {
                batch,
                total_batches,
                rows_affected,
            } => {
                tracing::debug!(batch, total_batches, rows_affected, "Item batch saved");
            }

            SyncProgress::SyncComplete {
                vocabs_affected,
                items_affected,
            } => {
                tracing::info!(vocabs_affected, items_affected, "Sync complete");
            }

            _ => {}
        }
    }
}

impl Default for LoggingReporter {
    fn default() -> Self {
        Self::new()
    }
}
