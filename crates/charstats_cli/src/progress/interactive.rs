use std::sync::Mutex;
use std::time::Duration;

use charstats::sync::SyncProgress;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

/// Consolidated progress state to avoid multiple mutex locks.
#[derive(Default)]
struct ProgressState {
    /// Spinner shown while paginating.
    fetch_bar: Option<ProgressBar>,
    /// Pages seen so far.
    pages: u32,
    /// Items seen so far, before deduplication.
    items_seen: usize,
    /// Spinner for the vocab upsert.
    vocab_bar: Option<ProgressBar>,
    /// Bar for item batches.
    save_bar: Option<ProgressBar>,
    /// Batches committed so far.
    batches_saved: usize,
}

/// Interactive progress reporter using indicatif.
pub struct InteractiveReporter {
    multi: MultiProgress,
    state: Mutex<ProgressState>,
}

impl InteractiveReporter {
    pub fn new() -> Self {
        Self::with_multi(MultiProgress::new())
    }

    /// A reporter that tracks state without drawing anything.
    #[cfg(test)]
    pub fn hidden() -> Self {
        Self::with_multi(MultiProgress::with_draw_target(
            indicatif::ProgressDrawTarget::hidden(),
        ))
    }

    fn with_multi(multi: MultiProgress) -> Self {
        Self {
            multi,
            state: Mutex::new(ProgressState::default()),
        }
    }

    fn fetch_bar(&self, state: &mut ProgressState) -> ProgressBar {
        state
            .fetch_bar
            .get_or_insert_with(|| {
                let pb = self.multi.add(ProgressBar::new_spinner());
                pb.set_style(Self::counter_style());
                pb.set_prefix("Fetch");
                pb.enable_steady_tick(Duration::from_millis(100));
                pb
            })
            .clone()
    }

    pub fn handle(&self, event: SyncProgress) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());

        match event {
            SyncProgress::WatermarkResolved { since } => {
                let pb = self.fetch_bar(&mut state);
                match since {
                    Some(since) => {
                        pb.set_message(format!("pages (changed since {})", since.format("%Y-%m-%d %H:%M")))
                    }
                    None => pb.set_message("pages (full sync)"),
                }
            }

            SyncProgress::FetchedPage { page, items, .. } => {
                state.pages = page;
                state.items_seen += items;
                let pb = self.fetch_bar(&mut state);
                pb.set_position(u64::from(page));
                pb.set_message(format!("pages, {} items", state.items_seen));
            }

            SyncProgress::FetchComplete {
                pages,
                vocabs,
                items,
            } => {
                state.pages = pages;
                let pb = self.fetch_bar(&mut state);
                pb.set_style(Self::done_style());
                pb.finish_with_message(format!(
                    "{} pages, {} vocabs, {} items",
                    pages, vocabs, items
                ));
            }

            SyncProgress::PersistingVocabs { count } => {
                let pb = self.multi.add(ProgressBar::new_spinner());
                pb.set_style(Self::spinner_style());
                pb.set_prefix("Vocab");
                pb.set_message(format!("saving {} vocabs", count));
                pb.enable_steady_tick(Duration::from_millis(100));
                state.vocab_bar = Some(pb);
            }

            SyncProgress::PersistedVocabs { rows_affected } => {
                if let Some(pb) = state.vocab_bar.take() {
                    pb.set_style(Self::done_style());
                    pb.finish_with_message(format!("{} rows", rows_affected));
                }
            }

            SyncProgress::PersistingBatch {
                batch,
                total_batches,
                size,
            } => {
                let pb = state
                    .save_bar
                    .get_or_insert_with(|| {
                        let pb = self.multi.add(ProgressBar::new(total_batches as u64));
                        pb.set_style(Self::bar_style());
                        pb.set_prefix("Items");
                        pb
                    })
                    .clone();
                pb.set_message(format!("batch {} ({} rows)", batch, size));
            }

            SyncProgress::PersistedBatch {
                batch,
                total_batches,
                ..
            } => {
                state.batches_saved = batch;
                if let Some(ref pb) = state.save_bar {
                    pb.set_position(batch as u64);
                    if batch == total_batches {
                        pb.finish_with_message("done");
                    }
                }
            }

            _ => {}
        }
    }

    #[cfg(test)]
    pub fn pages_fetched(&self) -> u32 {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).pages
    }

    #[cfg(test)]
    pub fn batches_saved(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .batches_saved
    }

    pub fn finish(&self) {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        for pb in [&state.fetch_bar, &state.vocab_bar, &state.save_bar]
            .into_iter()
            .flatten()
        {
            if !pb.is_finished() {
                pb.finish();
            }
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{prefix:.bold.cyan} {spinner:.green} {msg}")
            .expect("Invalid template")
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
    }

    fn counter_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{prefix:.bold.cyan} {spinner:.green} {pos:>4} {msg}")
            .expect("Invalid template")
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
    }

    fn done_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{prefix:.bold.cyan} {msg:.green}")
            .expect("Invalid template")
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos:>3}/{len:3} {msg}")
            .expect("Invalid template")
            .progress_chars("█▓░")
    }
}

impl Default for InteractiveReporter {
    fn default() -> Self {
        Self::new()
    }
}
