//! Ctrl+C handling.
//!
//! A sync run has no cancellation points of its own. Interrupting drops the
//! running command future, so committed item batches stay and the batch in
//! flight is rolled back by the database. The next run picks up from the
//! stored watermark.

use std::future::Future;

use console::Term;

/// Exit status for a run stopped by SIGINT.
const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Resolve once Ctrl+C is pressed. Never resolves if the handler can't be installed.
async fn interrupted() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %error, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
}

/// Run `work` to completion, or exit with status 130 on Ctrl+C.
pub(crate) async fn run_until_interrupted<F, T>(work: F) -> T
where
    F: Future<Output = T>,
{
    tokio::select! {
        result = work => result,
        () = interrupted() => {
            if Term::stdout().is_term() {
                eprintln!("\n\nInterrupted. Committed batches were kept; run sync again to resume.");
            } else {
                tracing::warn!("Interrupted, stopping");
            }
            std::process::exit(INTERRUPTED_EXIT_CODE);
        }
    }
}
