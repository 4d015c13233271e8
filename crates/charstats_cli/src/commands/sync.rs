//! The `sync` command: pull changed vocab and items into the local database.

use std::sync::Arc;

use charstats::db;
use charstats::skritter::SkritterClient;
use charstats::sync::{SyncOptions, SyncSummary, run_sync};
use console::{Term, style};

use crate::config::Config;
use crate::progress::ProgressReporter;

/// Flags accepted by `charstats sync`.
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SyncArgs {
    /// Skritter API token (default from config or CHARSTATS_SKRITTER_TOKEN)
    #[arg(short, long)]
    token: Option<String>,

    /// Ignore the last sync time and fetch everything
    #[arg(short, long)]
    full: bool,

    /// Items written per statement (default from config or 100)
    #[arg(short, long)]
    batch_size: Option<usize>,
}

impl SyncArgs {
    fn options(&self, config: &Config) -> SyncOptions {
        SyncOptions {
            full: self.full,
            batch_size: self.batch_size.unwrap_or(config.sync.batch_size),
        }
    }

    fn token(&self, config: &Config) -> Option<String> {
        self.token
            .clone()
            .filter(|t| !t.is_empty())
            .or_else(|| config.skritter_token())
    }
}

pub(crate) async fn handle_sync(
    args: SyncArgs,
    config: &Config,
    database_url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let token = args.token(config).ok_or(
        "No Skritter token configured. Pass --token or set CHARSTATS_SKRITTER_TOKEN.",
    )?;
    let options = args.options(config);

    let db = db::connect_and_migrate(database_url).await?;
    db::status_check(&db).await?;

    let client = SkritterClient::new(&config.skritter_host(), &token)?;
    tracing::debug!(base_url = client.base_url(), full = options.full, "Starting sync");

    let is_tty = Term::stdout().is_term();
    let reporter = Arc::new(ProgressReporter::new());
    let callback = reporter.as_callback();

    let result = run_sync(&db, &client, &options, Some(&*callback)).await;
    reporter.finish();
    let summary = result?;

    if is_tty {
        println!();
        for line in summary_lines(&summary) {
            println!("{}", line);
        }
    } else {
        tracing::info!(
            watermark = ?summary.watermark,
            pages = summary.pages,
            vocabs_fetched = summary.vocabs_fetched,
            items_fetched = summary.items_fetched,
            vocabs_affected = summary.vocabs_affected,
            items_affected = summary.items_affected,
            "Sync finished"
        );
    }

    Ok(())
}

fn summary_lines(summary: &SyncSummary) -> Vec<String> {
    let mode = match summary.watermark {
        Some(since) => format!("changes since {}", since.format("%Y-%m-%d %H:%M:%S UTC")),
        None => "full sync".to_string(),
    };

    vec![
        format!("{} ({})", style("Sync complete").bold().green(), mode),
        format!(
            "  Fetched: {} vocabs, {} items over {} page(s)",
            summary.vocabs_fetched, summary.items_fetched, summary.pages
        ),
        format!(
            "  Saved:   {} vocab rows, {} item rows",
            summary.vocabs_affected, summary.items_affected
        ),
    ]
}
