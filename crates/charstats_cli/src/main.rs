//! charstats CLI - sync Skritter study data and report on it locally.

mod commands;
mod config;
mod progress;
mod shutdown;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use console::Term;
use tracing_subscriber::EnvFilter;

use crate::commands::difficult::DifficultArgs;
use crate::commands::sync::SyncArgs;

#[derive(Parser)]
#[command(name = "charstats")]
#[command(version)]
#[command(about = "Sync Skritter vocab and review items into a local database")]
#[command(
    long_about = "charstats pulls your Skritter vocab and review items into a local SQL \
database and reports on the characters you find hardest. Syncs are incremental: \
only items changed since the newest stored item are fetched."
)]
#[command(after_long_help = r#"EXAMPLES
    First sync (fetches everything):
        $ charstats sync --token $SKRITTER_TOKEN

    Show the ten hardest items, including tones:
        $ charstats difficult -n 10 --tone

    Use a specific database file:
        $ charstats --db ./skritter.db sync

    Generate shell completions:
        $ charstats completions bash > ~/.local/share/bash-completion/completions/charstats

CONFIGURATION
    charstats reads configuration from:
      1. ~/.config/charstats/config.toml (or $XDG_CONFIG_HOME/charstats/config.toml)
      2. ./charstats.toml
      3. Environment variables (CHARSTATS_* prefix, e.g., CHARSTATS_SKRITTER_TOKEN)
      4. .env file in current directory

ENVIRONMENT VARIABLES
    CHARSTATS_DATABASE_URL      Database connection string (default: ~/.local/state/charstats/charstats.db)
    CHARSTATS_SKRITTER_TOKEN    Skritter API token
    CHARSTATS_SKRITTER_HOST     Skritter API base URL (default: https://legacy.skritter.com/api/v0)
"#)]
struct Cli {
    /// SQLite database file (overrides the configured database URL)
    #[arg(long, global = true, value_name = "PATH")]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch changed vocab and items from Skritter
    Sync(SyncArgs),
    /// Show the items with the lowest success rate
    Difficult(DifficultArgs),
    /// Run database migrations
    Migrate {
        #[command(subcommand)]
        action: MigrateAction,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
    /// Generate man page(s)
    Man {
        /// Output directory for man pages (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum MigrateAction {
    /// Apply all pending migrations
    Up,
    /// Rollback the last migration
    Down,
    /// Show migration status
    Status,
    /// Fresh install - drop all tables and reapply migrations
    Fresh,
}

/// Create the parent directory of a `sqlite://` database file.
fn ensure_sqlite_parent(database_url: &str) -> std::io::Result<()> {
    let Some(path) = database_url.strip_prefix("sqlite://") else {
        return Ok(());
    };
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() || path.starts_with(":memory:") {
        return Ok(());
    }

    let path = Path::new(path);
    if path.is_relative() {
        tracing::debug!(path = %path.display(), "Database path is relative to the current directory");
    }
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Structured logging only when there are no progress bars to draw
    if !Term::stdout().is_term() {
        let env_filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::new("charstats=info,charstats_cli=info"),
        };

        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .init();
    }

    let config = config::Config::load();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Completions { shell } => {
            commands::meta::handle_completions(*shell)?;
            return Ok(());
        }
        Commands::Man { output } => {
            commands::meta::handle_man(output.clone())?;
            return Ok(());
        }
        _ => {}
    }

    let database_url = config.database_url(cli.db.as_deref()).ok_or(
        "Could not determine a database location. Pass --db or set CHARSTATS_DATABASE_URL.",
    )?;
    ensure_sqlite_parent(&database_url)?;

    shutdown::run_until_interrupted(async {
        match cli.command {
            Commands::Sync(args) => {
                commands::sync::handle_sync(args, &config, &database_url).await
            }
            Commands::Difficult(args) => {
                commands::difficult::handle_difficult(args, &config, &database_url).await
            }
            Commands::Migrate { action } => {
                commands::migrate::handle_migrate(action, &database_url).await
            }
            Commands::Completions { .. } | Commands::Man { .. } => Ok(()),
        }
    })
    .await
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn db_flag_is_global() {
        let cli = Cli::parse_from(["charstats", "difficult", "--db", "/tmp/x.db"]);
        assert_eq!(cli.db.as_deref(), Some(Path::new("/tmp/x.db")));
    }

    #[test]
    fn sqlite_parent_is_created() {
        let dir = std::env::temp_dir().join(format!("charstats-parent-{}", std::process::id()));
        let url = format!("sqlite://{}/nested/charstats.db?mode=rwc", dir.display());

        ensure_sqlite_parent(&url).expect("parent should be created");
        assert!(dir.join("nested").is_dir());

        std::fs::remove_dir_all(&dir).expect("test directory should be removable");
    }

    #[test]
    fn non_sqlite_urls_are_left_alone() {
        ensure_sqlite_parent("postgres://localhost/charstats").expect("no-op");
        ensure_sqlite_parent("sqlite::memory:").expect("no-op");
    }
}
