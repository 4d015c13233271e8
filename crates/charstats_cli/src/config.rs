//! Configuration file support for charstats.
//!
//! Configuration is loaded with the following precedence (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (prefixed with `CHARSTATS_`, e.g., `CHARSTATS_SKRITTER_TOKEN`)
//! 3. Config file (./charstats.toml, then ~/.config/charstats/config.toml)
//! 4. Built-in defaults
//!
//! The database URL defaults to `sqlite://~/.local/state/charstats/charstats.db` on Linux
//! (using the XDG state directory) if not explicitly configured.
//!
//! Example config file:
//! ```toml
//! [database]
//! url = "sqlite:///home/me/skritter.db?mode=rwc"  # optional
//!
//! [skritter]
//! token = "..."  # or use CHARSTATS_SKRITTER_TOKEN env var
//! host = "https://legacy.skritter.com/api/v0"
//!
//! [sync]
//! batch_size = 100
//!
//! [report]
//! limit = 3
//! ```

use std::path::{Path, PathBuf};

use charstats::skritter::DEFAULT_BASE_URL;
use charstats::store::DEFAULT_REPORT_LIMIT;
use charstats::sync::DEFAULT_BATCH_SIZE;
use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub skritter: SkritterConfig,
    pub sync: SyncConfig,
    pub report: ReportConfig,
}

/// Database configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database connection URL.
    /// Supports sqlite:// and postgres:// schemes.
    pub url: Option<String>,
}

/// Skritter API configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SkritterConfig {
    /// API token. Can also be set via CHARSTATS_SKRITTER_TOKEN.
    pub token: Option<String>,
    /// API base URL. Can also be set via CHARSTATS_SKRITTER_HOST.
    pub host: Option<String>,
}

/// Default sync options.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Items written per statement.
    pub batch_size: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

/// Default report options.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Rows shown by `difficult`.
    pub limit: u64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_REPORT_LIMIT,
        }
    }
}

impl Config {
    /// Load configuration using the config crate's layered approach.
    ///
    /// Sources are loaded in order (later sources override earlier):
    /// 1. Built-in defaults
    /// 2. XDG config file (~/.config/charstats/config.toml)
    /// 3. Local config file (./charstats.toml)
    /// 4. Environment variables with CHARSTATS_ prefix
    pub fn load() -> Self {
        let mut builder = ConfigBuilder::builder();

        if let Some(proj_dirs) = ProjectDirs::from("", "", "charstats") {
            let xdg_config = proj_dirs.config_dir().join("config.toml");
            if xdg_config.exists() {
                tracing::debug!("Loading config from {:?}", xdg_config);
                builder = builder.add_source(
                    File::from(xdg_config)
                        .format(FileFormat::Toml)
                        .required(false),
                );
            }
        }

        let local_config = PathBuf::from("charstats.toml");
        if local_config.exists() {
            tracing::debug!("Loading config from ./charstats.toml");
            builder = builder.add_source(
                File::from(local_config)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        // e.g., CHARSTATS_SKRITTER_TOKEN -> skritter.token
        builder = builder.add_source(
            Environment::with_prefix("CHARSTATS")
                .separator("_")
                .try_parsing(true),
        );

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<Config>() {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Failed to deserialize config: {}", e);
                    Config::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to build config: {}", e);
                Config::default()
            }
        }
    }

    /// Get the database URL.
    ///
    /// An explicit `--db` path wins, then the configured URL, then
    /// `charstats.db` in the state directory. SQLite URLs built here carry
    /// `mode=rwc` so the file is created on first use.
    pub fn database_url(&self, db_path: Option<&Path>) -> Option<String> {
        if let Some(path) = db_path {
            return Some(sqlite_url(path));
        }

        self.database.url.clone().or_else(|| {
            Self::default_state_dir().map(|state_dir| sqlite_url(&state_dir.join("charstats.db")))
        })
    }

    /// Get the Skritter token.
    pub fn skritter_token(&self) -> Option<String> {
        self.skritter.token.clone().filter(|t| !t.is_empty())
    }

    /// Get the Skritter API base URL.
    pub fn skritter_host(&self) -> String {
        self.skritter
            .host
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    /// Get the default state directory path.
    ///
    /// On Linux, this is `$XDG_STATE_HOME/charstats` or `~/.local/state/charstats`.
    /// On macOS/Windows, falls back to the data directory.
    pub fn default_state_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "charstats").map(|dirs| {
            dirs.state_dir()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| dirs.data_dir().to_path_buf())
        })
    }
}

fn sqlite_url(path: &Path) -> String {
    format!("sqlite://{}?mode=rwc", path.display())
}
