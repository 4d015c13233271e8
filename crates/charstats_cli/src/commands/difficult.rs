//! The `difficult` command: list the items with the lowest success rate.

use clap::ValueEnum;
use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use charstats::db;
use charstats::store::{DifficultItem, DifficultyQuery, hardest_items};

use crate::config::Config;

/// Output format for the report.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Display as a formatted table (default)
    #[default]
    Table,
    /// One compact line per item
    Plain,
    /// Display as JSON
    Json,
}

/// Flags accepted by `charstats difficult`.
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct DifficultArgs {
    /// Number of items to show (default from config or 3)
    #[arg(short = 'n', long)]
    limit: Option<u64>,

    /// Include tone items
    #[arg(long)]
    tone: bool,

    /// Include reading items
    #[arg(long)]
    reading: bool,

    /// Exclude writing items
    #[arg(long)]
    no_writing: bool,

    /// Exclude definition items
    #[arg(long)]
    no_definition: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
}

impl DifficultArgs {
    fn query(&self, config: &Config) -> DifficultyQuery {
        DifficultyQuery {
            limit: self.limit.unwrap_or(config.report.limit),
            writing: !self.no_writing,
            definition: !self.no_definition,
            tone: self.tone,
            reading: self.reading,
        }
    }
}

/// Display struct for report rows.
#[derive(Debug, Clone, Serialize, Tabled)]
struct DifficultDisplay {
    #[tabled(rename = "Success")]
    percent: String,
    #[tabled(rename = "Part")]
    part: String,
    #[tabled(rename = "Writing")]
    writing: String,
    #[tabled(rename = "Reading")]
    reading: String,
    #[tabled(rename = "Heisig")]
    heisig: String,
    #[tabled(rename = "Definition")]
    definition: String,
    #[tabled(rename = "Reviews")]
    reviews: i32,
}

impl From<&DifficultItem> for DifficultDisplay {
    fn from(item: &DifficultItem) -> Self {
        Self {
            percent: format!("{:02}%", item.percent),
            part: item.part_label().to_string(),
            writing: item.writing.clone(),
            reading: item.reading.clone(),
            heisig: single_line(&item.heisig_definition),
            definition: single_line(&item.definition_en),
            reviews: item.reviews,
        }
    }
}

/// Collapse embedded newlines so each item stays on one row.
fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn plain_line(item: &DifficultItem) -> String {
    format!(
        "{:02}% {:<8} {:<2} {:<15} [{}] {}",
        item.percent,
        item.part_label(),
        item.writing,
        format!("({})", item.reading),
        single_line(&item.heisig_definition),
        single_line(&item.definition_en),
    )
}

pub(crate) async fn handle_difficult(
    args: DifficultArgs,
    config: &Config,
    database_url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = db::connect_and_migrate(database_url).await?;
    db::status_check(&db).await?;

    let items = hardest_items(&db, &args.query(config)).await?;

    match args.output {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&items)?);
        }
        _ if items.is_empty() => {
            println!("No reviewed items yet. Run `charstats sync` first.");
        }
        OutputFormat::Table => {
            let displays: Vec<DifficultDisplay> = items.iter().map(DifficultDisplay::from).collect();
            let mut table = Table::new(displays);
            table.with(Style::rounded());
            println!("{}", table);
        }
        OutputFormat::Plain => {
            for item in &items {
                println!("{}", plain_line(item));
            }
        }
    }

    Ok(())
}
