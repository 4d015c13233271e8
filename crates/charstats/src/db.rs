//! Database connection utilities.

use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};

/// Attempts made by [`status_check`] before giving up on the ping.
const STATUS_PING_ATTEMPTS: usize = 5;

/// Configure SQLite-specific pragmas for better performance and concurrency.
///
/// This sets:
/// - `journal_mode=WAL` - Write-ahead logging so report reads don't block a sync
/// - `busy_timeout=5000` - Wait up to 5 seconds for locks instead of failing immediately
/// - `synchronous=NORMAL` - Good balance of safety and performance with WAL
async fn configure_sqlite(db: &DatabaseConnection) -> Result<(), DbErr> {
    for pragma in [
        "PRAGMA journal_mode=WAL",
        "PRAGMA busy_timeout=5000",
        "PRAGMA synchronous=NORMAL",
    ] {
        db.execute(Statement::from_string(
            db.get_database_backend(),
            pragma.to_string(),
        ))
        .await?;
    }

    Ok(())
}

/// Establish a connection to the database.
///
/// SQLite URLs (`sqlite://...`) get WAL journaling, a 5 second busy timeout and
/// NORMAL synchronous mode.
///
/// # Errors
/// Returns `DbErr` if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(database_url).await?;

    if database_url.starts_with("sqlite://") {
        configure_sqlite(&db).await?;
    }

    tracing::debug!(backend = ?db.get_database_backend(), "Connected to database");
    Ok(db)
}

/// Establish a connection to the database and run all pending migrations.
///
/// # Errors
/// Returns `DbErr` if the connection cannot be established or migrations fail.
///
/// # Example
/// ```ignore
/// let db = charstats::connect_and_migrate("sqlite://skritter.db?mode=rwc").await?;
/// ```
#[cfg(feature = "migrate")]
pub async fn connect_and_migrate(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    use sea_orm_migration::MigratorTrait;

    let db = connect(database_url).await?;
    crate::migration::Migrator::up(&db, None).await?;
    Ok(db)
}

/// Verify the database is reachable.
///
/// The ping is retried a few times with exponential backoff (100ms doubling)
/// since a freshly created SQLite file can briefly be locked. A `SELECT 1`
/// round trip then confirms queries actually execute.
///
/// # Errors
/// Returns the last ping error, or the query error, if the database cannot be
/// reached.
pub async fn status_check(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backoff = ExponentialBuilder::default()
        .with_min_delay(Duration::from_millis(100))
        .with_max_delay(Duration::from_secs(2))
        .with_max_times(STATUS_PING_ATTEMPTS);

    (|| async { db.ping().await })
        .retry(backoff)
        .notify(|err, dur| {
            tracing::warn!(error = %err, delay_ms = dur.as_millis() as u64, "Database ping failed, retrying");
        })
        .await?;

    let row = db
        .query_one(Statement::from_string(
            db.get_database_backend(),
            "SELECT 1 AS ok".to_string(),
        ))
        .await?;

    match row {
        Some(_) => Ok(()),
        None => Err(DbErr::Custom(
            "status check query returned no rows".to_string(),
        )),
    }
}
