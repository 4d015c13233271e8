use charstats::db;
use charstats::migration::{Migrator, MigratorTrait};

use crate::MigrateAction;

pub(crate) async fn handle_migrate(
    action: MigrateAction,
    database_url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = db::connect(database_url).await?;

    match action {
        MigrateAction::Up => {
            let pending = Migrator::get_pending_migrations(&db).await?;
            if pending.is_empty() {
                println!("Schema is up to date.");
                return Ok(());
            }
            println!("Applying {} migration(s)...", pending.len());
            Migrator::up(&db, None).await?;
            println!("Migrations applied successfully.");
        }
        MigrateAction::Down => {
            println!("Rolling back last migration...");
            Migrator::down(&db, Some(1)).await?;
            println!("Rollback complete.");
        }
        MigrateAction::Status => {
            let applied = Migrator::get_applied_migrations(&db).await?;
            let pending = Migrator::get_pending_migrations(&db).await?;
            println!("Database: {}", database_url);
            for migration in &applied {
                println!("  applied  {}", migration.name());
            }
            for migration in &pending {
                println!("  pending  {}", migration.name());
            }
        }
        MigrateAction::Fresh => {
            println!("Dropping vocab and item tables and reapplying migrations...");
            Migrator::fresh(&db).await?;
            println!("Fresh migration complete. Run `charstats sync --full` to repopulate.");
        }
    }

    Ok(())
}
