//! Migrate command - manual control over the clinic schema.

use crate::cli::args::{MigrateAction, MigrateArgs};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::Database;

/// Execute the migrate command
pub async fn execute(args: MigrateArgs, config: Config) -> AppResult<()> {
    if let MigrateAction::Fresh { force: false } = args.action {
        return Err(AppError::validation(
            "migrate fresh drops every clinic table; pass --force to confirm",
        ));
    }

    let db = Database::connect_without_migrations(&config).await?;

    match args.action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            let (applied, _) = summarize(&db.migration_status().await?);
            tracing::info!(applied, "Schema is up to date");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            let (applied, pending) = summarize(&db.migration_status().await?);
            tracing::info!(applied, pending, "Rolled back the last migration");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            for (name, applied) in &status {
                tracing::info!(migration = %name, applied, "Migration");
            }
            let (applied, pending) = summarize(&status);
            tracing::info!(applied, pending, "Migration status");
        }
        MigrateAction::Fresh { .. } => {
            tracing::warn!("Dropping all tables and re-running migrations");
            db.fresh_migrations().await?;
            let (applied, _) = summarize(&db.migration_status().await?);
            tracing::info!(applied, "Schema recreated");
        }
    }

    Ok(())
}

/// `(applied, pending)` counts
fn summarize(status: &[(String, bool)]) -> (usize, usize) {
    let applied = status.iter().filter(|(_, applied)| *applied).count();
    (applied, status.len() - applied)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_counts() {
        let status = vec![
            ("m20240101_000001_create_accounts".to_string(), true),
            ("m20240102_000001_create_staff".to_string(), true),
            ("m20240103_000001_create_catalog".to_string(), false),
        ];
        assert_eq!(summarize(&status), (2, 1));
        assert_eq!(summarize(&[]), (0, 0));
    }

    #[tokio::test]
    async fn test_fresh_requires_force() {
        let config = Config::new("postgres://nowhere.invalid/clinic", "x".repeat(40)).unwrap();
        let result = execute(
            MigrateArgs {
                action: MigrateAction::Fresh { force: false },
            },
            config,
        )
        .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
