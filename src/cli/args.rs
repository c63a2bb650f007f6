//! CLI argument definitions.
//!
//! Uses clap derive macros for type-safe argument parsing.

use clap::{Parser, Subcommand};

/// Clinic management backend
#[derive(Parser, Debug)]
#[command(name = "clinic")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve(ServeArgs),

    /// Run database migrations
    Migrate(MigrateArgs),

    /// Create an administrator account
    CreateAdmin(CreateAdminArgs),
}

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Host to bind to
    #[arg(short = 'H', long, default_value = "0.0.0.0", env = "SERVER_HOST")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "3000", env = "SERVER_PORT")]
    pub port: u16,
}

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub action: MigrateAction,
}

/// Migration actions
#[derive(Subcommand, Debug)]
pub enum MigrateAction {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Drop every table and re-run all migrations
    Fresh {
        /// Confirm that all clinic data will be deleted
        #[arg(long)]
        force: bool,
    },
}

/// Arguments for the create-admin command
#[derive(Parser, Debug)]
pub struct CreateAdminArgs {
    /// Login name of the new administrator
    #[arg(short, long)]
    pub username: String,

    /// Initial password
    #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Contact email
    #[arg(short, long)]
    pub email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_create_admin() {
        let cli = Cli::parse_from([
            "clinic",
            "create-admin",
            "--username",
            "root",
            "--password",
            "SecurePass123!",
        ]);

        match cli.command {
            Commands::CreateAdmin(args) => {
                assert_eq!(args.username, "root");
                assert_eq!(args.email, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parses_migrate_fresh_with_verbose() {
        let cli = Cli::parse_from(["clinic", "-v", "migrate", "fresh", "--force"]);
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Migrate(MigrateArgs {
                action: MigrateAction::Fresh { force: true }
            })
        ));

        let cli = Cli::parse_from(["clinic", "migrate", "fresh"]);
        assert!(matches!(
            cli.command,
            Commands::Migrate(MigrateArgs {
                action: MigrateAction::Fresh { force: false }
            })
        ));
    }
}
