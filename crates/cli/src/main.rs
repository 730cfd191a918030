//! Nexus CLI - Database migrations and account management.
//!
//! # Usage
//!
//! ```bash
//! # Apply schema and session-store migrations
//! nexus-cli migrate
//!
//! # Create an account without going through the web form
//! NEXUS_USER_PASSWORD=... nexus-cli user create \
//!     --name Ana --surname Souza --email ana@example.com --phone 5511987654321
//! ```
//!
//! # Environment Variables
//!
//! - `NEXUS_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `NEXUS_USER_PASSWORD` - Password for `user create` when `--password` is omitted

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "nexus-cli")]
#[command(author, version, about = "Nexus CLI tools")]
struct Cli {
    /// `PostgreSQL` connection string
    #[arg(long, global = true, env = "NEXUS_DATABASE_URL", hide_env_values = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations (schema and session store)
    Migrate,
    /// Manage user accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new account
    Create {
        /// First name
        #[arg(short, long)]
        name: String,

        /// Family name
        #[arg(short, long)]
        surname: String,

        /// Login email address
        #[arg(short, long)]
        email: String,

        /// Phone number, digits with optional formatting
        #[arg(short, long)]
        phone: String,

        /// Account password
        #[arg(long, env = "NEXUS_USER_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

#[tokio::main]
async fn main() {
    // Load .env before clap reads `env = ...` defaults
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let database_url = commands::database_url(cli.database_url)?;

    match cli.command {
        Commands::Migrate => commands::migrate::run(&database_url).await?,
        Commands::User { action } => match action {
            UserAction::Create {
                name,
                surname,
                email,
                phone,
                password,
            } => {
                let form = nexus_server::models::Registration {
                    name,
                    surname,
                    email,
                    phone,
                    password,
                };
                commands::user::create(&database_url, form).await?;
            }
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_user_create() {
        let cli = Cli::try_parse_from([
            "nexus-cli",
            "user",
            "create",
            "--name",
            "Ana",
            "--surname",
            "Souza",
            "--email",
            "ana@example.com",
            "--phone",
            "5511987654321",
            "--password",
            "secret1",
        ])
        .expect("arguments should parse");

        assert!(matches!(
            cli.command,
            Commands::User {
                action: UserAction::Create { ref email, .. }
            } if email == "ana@example.com"
        ));
    }
}
