use std::process::ExitCode;

use clap::{Parser, Subcommand};
use eduprivacy_data::PostgrestClient;

use eduprivacy_admin::commands;
use eduprivacy_admin::commands::migrate::MigrateOptions;
use eduprivacy_admin::config::{MigratorConfig, VerifierConfig};

#[derive(Parser)]
#[command(name = "eduprivacy-admin")]
#[command(about = "Organization schema migration and configuration checks for EduPrivacy")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Migrate organizations into dedicated database schemas
    Migrate {
        /// Log what would be migrated without calling the backend
        #[arg(long)]
        dry_run: bool,

        /// Migrate a single organization by id
        #[arg(long)]
        org_id: Option<String>,

        /// Migrate every organization, oldest first (default when no --org-id)
        #[arg(long, conflicts_with = "org_id")]
        all: bool,
    },

    /// Check environment, connectivity, and migration completeness
    Verify,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match run().await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<u8> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();

    match cli.command {
        // `all` is the default behavior; the flag only exists to conflict
        // with --org-id at parse time.
        Commands::Migrate {
            dry_run,
            org_id,
            all: _,
        } => {
            // Config is resolved before any client exists; missing variables
            // abort here, ahead of the first network call.
            let config = MigratorConfig::from_env()?;
            tracing::debug!(url = %config.supabase_url, "loaded migrator config");
            let client = PostgrestClient::new(&config.supabase_url, &config.service_role_key)?;
            let opts = MigrateOptions { dry_run, org_id };
            commands::migrate::run(&client, &opts).await
        }

        Commands::Verify => {
            let config = VerifierConfig::from_env()?;
            tracing::debug!(
                url = %config.supabase_url,
                elevated = config.service_role_key.is_some(),
                "loaded verifier config"
            );
            commands::verify::run(&config).await
        }
    }
}
