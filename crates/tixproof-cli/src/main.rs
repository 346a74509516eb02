//! Tixproof CLI: replay a ticket-proof upload session and inspect its diff.
//!
//! Settings come from the environment (`TIXPROOF_*`, `.env` is loaded). With
//! `--submit` the diff is sent to TIXPROOF_API_URL using TIXPROOF_API_KEY.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tixproof_api_client::ApiClient;
use tixproof_cli::{init_tracing, replay, SessionScript};
use tixproof_core::{EngineConfig, NoOpSubmissionEndpoint, SubmissionEndpoint};

#[derive(Parser)]
#[command(name = "tixproof", about = "Ticket proof upload session tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a session script and print the resulting diff payload
    Replay {
        /// Path to the JSON session script
        script: PathBuf,
        /// Send slot deletes and the final diff to the backend
        #[arg(long)]
        submit: bool,
    },
    /// Print the effective configuration
    Config,
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = EngineConfig::from_env().context("Invalid TIXPROOF_* configuration")?;

    match cli.command {
        Commands::Replay { script, submit } => {
            let session = SessionScript::from_file(&script)?;
            let base_dir = script.parent().unwrap_or_else(|| Path::new("."));

            let client;
            let endpoint: &dyn SubmissionEndpoint = if submit {
                client = ApiClient::from_config(&config).context(
                    "Failed to create API client. Set TIXPROOF_API_URL and TIXPROOF_API_KEY",
                )?;
                &client
            } else {
                &NoOpSubmissionEndpoint
            };

            let report = replay(&session, base_dir, config.engine.clone(), endpoint, submit).await?;
            print_json(&report)?;
        }
        Commands::Config => {
            print_json(&serde_json::json!({
                "api_url": config.api_url,
                "api_key_set": config.api_key.is_some(),
                "api_auth": config.api_auth.to_string(),
                "api_version": config.api_version,
                "request_timeout_secs": config.request_timeout_secs,
                "success_status": config.engine.success_status,
                "delete_failure_policy": config.engine.delete_failure_policy.to_string(),
                "max_file_size_bytes": config.engine.max_file_size_bytes,
                "allowed_extensions": config.engine.allowed_extensions,
            }))?;
        }
    }

    Ok(())
}
