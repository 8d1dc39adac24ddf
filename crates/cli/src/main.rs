//! `wizplat` -- command-line client for the wizard platform.
//!
//! Lists wizards and runs, and plays wizards non-interactively from an
//! answers file.
//!
//! # Environment variables
//!
//! | Variable                       | Required | Default                        | Description                 |
//! |--------------------------------|----------|--------------------------------|-----------------------------|
//! | `WIZPLAT_API_URL`              | no       | `http://localhost:8000/api/v1` | Backend base URL            |
//! | `WIZPLAT_REQUEST_TIMEOUT_SECS` | no       | `30`                           | Per-request timeout         |
//! | `WIZPLAT_USERNAME`             | no       | --                             | Log in as this user         |
//! | `WIZPLAT_PASSWORD`             | no       | --                             | Password for `WIZPLAT_USERNAME` |

mod answers;
mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;
use wizplat_client::{ApiClient, ApiError, AuthSession, ClientConfig};
use wizplat_player::{PlayerError, SaveError};

#[derive(Parser)]
#[command(name = "wizplat", version, about = "Wizard platform command-line client")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List available wizards.
    Wizards,
    /// List your runs.
    Runs {
        #[arg(long)]
        stored: bool,
        #[arg(long)]
        favorites: bool,
    },
    /// Show run statistics.
    Stats,
    /// Start a new run and answer it from a file.
    Play {
        wizard_id: Uuid,
        #[arg(long)]
        answers: PathBuf,
        /// Store the completed run under this name.
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Reopen a run, apply answers and save it.
    Resume {
        run_id: Uuid,
        #[arg(long)]
        answers: PathBuf,
        #[arg(long, value_name = "NAME")]
        save_as_new: Option<String>,
    },
    DeleteRun {
        run_id: Uuid,
    },
    /// List wizard templates.
    Templates,
    /// Show the navigation offered to the logged-in user.
    Nav,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wizplat_cli=info,wizplat_player=info,wizplat_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        tracing::debug!(error = ?err, "Command failed");
        eprintln!("error: {}", user_message(&err));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = ClientConfig::from_env();
    let client = ApiClient::new(&config, AuthSession::new())?;

    if let (Ok(username), Ok(password)) = (
        std::env::var("WIZPLAT_USERNAME"),
        std::env::var("WIZPLAT_PASSWORD"),
    ) {
        client.login(&username, &password).await?;
    } else {
        tracing::debug!(api_url = %client.api_url(), "No credentials set, continuing anonymously");
    }

    match cli.command {
        Command::Wizards => commands::list_wizards(&client).await,
        Command::Runs { stored, favorites } => commands::list_runs(&client, stored, favorites).await,
        Command::Stats => commands::show_stats(&client).await,
        Command::Play {
            wizard_id,
            answers,
            name,
            description,
        } => {
            commands::play(
                &client,
                wizard_id,
                &answers,
                name.as_deref(),
                description.as_deref(),
            )
            .await
        }
        Command::Resume {
            run_id,
            answers,
            save_as_new,
        } => commands::resume(&client, run_id, &answers, save_as_new.as_deref()).await,
        Command::DeleteRun { run_id } => commands::delete_run(&client, run_id).await,
        Command::Templates => commands::list_templates(&client).await,
        Command::Nav => commands::show_navigation(&client).await,
    }
}

/// Prefer the friendly message of a known error type.
fn user_message(err: &anyhow::Error) -> String {
    if let Some(e) = err.downcast_ref::<SaveError>() {
        return e.user_message();
    }
    if let Some(PlayerError::Api(e)) = err.downcast_ref::<PlayerError>() {
        return e.user_message();
    }
    if let Some(e) = err.downcast_ref::<ApiError>() {
        return e.user_message();
    }
    format!("{err:#}")
}
