//! `cadet-console`: terminal front end for the school and cadet admin console.
//!
//! Logs go to stderr; command output goes to stdout.

mod commands;
mod render;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "cadet-console", version, about = "School and cadet records admin console")]
struct Cli {
    /// Config file, replacing the one in the platform config dir.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Backend root URL, overriding the config file.
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage schools.
    #[command(subcommand)]
    Schools(ResourceCommand),
    /// Manage cadets.
    #[command(subcommand)]
    Cadets(ResourceCommand),
    /// Manage the stored access token.
    #[command(subcommand)]
    Token(TokenCommand),
}

#[derive(Subcommand, Debug)]
enum ResourceCommand {
    /// List one page of records.
    List(ListArgs),
    /// Show one record.
    Show { id: String },
    /// Create a record from a JSON file.
    Create {
        #[arg(long)]
        file: PathBuf,
    },
    /// Replace a record with the contents of a JSON file.
    Update {
        id: String,
        #[arg(long)]
        file: PathBuf,
    },
    /// Delete a record after confirmation.
    Delete {
        id: String,
        /// Do not ask.
        #[arg(long, short)]
        yes: bool,
    },
    /// Show summary counters.
    Stats,
}

#[derive(Args, Debug)]
struct ListArgs {
    #[arg(long, default_value_t = 1)]
    page: u32,
    /// Case-insensitive text filter over the fetched page.
    #[arg(long)]
    search: Option<String>,
    /// Server-side filter, e.g. `--filter district=Kaski`. Repeatable.
    #[arg(long = "filter", value_parser = parse_filter)]
    filters: Vec<(String, String)>,
}

#[derive(Subcommand, Debug)]
enum TokenCommand {
    /// Store a bearer token for later requests.
    Set { token: String },
    /// Forget the stored token.
    Clear,
    /// Show the stored token, masked.
    Show,
}

fn parse_filter(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("expected key=value, got '{raw}'")),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time()
                .with_target(false),
        )
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();
    tracing::debug!(command = ?cli.command, "starting");

    match commands::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            render::print_failure(&e);
            ExitCode::FAILURE
        }
    }
}
