use std::io;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use queryform::config::DEFAULT_API_HOST;
use queryform::session;
use queryform::{
    ConfigError, FailurePolicy, FormConfig, FormController, HttpTransport, Policies, SessionError, SettlePolicy,
    TransportError,
};
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("HTTP client setup failed: {0}")]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

#[derive(Parser, Debug)]
#[command(name = "queryform", about = "Ask natural-language questions against a /process_form backend")]
struct Cli {
    /// Backend base URL; `/process_form` is appended.
    #[arg(long, env = "QUERYFORM_API_HOST", default_value = DEFAULT_API_HOST)]
    api_host: String,

    /// `latest-issued` drops stale answers, `last-resolved` lets the slowest call win.
    #[arg(long, env = "QUERYFORM_SETTLE_POLICY", default_value = "latest-issued")]
    settle_policy: SettlePolicy,

    /// `keep-pending` leaves the pending marker on failure, `show-error` prints the error.
    #[arg(long, env = "QUERYFORM_FAILURE_POLICY", default_value = "keep-pending")]
    failure_policy: FailurePolicy,

    /// Give up on a request after this many seconds. Unset waits forever.
    #[arg(long, env = "QUERYFORM_REQUEST_TIMEOUT_SECS")]
    request_timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit one question, print each state of the response area, and exit.
    Ask { question: String },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = FormConfig::new(cli.api_host)?
        .with_policies(Policies { settle: cli.settle_policy, failure: cli.failure_policy })
        .with_request_timeout(cli.request_timeout_secs.map(Duration::from_secs));

    let transport = Arc::new(HttpTransport::new(config.request_timeout)?);
    let controller = FormController::new(transport, &config);
    tracing::info!(api_host = %config.api_host, policies = ?config.policies, "query form ready");

    match cli.command {
        Some(Command::Ask { question }) => {
            session::ask(&controller, question, io::stdout()).await?;
        }
        None => {
            session::interactive(&controller, BufReader::new(tokio::io::stdin()), io::stdout()).await?;
        }
    }
    Ok(())
}
