//! Command-line client for checking, polling and sampling fixture routes.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use reqwest::StatusCode;

use routing_fixtures::client::FixtureClient;
use routing_fixtures::resilience::backoff::Backoff;
use routing_fixtures::suite::SuiteConfig;

#[derive(Parser)]
#[command(name = "fixture-cli")]
#[command(about = "Drive routing fixtures the way the acceptance suite does", long_about = None)]
struct Cli {
    /// Per-request timeout in seconds.
    #[arg(short, long, default_value_t = 10)]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the status code a URL answers with
    Status { url: String },
    /// Poll a URL until it answers with the expected status
    Wait {
        url: String,
        #[arg(long, default_value_t = 200)]
        status: u16,
        /// Give up after this many seconds.
        #[arg(long, default_value_t = 240)]
        patience: u64,
    },
    /// Hit a URL repeatedly and print the response distribution as JSON
    Sample {
        url: String,
        #[arg(short = 'n', long, default_value_t = 100)]
        count: usize,
        #[arg(short, long, default_value_t = 10)]
        concurrency: usize,
        /// Tally by this JSON field of the body instead of the whole body.
        #[arg(long)]
        field: Option<String>,
    },
    /// Print the URL that relays through a proxy app to a backend's internal route
    ProxyUrl {
        /// Suite config JSON; defaults to $CONFIG.
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        proxy_app: String,
        #[arg(long)]
        backend_app: String,
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = FixtureClient::new(Duration::from_secs(cli.timeout))?;

    match cli.command {
        Commands::Status { url } => {
            println!("{}", client.status_of(&url).await?.as_u16());
        }
        Commands::Wait { url, status, patience } => {
            let expected = StatusCode::from_u16(status)?;
            let attempts = client
                .wait_until_status(&url, expected, Duration::from_secs(patience), Backoff::default())
                .await?;
            println!("{} answered {} after {} attempt(s)", url, expected, attempts);
        }
        Commands::Sample { url, count, concurrency, field } => {
            let distribution = client.sample(&url, count, concurrency, field.as_deref()).await;
            println!("{}", serde_json::to_string_pretty(&distribution)?);
        }
        Commands::ProxyUrl { config, proxy_app, backend_app, port } => {
            let suite = match config {
                Some(path) => SuiteConfig::load(&path)?,
                None => SuiteConfig::from_env()?,
            };
            let destination = suite.internal_route(&backend_app, port);
            println!("{}", suite.proxy_url(&proxy_app, &destination));
        }
    }

    Ok(())
}
