mod billy;
mod cli;
mod config;
mod error;
mod export;
mod models;
mod sheets;

use clap::Parser;

use crate::cli::Cli;
use tracing::{Level, error, info};
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Progress to stdout, warnings and errors to stderr
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr.with_max_level(Level::WARN).or_else(std::io::stdout))
        .init();

    let cli = Cli::parse();

    // A failed run is reported but not signalled through the exit code
    if let Err(e) = cli.run().await {
        error!("Error: {}", e);
    }

    info!("Done");
}
