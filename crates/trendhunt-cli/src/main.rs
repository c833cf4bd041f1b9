mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "trendhunt-cli")]
#[command(about = "Trend signal collection and discovery")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Score tracked terms once and print the records as JSON
    Collect {
        /// Only score this tracked term (case-insensitive)
        #[arg(long)]
        term: Option<String>,
    },
    /// Run one discovery pass and print the report
    Discover {
        /// Report what would be queued without writing
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = trendhunt_core::load_app_config()?;
    // Logs go to stderr so stdout stays valid JSON.
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Collect { term } => commands::run_collect(&config, term.as_deref()).await,
        Commands::Discover { dry_run } => commands::run_discover(&config, dry_run).await,
    }
}

#[cfg(test)]
mod tests;
