use clap::Parser;
use std::process;
use tpk_backend::cli::{commands, Cli};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!("tpk-backend v{}", tpk_backend::VERSION);

    if let Err(e) = commands::handle_command(cli).await {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}
