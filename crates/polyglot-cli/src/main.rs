//! Main entry point for the polyglot command line tool.

use anyhow::Result;
use clap::Parser;
use polyglot_cli::{App, Args};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!("Starting polyglot");

    let app = match App::from_args(&args).await {
        Ok(app) => app,
        Err(e) => {
            error!("Failed to initialize translations: {}", e);
            return Err(e.into());
        }
    };

    let output = app.run(&args.command).await?;
    println!("{output}");

    Ok(())
}
