use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use adlens::cli::{commands, Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Scrape {
            query,
            output,
            no_headless,
            max_scrolls,
        } => {
            let query = query.resolve()?;
            commands::scrape(query, &output, !no_headless, max_scrolls).await?;
        }
        Commands::Api {
            query,
            token,
            output,
            limit,
        } => {
            let query = query.resolve()?;
            commands::api(query, token, limit, &output).await?;
        }
        Commands::Analyze { input, export } => {
            commands::analyze(&input, export.as_deref())?;
        }
    }

    Ok(())
}
