mod commands;
mod config;
mod output;
mod render;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "coopgames")]
#[command(about = "Curate recent, heavy, large-group cooperative board games from BoardGameGeek")]
struct Cli {
    /// Output format for listings: table, json, csv, markdown
    #[arg(long, default_value = "table", global = true)]
    output: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Acquire (or load from checkpoint), curate, and write the JSON and HTML artifacts
    Build(commands::build::BuildArgs),
    /// Print the curated list from an existing checkpoint without touching the network
    List(commands::list::ListArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("coopgames=info".parse()?),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let format = OutputFormat::parse(&cli.output)?;

    match &cli.command {
        Commands::Build(args) => commands::build::run(args).await?,
        Commands::List(args) => commands::list::run(args, &format)?,
    }

    Ok(())
}
