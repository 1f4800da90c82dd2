//! The `list` subcommand: prints the curated list from an existing checkpoint.

use anyhow::{bail, Result};
use clap::Args;
use coopgames_lib::{Checkpoint, Curator};

use crate::config::CriteriaArgs;
use crate::output::{
    print_games_csv, print_games_markdown, print_games_table, print_json, OutputFormat,
};

/// Arguments for the `list` subcommand. Never touches the network.
#[derive(Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub criteria: CriteriaArgs,

    /// Maximum number of games to print
    #[arg(long)]
    pub top: Option<usize>,
}

pub fn run(args: &ListArgs, format: &OutputFormat) -> Result<()> {
    let criteria = args.criteria.resolve()?;
    let checkpoint = Checkpoint::new(&args.criteria.checkpoint);
    let Some(records) = checkpoint.load()? else {
        bail!(
            "no checkpoint at {}; run `coopgames build` first",
            checkpoint.path().display()
        );
    };

    let mut games = Curator::new(criteria).curate(records);
    if let Some(top) = args.top {
        games.truncate(top);
    }
    eprintln!("{} games", games.len());

    match format {
        OutputFormat::Table => print_games_table(&games),
        OutputFormat::Json => print_json(&games)?,
        OutputFormat::Csv => print_games_csv(&games)?,
        OutputFormat::Markdown => print_games_markdown(&games),
    }
    Ok(())
}
