//! Resolution of filter criteria and remote endpoints from flags, files and environment.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Args;
use coopgames_lib::bgg_api::{Client, LinkedItemsSort};
use coopgames_lib::FilterCriteria;

/// Threshold flags shared by every subcommand. Flags override the criteria
/// file, which overrides the built-in defaults.
#[derive(Args, Debug, Clone)]
pub struct CriteriaArgs {
    /// TOML file with filter thresholds (any subset of the flags below)
    #[arg(long)]
    pub criteria: Option<PathBuf>,

    /// Minimum complexity (community weight, 1.0-5.0)
    #[arg(long)]
    pub min_complexity: Option<f64>,

    /// Minimum recommended player age
    #[arg(long)]
    pub min_age: Option<u32>,

    /// Minimum average rating (1.0-10.0); unrated games still pass
    #[arg(long)]
    pub min_rating: Option<f64>,

    /// The game must support at least this many players
    #[arg(long)]
    pub min_players: Option<u32>,

    /// Only consider games released within this many years
    #[arg(long)]
    pub max_age_years: Option<u32>,

    /// Checkpoint file; delete it to force a fresh acquisition
    #[arg(long, default_value = "out/dump-games.json")]
    pub checkpoint: PathBuf,
}

impl CriteriaArgs {
    pub fn resolve(&self) -> Result<FilterCriteria> {
        let mut criteria = match &self.criteria {
            Some(path) => FilterCriteria::from_file(path)?,
            None => FilterCriteria::default(),
        };
        if let Some(v) = self.min_complexity {
            criteria.min_complexity = v;
        }
        if let Some(v) = self.min_age {
            criteria.min_age = v;
        }
        if let Some(v) = self.min_rating {
            criteria.min_rating = Some(v);
        }
        if let Some(v) = self.min_players {
            criteria.min_players = v;
        }
        if let Some(v) = self.max_age_years {
            criteria.max_age_years = v;
        }
        Ok(criteria.validate()?)
    }
}

/// Listing order requested from the server: `rank`, `name` or `year`.
pub fn parse_sort(s: &str) -> Result<LinkedItemsSort> {
    match s {
        "rank" => Ok(LinkedItemsSort::Rank),
        "name" => Ok(LinkedItemsSort::Name),
        "year" | "yearpublished" => Ok(LinkedItemsSort::YearPublished),
        other => bail!("unknown sort '{}': use rank, name or year", other),
    }
}

/// BoardGameGeek client, honoring `COOPGAMES_API_URL` and `COOPGAMES_SITE_URL`.
pub fn build_client() -> Result<Arc<Client>> {
    let api = std::env::var("COOPGAMES_API_URL").ok();
    let site = std::env::var("COOPGAMES_SITE_URL").ok();
    let client = match (api, site) {
        (None, None) => Client::new(),
        (api, site) => Client::with_base_urls(
            api.as_deref().unwrap_or("https://api.geekdo.com"),
            site.as_deref().unwrap_or("https://boardgamegeek.com"),
        ),
    }
    .context("failed to create BoardGameGeek client")?;
    Ok(Arc::new(client))
}
