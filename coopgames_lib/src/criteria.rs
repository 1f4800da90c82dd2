//! Filter criteria and run settings, with validation.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

pub const MAX_COMPLEXITY: f64 = 5.0;
pub const MAX_RATING: f64 = 10.0;

/// Thresholds a game must meet to be listed.
///
/// Built once at startup and never mutated. `min_players` is enforced while
/// acquiring; the others by the [`Curator`](crate::Curator).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterCriteria {
    /// Minimum community weight (1.0 light to 5.0 heavy).
    pub min_complexity: f64,
    /// Minimum recommended player age, in years.
    pub min_age: u32,
    /// Minimum average rating. `None` disables the check.
    pub min_rating: Option<f64>,
    /// The game must support at least this many players.
    pub min_players: u32,
    /// Only games released within this many years are considered.
    pub max_age_years: u32,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            min_complexity: 2.25,
            min_age: 12,
            min_rating: None,
            min_players: 6,
            max_age_years: 8,
        }
    }
}

impl FilterCriteria {
    /// Parses criteria from TOML. Keys left out keep their default value.
    pub fn from_toml_str(content: &str) -> Result<Self, PipelineError> {
        let criteria: FilterCriteria = toml::from_str(content)
            .map_err(|e| PipelineError::InvalidInput(format!("criteria file: {}", e)))?;
        criteria.validate()
    }

    /// Reads and parses a TOML criteria file.
    pub fn from_file(path: &Path) -> Result<Self, PipelineError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            PipelineError::InvalidInput(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Checks every threshold is within its meaningful range.
    pub fn validate(self) -> Result<Self, PipelineError> {
        if !(0.0..=MAX_COMPLEXITY).contains(&self.min_complexity) {
            return Err(PipelineError::InvalidInput(format!(
                "min_complexity must be between 0 and {}, got {}",
                MAX_COMPLEXITY, self.min_complexity
            )));
        }
        if let Some(rating) = self.min_rating {
            if !(0.0..=MAX_RATING).contains(&rating) {
                return Err(PipelineError::InvalidInput(format!(
                    "min_rating must be between 0 and {}, got {}",
                    MAX_RATING, rating
                )));
            }
        }
        if self.max_age_years == 0 {
            return Err(PipelineError::InvalidInput(
                "max_age_years must be at least 1".into(),
            ));
        }
        Ok(self)
    }
}

/// Knobs of the acquisition phase.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    /// How many listing entries to request in total.
    pub target_count: usize,
    /// Listing page size. The endpoint caps this at 50.
    pub page_size: u32,
    /// Number of concurrent detail workers.
    pub concurrency: usize,
    /// Location of the checkpoint file.
    pub checkpoint_path: PathBuf,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            target_count: 1000,
            page_size: bgg_api::QueryCommon::DEFAULT_PAGE_SIZE,
            concurrency: 8,
            checkpoint_path: PathBuf::from("out/dump-games.json"),
        }
    }
}

impl RunSettings {
    pub fn validate(self) -> Result<Self, PipelineError> {
        if self.target_count == 0 {
            return Err(PipelineError::InvalidInput(
                "target count must be at least 1".into(),
            ));
        }
        if self.page_size == 0 || self.page_size > bgg_api::QueryCommon::DEFAULT_PAGE_SIZE {
            return Err(PipelineError::InvalidInput(format!(
                "page size must be between 1 and {}",
                bgg_api::QueryCommon::DEFAULT_PAGE_SIZE
            )));
        }
        if self.concurrency == 0 {
            return Err(PipelineError::InvalidInput(
                "concurrency must be at least 1".into(),
            ));
        }
        Ok(self)
    }
}
