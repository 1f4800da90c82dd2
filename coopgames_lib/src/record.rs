//! Candidate and detail records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use bgg_api::types::LinkedItem;

use crate::error::PipelineError;

/// A listing entry not yet enriched with its detail page.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateItem {
    pub id: String,
    pub name: String,
    /// Site-relative link to the detail page.
    pub href: String,
    pub year_published: Option<String>,
}

impl CandidateItem {
    /// Release timestamp: 1 January of the publication year, midnight UTC.
    /// `None` when the year is missing or not an integer.
    pub fn release_date(&self) -> Option<DateTime<Utc>> {
        let year: i32 = self.year_published.as_deref()?.trim().parse().ok()?;
        let date = NaiveDate::from_ymd_opt(year, 1, 1)?;
        Some(date.and_hms_opt(0, 0, 0)?.and_utc())
    }
}

impl From<LinkedItem> for CandidateItem {
    fn from(item: LinkedItem) -> Self {
        Self {
            id: item.objectid,
            name: item.name,
            href: item.href,
            year_published: item.yearpublished,
        }
    }
}

/// One entry of a game's rank descriptor, e.g. overall rank or thematic rank.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankEntry {
    /// Rank position as text. Unranked games carry `"Not Ranked"` here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prettyname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub veryshortprettyname: Option<String>,
    /// Bayesian average within this ranking.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baverage: Option<String>,
}

/// Structured data extracted from a detail page.
///
/// Every field is optional: a field missing from the page stays `None` and
/// is omitted when serialized. Counts and years are kept as the text the
/// page carried; use the accessor methods to read them as numbers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "yearpublished", default, skip_serializing_if = "Option::is_none")]
    pub year_published: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(rename = "minplayers", default, skip_serializing_if = "Option::is_none")]
    pub min_players: Option<String>,
    #[serde(rename = "maxplayers", default, skip_serializing_if = "Option::is_none")]
    pub max_players: Option<String>,
    #[serde(rename = "minplaytime", default, skip_serializing_if = "Option::is_none")]
    pub min_playtime: Option<String>,
    #[serde(rename = "maxplaytime", default, skip_serializing_if = "Option::is_none")]
    pub max_playtime: Option<String>,
    #[serde(rename = "minage", default, skip_serializing_if = "Option::is_none")]
    pub min_age: Option<String>,
    #[serde(rename = "rankinfo", default, skip_serializing_if = "Option::is_none")]
    pub rank_info: Option<Vec<RankEntry>>,
    /// Community weight, 1.0 (light) to 5.0 (heavy).
    #[serde(rename = "averageweight", default, skip_serializing_if = "Option::is_none")]
    pub complexity: Option<f64>,
    /// Average user rating, 1.0 to 10.0.
    #[serde(rename = "average", default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "imageurl", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl ItemRecord {
    /// Maximum player count. Missing or non-numeric text is an invalid field.
    /// Decimal text such as `"6.5"` counts as a number.
    pub fn max_player_count(&self) -> Result<f64, PipelineError> {
        let raw = self.max_players.as_deref();
        parse_number(raw).ok_or_else(|| PipelineError::InvalidField {
            field: "maxplayers",
            value: raw.unwrap_or_default().to_string(),
        })
    }

    pub fn min_age_years(&self) -> Option<f64> {
        parse_number(self.min_age.as_deref())
    }

    /// Rank position of the first rank entry, the game's primary rank.
    pub fn primary_rank(&self) -> Option<&str> {
        self.rank_info
            .as_ref()?
            .first()?
            .rank
            .as_deref()
    }

    /// Display name, falling back to an empty string.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }
}

/// Finite decimal numbers only; `"NaN"` and `"inf"` are rejected.
fn parse_number(raw: Option<&str>) -> Option<f64> {
    raw?.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}
