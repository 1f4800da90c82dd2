use anyhow::{anyhow, bail, Result};
use serde::Serialize;
use coopgames_lib::ItemRecord;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Clone, Debug, PartialEq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            other => bail!("unknown output format '{}': use table, json, csv or markdown", other),
        }
    }
}

#[derive(Tabled, Serialize)]
struct GameRow {
    #[tabled(rename = "Rank")]
    #[serde(rename = "Rank")]
    rank: String,
    #[tabled(rename = "Name")]
    #[serde(rename = "Name")]
    name: String,
    #[tabled(rename = "Year")]
    #[serde(rename = "Year")]
    year: String,
    #[tabled(rename = "Players")]
    #[serde(rename = "Players")]
    players: String,
    #[tabled(rename = "Playtime")]
    #[serde(rename = "Playtime")]
    playtime: String,
    #[tabled(rename = "Age")]
    #[serde(rename = "Age")]
    age: String,
    #[tabled(rename = "Complexity")]
    #[serde(rename = "Complexity")]
    complexity: String,
    #[tabled(rename = "Rating")]
    #[serde(rename = "Rating")]
    rating: String,
}

// -- Row builders --

fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}

/// `"1-4"`, or a single value when both ends agree.
pub fn format_range(min: Option<&str>, max: Option<&str>) -> String {
    match (min, max) {
        (Some(a), Some(b)) if a == b => a.to_string(),
        (min, max) => format!("{}-{}", min.unwrap_or("?"), max.unwrap_or("?")),
    }
}

pub fn format_score(score: Option<f64>) -> String {
    score.map_or_else(|| "-".to_string(), |s| format!("{:.2}", s))
}

fn build_game_rows(games: &[ItemRecord]) -> Vec<GameRow> {
    games
        .iter()
        .map(|g| GameRow {
            rank: or_dash(g.primary_rank()),
            name: g.display_name().to_string(),
            year: or_dash(g.year_published.as_deref()),
            players: format_range(g.min_players.as_deref(), g.max_players.as_deref()),
            playtime: format_range(g.min_playtime.as_deref(), g.max_playtime.as_deref()),
            age: g
                .min_age
                .as_deref()
                .map_or_else(|| "-".to_string(), |a| format!("{}+", a)),
            complexity: format_score(g.complexity),
            rating: format_score(g.rating),
        })
        .collect()
}

// -- Printers --

pub fn print_games_table(games: &[ItemRecord]) {
    let mut table = Table::new(build_game_rows(games));
    table.with(Style::rounded());
    println!("{}", table);
}

pub fn print_games_markdown(games: &[ItemRecord]) {
    let mut table = Table::new(build_game_rows(games));
    table.with(Style::markdown());
    println!("{}", table);
}

pub fn print_games_csv(games: &[ItemRecord]) -> Result<()> {
    print!("{}", games_csv(games)?);
    Ok(())
}

fn games_csv(games: &[ItemRecord]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    for row in build_game_rows(games) {
        wtr.serialize(row)?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| anyhow!("failed to flush CSV: {}", e.error()))?;
    Ok(String::from_utf8(bytes)?)
}

pub fn print_json<T: Serialize + ?Sized>(data: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}
