//! The `build` subcommand: acquires (or loads) the raw records, curates them
//! and writes the JSON and HTML artifacts.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use coopgames_lib::bgg_api::LinkedItemsQuery;
use coopgames_lib::checkpoint::{to_tab_indented_json, write_atomic};
use coopgames_lib::{ItemRecord, Pipeline, RunSettings};

use crate::config::{build_client, parse_sort, CriteriaArgs};
use crate::render::{Renderer, CONTENT_PLACEHOLDER, DEFAULT_TEMPLATE};

/// Arguments for the `build` subcommand.
#[derive(Args)]
pub struct BuildArgs {
    #[command(flatten)]
    pub criteria: CriteriaArgs,

    /// Number of listing entries to request
    #[arg(long, default_value = "1000")]
    pub count: usize,

    /// Listing page size (at most 50)
    #[arg(long, default_value = "50")]
    pub page_size: u32,

    /// Number of concurrent detail workers
    #[arg(long, default_value = "8")]
    pub concurrency: usize,

    /// BoardGameGeek mechanic whose games are listed (2023 is "Cooperative Game")
    #[arg(long, default_value = "2023")]
    pub mechanic: u64,

    /// Server-side listing order deciding which games make the count: rank, name, year
    #[arg(long, default_value = "rank")]
    pub sort: String,

    /// Where to write the curated JSON list
    #[arg(long, default_value = "out/games.json")]
    pub json_out: PathBuf,

    /// Where to write the rendered HTML page
    #[arg(long, default_value = "dist/index.html")]
    pub html_out: PathBuf,

    /// HTML template containing a $CONTENT$ placeholder
    #[arg(long, default_value = "template.html")]
    pub template: PathBuf,
}

impl BuildArgs {
    fn listing_query(&self) -> Result<LinkedItemsQuery> {
        Ok(LinkedItemsQuery::default()
            .with_object_id(self.mechanic)
            .with_sort(parse_sort(&self.sort)?))
    }
}

pub async fn run(args: &BuildArgs) -> Result<()> {
    let criteria = args.criteria.resolve()?;
    let settings = RunSettings {
        target_count: args.count,
        page_size: args.page_size,
        concurrency: args.concurrency,
        checkpoint_path: args.criteria.checkpoint.clone(),
    }
    .validate()?;
    let query = args.listing_query()?;
    let template = load_template(&args.template)?;
    let renderer = Renderer::new()?;

    let client = build_client()?;
    let pipeline = Pipeline::new(client.clone(), settings, criteria).with_query(query);

    let records = pipeline.acquire_or_load().await?;
    let curated = pipeline.curator().curate(records);

    let html = renderer.render_document(&template, &curated, |href| client.full_link(href))?;
    write_artifacts(args, &curated, &html)?;

    tracing::info!(
        "Wrote {} games to {} and {}",
        curated.len(),
        args.json_out.display(),
        args.html_out.display()
    );
    tracing::info!("Done!");
    Ok(())
}

/// Both documents are fully built before either file is touched.
fn write_artifacts(args: &BuildArgs, curated: &[ItemRecord], html: &str) -> Result<()> {
    let json = to_tab_indented_json(curated)?;
    write_atomic(&args.json_out, &json)
        .with_context(|| format!("failed to write {}", args.json_out.display()))?;
    write_atomic(&args.html_out, html.as_bytes())
        .with_context(|| format!("failed to write {}", args.html_out.display()))?;
    Ok(())
}

/// Reads the template, falling back to the built-in one when the file does
/// not exist. A template without the placeholder is rejected up front.
fn load_template(path: &Path) -> Result<String> {
    let template = match std::fs::read_to_string(path) {
        Ok(template) => template,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!(
                "No template at {}, using the built-in one",
                path.display()
            );
            DEFAULT_TEMPLATE.to_string()
        }
        Err(e) => {
            return Err(e).with_context(|| format!("failed to read template {}", path.display()));
        }
    };
    if !template.contains(CONTENT_PLACEHOLDER) {
        bail!(
            "template {} has no {} placeholder",
            path.display(),
            CONTENT_PLACEHOLDER
        );
    }
    Ok(template)
}
