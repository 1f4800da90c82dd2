//! Composition of the acquisition stages and the curator.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use bgg_api::{Client, LinkedItemsQuery};

use crate::checkpoint::Checkpoint;
use crate::criteria::{FilterCriteria, RunSettings};
use crate::curate::Curator;
use crate::detail::DetailFetcher;
use crate::error::PipelineError;
use crate::listing::{retain_recent, ListingClient};
use crate::pool::{ResultSet, WorkerPool};
use crate::record::ItemRecord;
use crate::retry::RetryConfig;

/// Listing, date window, worker pool and checkpoint, wired together.
pub struct Pipeline {
    client: Arc<Client>,
    settings: RunSettings,
    criteria: FilterCriteria,
    query: LinkedItemsQuery,
    retry: RetryConfig,
}

impl Pipeline {
    pub fn new(client: Arc<Client>, settings: RunSettings, criteria: FilterCriteria) -> Self {
        Self {
            client,
            settings,
            criteria,
            query: LinkedItemsQuery::default(),
            retry: RetryConfig::from_env(),
        }
    }

    /// Lists something other than cooperative games.
    pub fn with_query(mut self, query: LinkedItemsQuery) -> Self {
        self.query = query;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint::new(&self.settings.checkpoint_path)
    }

    pub fn curator(&self) -> Curator {
        Curator::new(self.criteria.clone())
    }

    /// Loads the checkpoint if there is one; otherwise runs a full
    /// acquisition pass and saves its result.
    pub async fn acquire_or_load(&self) -> Result<ResultSet, PipelineError> {
        self.acquire_or_load_at(Utc::now()).await
    }

    /// [`acquire_or_load`](Self::acquire_or_load) with an explicit clock for
    /// the release-date window.
    pub async fn acquire_or_load_at(&self, now: DateTime<Utc>) -> Result<ResultSet, PipelineError> {
        let checkpoint = self.checkpoint();
        if let Some(records) = checkpoint.load()? {
            return Ok(records);
        }
        let records = self.acquire(now).await?;
        checkpoint.save(&records)?;
        Ok(records)
    }

    /// One full acquisition pass, without touching the checkpoint.
    pub async fn acquire(&self, now: DateTime<Utc>) -> Result<ResultSet, PipelineError> {
        let listing = ListingClient::new(Arc::clone(&self.client))
            .with_query(self.query.clone())
            .with_retry(self.retry);
        let candidates = listing
            .fetch_candidates(self.settings.target_count, self.settings.page_size)
            .await?;
        let candidates = retain_recent(candidates, self.criteria.max_age_years, now);

        let fetcher = DetailFetcher::new(Arc::clone(&self.client), self.criteria.min_players)
            .with_retry(self.retry);
        let pool = WorkerPool::new(fetcher, self.settings.concurrency);
        let (records, _summary) = pool.run(candidates).await?;
        Ok(records)
    }

    /// Acquires or loads, then curates.
    pub async fn run(&self) -> Result<Vec<ItemRecord>, PipelineError> {
        let records = self.acquire_or_load().await?;
        Ok(self.curator().curate(records))
    }
}
