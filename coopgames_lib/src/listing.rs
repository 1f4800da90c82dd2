//! Paged retrieval of the candidate list and the release-date window.

use std::sync::Arc;

use chrono::{DateTime, Months, Utc};
use tokio::task::JoinSet;

use bgg_api::{Client, LinkedItemsQuery, Query};

use crate::error::PipelineError;
use crate::record::CandidateItem;
use crate::retry::{with_retry, RetryConfig};

/// Pages through the linked-items listing.
pub struct ListingClient {
    client: Arc<Client>,
    query: LinkedItemsQuery,
    retry: RetryConfig,
}

impl ListingClient {
    /// Lists cooperative games by rank.
    pub fn new(client: Arc<Client>) -> Self {
        Self {
            client,
            query: LinkedItemsQuery::default(),
            retry: RetryConfig::from_env(),
        }
    }

    /// Replaces the base query. Its page fields are overwritten per request.
    pub fn with_query(mut self, query: LinkedItemsQuery) -> Self {
        self.query = query;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Requests `ceil(target_count / page_size)` pages at once and returns
    /// their items with pages in ascending order, each page in server order.
    ///
    /// Any page failing fails the whole listing.
    pub async fn fetch_candidates(
        &self,
        target_count: usize,
        page_size: u32,
    ) -> Result<Vec<CandidateItem>, PipelineError> {
        if page_size == 0 {
            return Err(PipelineError::InvalidInput(
                "page size must be at least 1".into(),
            ));
        }
        let pages = target_count.div_ceil(page_size as usize);
        tracing::info!("Requesting {} listing pages of {} items", pages, page_size);

        let mut join_set = JoinSet::new();
        for index in 0..pages {
            let client = Arc::clone(&self.client);
            let query = self
                .query
                .clone()
                .with_page(index as u32 + 1)
                .with_page_size(page_size);
            let retry = self.retry;
            join_set.spawn(async move {
                let label = format!("listing page {}", index + 1);
                let resp = with_retry(&retry, &label, || client.get_linked_items(&query)).await;
                (index, resp)
            });
        }

        let mut slots: Vec<Option<Vec<CandidateItem>>> = vec![None; pages];
        while let Some(joined) = join_set.join_next().await {
            let (index, resp) = joined.map_err(|e| PipelineError::Worker(e.to_string()))?;
            match resp {
                Ok(page) => {
                    slots[index] = Some(page.items.into_iter().map(CandidateItem::from).collect());
                }
                Err(err) => {
                    tracing::error!("Listing page {} failed: {}", index + 1, err);
                    join_set.abort_all();
                    return Err(err.into());
                }
            }
        }

        let candidates: Vec<CandidateItem> = slots.into_iter().flatten().flatten().collect();
        tracing::info!("Listing returned {} candidates", candidates.len());
        Ok(candidates)
    }
}

/// Keeps candidates released no earlier than `max_age_years` before `now`.
/// Candidates without a usable year are dropped.
pub fn retain_recent(
    candidates: Vec<CandidateItem>,
    max_age_years: u32,
    now: DateTime<Utc>,
) -> Vec<CandidateItem> {
    let cutoff = now
        .checked_sub_months(Months::new(max_age_years.saturating_mul(12)))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);
    let before = candidates.len();
    let kept: Vec<CandidateItem> = candidates
        .into_iter()
        .filter(|candidate| match candidate.release_date() {
            Some(released) => released >= cutoff,
            None => {
                tracing::debug!(
                    "Dropping {} ({}): unusable release year {:?}",
                    candidate.name,
                    candidate.id,
                    candidate.year_published
                );
                false
            }
        })
        .collect();
    tracing::info!(
        "{} of {} candidates released since {}",
        kept.len(),
        before,
        cutoff.format("%Y-%m-%d")
    );
    kept
}
