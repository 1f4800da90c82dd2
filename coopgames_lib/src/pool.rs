//! Concurrent detail acquisition over a shared queue.
//!
//! N workers pop candidates from one [`WorkQueue`] and send their outcomes
//! over an mpsc channel to the orchestrating task, which alone owns the
//! result set and the counters. A transport failure in any worker aborts
//! the others and fails the run.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::detail::{DetailFetcher, DetailOutcome, DetailSource};
use crate::error::PipelineError;
use crate::queue::WorkQueue;
use crate::record::{CandidateItem, ItemRecord};

/// Accepted records of one acquisition pass, in arrival order.
pub type ResultSet = Vec<ItemRecord>;

/// Progress is logged every this many processed candidates.
pub const PROGRESS_INTERVAL: usize = 50;

/// Counters of one pool run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PoolSummary {
    pub processed: usize,
    pub accepted: usize,
    pub skipped: usize,
    pub below_threshold: usize,
}

pub struct WorkerPool<S> {
    fetcher: Arc<DetailFetcher<S>>,
    concurrency: usize,
}

impl<S: DetailSource> WorkerPool<S> {
    pub fn new(fetcher: DetailFetcher<S>, concurrency: usize) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            concurrency: concurrency.max(1),
        }
    }

    /// Drains `candidates` with the configured number of workers.
    pub async fn run(
        &self,
        candidates: Vec<CandidateItem>,
    ) -> Result<(ResultSet, PoolSummary), PipelineError> {
        let queue = Arc::new(WorkQueue::new(candidates));
        tracing::info!(
            "Fetching details for {} candidates with {} workers",
            queue.len(),
            self.concurrency
        );

        let (tx, mut rx) =
            mpsc::channel::<Result<DetailOutcome, PipelineError>>(self.concurrency * 2);
        let mut join_set = JoinSet::new();

        for worker in 0..self.concurrency {
            let queue = Arc::clone(&queue);
            let fetcher = Arc::clone(&self.fetcher);
            let sender = tx.clone();
            join_set.spawn(async move {
                while let Some(candidate) = queue.pop() {
                    let outcome = fetcher.fetch_detail(&candidate).await;
                    let fatal = outcome.is_err();
                    if sender.send(outcome).await.is_err() || fatal {
                        break;
                    }
                }
                tracing::debug!("Worker {} done", worker);
            });
        }
        drop(tx);

        let mut records = ResultSet::new();
        let mut summary = PoolSummary::default();

        while let Some(outcome) = rx.recv().await {
            summary.processed += 1;
            if summary.processed % PROGRESS_INTERVAL == 0 {
                tracing::info!("Processed {} games...", summary.processed);
            }
            match outcome {
                Ok(DetailOutcome::Accepted(record)) => {
                    summary.accepted += 1;
                    records.push(record);
                }
                Ok(DetailOutcome::Skipped(_)) => summary.skipped += 1,
                Ok(DetailOutcome::BelowThreshold { .. }) => summary.below_threshold += 1,
                Err(err) => {
                    tracing::error!("Aborting acquisition: {}", err);
                    join_set.abort_all();
                    return Err(err);
                }
            }
        }

        while let Some(joined) = join_set.join_next().await {
            joined.map_err(|e| PipelineError::Worker(e.to_string()))?;
        }

        tracing::info!(
            "Acquisition done: {} processed, {} accepted, {} skipped, {} below player threshold",
            summary.processed,
            summary.accepted,
            summary.skipped,
            summary.below_threshold
        );
        Ok((records, summary))
    }
}
