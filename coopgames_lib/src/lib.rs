//! Core of the cooperative game curator: listing retrieval, concurrent detail
//! acquisition, checkpointing, and the final filter and ordering stage.
//!
//! The remote side lives in the `bgg_api` crate; this crate turns its raw
//! listings and pages into typed [`ItemRecord`]s and decides which of them
//! make the cut.

pub mod checkpoint;
pub mod criteria;
pub mod curate;
pub mod detail;
pub mod error;
pub mod extract;
pub mod listing;
pub mod natural;
pub mod pipeline;
pub mod pool;
pub mod queue;
pub mod record;
pub mod retry;

pub use bgg_api;

pub use checkpoint::Checkpoint;
pub use criteria::{FilterCriteria, RunSettings};
pub use curate::Curator;
pub use detail::{DetailFetcher, DetailOutcome, DetailSource, SkipReason, SkippedItem};
pub use error::{ParseError, PipelineError};
pub use extract::DetailExtractor;
pub use listing::ListingClient;
pub use pipeline::Pipeline;
pub use pool::{PoolSummary, ResultSet, WorkerPool};
pub use queue::WorkQueue;
pub use record::{CandidateItem, ItemRecord, RankEntry};
