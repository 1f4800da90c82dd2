//! Error types for the acquisition pipeline.

/// Failures while turning a detail page into a record.
#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    /// No line carries the embedded item data. The page changed shape or the
    /// item was removed.
    #[error("embedded item data marker not found")]
    MissingMarker,
    /// The marker line was found but its payload is not valid JSON.
    #[error("embedded item data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The payload parsed but has no `item` object.
    #[error("embedded item data has no item object")]
    MissingItem,
}

/// Errors produced by the pipeline.
///
/// Only `Transport`, `Checkpoint`, `Serialization` and `Worker` ever reach the
/// caller of a full run; item-level problems are classified by the detail
/// fetcher and reported as skipped items instead.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    /// A listing or detail request failed after retries.
    #[error("transport error: {0}")]
    Transport(#[from] bgg_api::Error),
    /// An extracted field does not have the expected type.
    #[error("invalid field {field}: {value:?}")]
    InvalidField { field: &'static str, value: String },
    /// Reading or writing the checkpoint failed.
    #[error("checkpoint error at {path}: {source}")]
    Checkpoint {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// JSON serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// Configuration failed validation.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// A worker task panicked or was cancelled.
    #[error("worker failed: {0}")]
    Worker(String),
}

impl PipelineError {
    /// Whether this error should terminate the whole run.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, PipelineError::InvalidField { .. })
    }
}
