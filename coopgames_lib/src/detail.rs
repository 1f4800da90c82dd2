//! Per-item detail retrieval and classification.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use crate::error::PipelineError;
use crate::extract::DetailExtractor;
use crate::record::{CandidateItem, ItemRecord};
use crate::retry::{with_retry, RetryConfig};

/// Where detail pages come from. Implemented by the BoardGameGeek client;
/// tests substitute their own.
pub trait DetailSource: Send + Sync + 'static {
    /// Fetches the raw markup of the candidate's detail page.
    fn fetch_markup(
        &self,
        candidate: &CandidateItem,
    ) -> impl Future<Output = Result<String, bgg_api::Error>> + Send;

    /// Absolute link to a site-relative `href`, for diagnostics.
    fn full_link(&self, href: &str) -> String;
}

impl DetailSource for bgg_api::Client {
    fn fetch_markup(
        &self,
        candidate: &CandidateItem,
    ) -> impl Future<Output = Result<String, bgg_api::Error>> + Send {
        self.get_item_page(&candidate.id)
    }

    fn full_link(&self, href: &str) -> String {
        bgg_api::Client::full_link(self, href)
    }
}

/// Why an item was left out of the result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// A field failed its type expectation, e.g. a non-numeric player count.
    InvalidField,
    /// The page had no embedded item data.
    MissingPayload,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::InvalidField => write!(f, "invalid-field"),
            SkipReason::MissingPayload => write!(f, "missing-payload"),
        }
    }
}

/// An item that could not be used, with enough context to look it up.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedItem {
    pub name: String,
    pub link: String,
    pub reason: SkipReason,
}

/// Result of processing one candidate.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailOutcome {
    /// The record passed the structural check and the player-count bound.
    Accepted(ItemRecord),
    /// The record was unusable. A diagnostic has been emitted.
    Skipped(SkippedItem),
    /// The game supports fewer players than required. Expected, not reported.
    BelowThreshold { max_players: f64 },
}

/// Fetches, extracts and classifies one candidate at a time.
pub struct DetailFetcher<S> {
    source: Arc<S>,
    extractor: DetailExtractor,
    min_players: u32,
    retry: RetryConfig,
}

impl<S: DetailSource> DetailFetcher<S> {
    pub fn new(source: Arc<S>, min_players: u32) -> Self {
        Self {
            source,
            extractor: DetailExtractor::new(),
            min_players,
            retry: RetryConfig::from_env(),
        }
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Processes one candidate.
    ///
    /// Only transport failures are returned as errors; they are fatal for the
    /// run. Every item-level problem becomes a [`DetailOutcome`].
    pub async fn fetch_detail(
        &self,
        candidate: &CandidateItem,
    ) -> Result<DetailOutcome, PipelineError> {
        let label = format!("detail {}", candidate.id);
        let markup = with_retry(&self.retry, &label, || {
            self.source.fetch_markup(candidate)
        })
        .await?;

        let record = match self.extractor.extract(&markup) {
            Ok(record) => record,
            Err(err) => {
                let skipped = self.skip(candidate, SkipReason::MissingPayload);
                tracing::warn!(
                    "!No item data for \"{}\" ({}): {}",
                    skipped.name,
                    skipped.link,
                    err
                );
                return Ok(DetailOutcome::Skipped(skipped));
            }
        };

        let max_players = match record.max_player_count() {
            Ok(count) => count,
            Err(_) => {
                let skipped = self.skip(candidate, SkipReason::InvalidField);
                tracing::warn!(
                    "!Max players for \"{}\" ({}) was not a number!",
                    skipped.name,
                    skipped.link
                );
                return Ok(DetailOutcome::Skipped(skipped));
            }
        };

        if max_players < f64::from(self.min_players) {
            return Ok(DetailOutcome::BelowThreshold { max_players });
        }

        tracing::info!(
            "\tFound {} player game: {} ({})",
            max_players,
            candidate.name,
            candidate.year_published.as_deref().unwrap_or("?")
        );
        Ok(DetailOutcome::Accepted(record))
    }

    fn skip(&self, candidate: &CandidateItem, reason: SkipReason) -> SkippedItem {
        SkippedItem {
            name: candidate.name.clone(),
            link: self.source.full_link(&candidate.href),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io;
    use std::sync::Mutex;

    /// Serves canned markup keyed by candidate id.
    struct CannedPages(HashMap<String, String>);

    impl DetailSource for CannedPages {
        async fn fetch_markup(&self, candidate: &CandidateItem) -> Result<String, bgg_api::Error> {
            self.0
                .get(&candidate.id)
                .cloned()
                .ok_or(bgg_api::Error::HttpStatus {
                    status: 404,
                    body: String::new(),
                })
        }

        fn full_link(&self, href: &str) -> String {
            format!("https://bgg.test{}", href)
        }
    }

    fn page(max_players: &str) -> String {
        format!(
            "GEEK.geekitemPreload = {{\"item\":{{\"name\":\"Game\",\"maxplayers\":{}}}}};",
            max_players
        )
    }

    fn candidate(id: &str) -> CandidateItem {
        CandidateItem {
            id: id.into(),
            name: format!("Game {}", id),
            href: format!("/boardgame/{}", id),
            year_published: Some("2022".into()),
        }
    }

    fn fetcher(pages: &[(&str, String)], min_players: u32) -> DetailFetcher<CannedPages> {
        let pages = pages
            .iter()
            .map(|(id, markup)| (id.to_string(), markup.clone()))
            .collect();
        DetailFetcher::new(Arc::new(CannedPages(pages)), min_players)
            .with_retry(RetryConfig::disabled())
    }

    #[tokio::test]
    async fn accepts_games_with_enough_players() {
        let f = fetcher(&[("1", page("\"8\""))], 6);
        let outcome = f.fetch_detail(&candidate("1")).await.unwrap();
        match outcome {
            DetailOutcome::Accepted(record) => assert_eq!(record.max_players.as_deref(), Some("8")),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_numeric_players_are_skipped() {
        let f = fetcher(&[("1", page("\"abc\""))], 6);
        let outcome = f.fetch_detail(&candidate("1")).await.unwrap();
        assert_eq!(
            outcome,
            DetailOutcome::Skipped(SkippedItem {
                name: "Game 1".into(),
                link: "https://bgg.test/boardgame/1".into(),
                reason: SkipReason::InvalidField,
            })
        );
    }

    #[tokio::test]
    async fn small_games_are_below_threshold() {
        let f = fetcher(&[("1", page("4"))], 6);
        let outcome = f.fetch_detail(&candidate("1")).await.unwrap();
        assert_eq!(outcome, DetailOutcome::BelowThreshold { max_players: 4.0 });
    }

    #[tokio::test]
    async fn decimal_player_counts_are_numbers() {
        let f = fetcher(&[("1", page("\"6.5\""))], 6);
        let outcome = f.fetch_detail(&candidate("1")).await.unwrap();
        assert!(matches!(outcome, DetailOutcome::Accepted(_)));
    }

    /// Collects formatted log output in memory.
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl LogBuffer {
        fn warnings(&self) -> Vec<String> {
            String::from_utf8(self.0.lock().unwrap().clone())
                .unwrap()
                .lines()
                .filter(|line| line.contains("WARN"))
                .map(String::from)
                .collect()
        }
    }

    /// Routes warnings on this thread into a buffer until the guard drops.
    fn capture_warnings() -> (LogBuffer, tracing::subscriber::DefaultGuard) {
        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();
        (logs, tracing::subscriber::set_default(subscriber))
    }

    #[tokio::test]
    async fn invalid_field_emits_one_warning_with_name_and_link() {
        let (logs, _guard) = capture_warnings();
        let f = fetcher(&[("7", page("\"abc\""))], 6);
        f.fetch_detail(&candidate("7")).await.unwrap();

        let warnings = logs.warnings();
        assert_eq!(warnings.len(), 1, "{warnings:?}");
        assert!(warnings[0].contains("Game 7"));
        assert!(warnings[0].contains("https://bgg.test/boardgame/7"));
    }

    #[tokio::test]
    async fn below_threshold_is_silent() {
        let (logs, _guard) = capture_warnings();
        let f = fetcher(&[("1", page("4"))], 6);
        let outcome = f.fetch_detail(&candidate("1")).await.unwrap();

        assert!(matches!(outcome, DetailOutcome::BelowThreshold { .. }));
        assert!(logs.warnings().is_empty());
    }

    #[tokio::test]
    async fn pages_without_data_are_skipped() {
        let f = fetcher(&[("1", "<html>gone</html>".to_string())], 6);
        let outcome = f.fetch_detail(&candidate("1")).await.unwrap();
        match outcome {
            DetailOutcome::Skipped(skipped) => {
                assert_eq!(skipped.reason, SkipReason::MissingPayload);
                assert_eq!(skipped.reason.to_string(), "missing-payload");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn transport_failures_propagate() {
        let f = fetcher(&[], 6);
        let err = f.fetch_detail(&candidate("missing")).await.unwrap_err();
        assert!(matches!(err, PipelineError::Transport(_)));
        assert!(err.is_fatal());
    }
}
