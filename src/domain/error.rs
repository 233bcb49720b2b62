//! Domain error types.

use crate::domain::watchlist::WatchlistError;

/// Message carried by [`SelectorError::Exhausted`].
pub const NO_CANDIDATE_SUCCEEDED: &str = "no backend candidate succeeded";

/// Returned by the snapshot builder when the series has no bars at all.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("insufficient data: series has {bars} bars")]
pub struct InsufficientData {
    pub bars: usize,
}

/// Failure of a single call against the text-generation backend.
#[derive(Debug, Clone, thiserror::Error)]
pub enum BackendError {
    #[error("transport error: {reason}")]
    Transport { reason: String },

    #[error("backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("quota exceeded for {model}")]
    QuotaExceeded { model: String },

    #[error("backend returned no text")]
    EmptyResponse,

    #[error("could not decode backend response: {reason}")]
    Decode { reason: String },
}

/// Outcome of [`crate::domain::backend_selector::BackendSelector::complete`]
/// when no advice text could be produced.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SelectorError {
    /// The capability listing itself failed; usually a bad credential.
    #[error("could not list backend models: {0}")]
    Listing(#[source] BackendError),

    #[error("{}", NO_CANDIDATE_SUCCEEDED)]
    Exhausted { attempts: usize },
}

/// Top-level error type for stocksage.
#[derive(Debug, thiserror::Error)]
pub enum StockSageError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("missing credential: environment variable {name} is not set")]
    MissingCredential { name: String },

    #[error(transparent)]
    Watchlist(#[from] WatchlistError),

    #[error("data unavailable for {ticker}: {reason}")]
    DataUnavailable { ticker: String, reason: String },

    #[error("no price data for {ticker}")]
    NoData { ticker: String },

    #[error("news fetch failed: {reason}")]
    News { reason: String },

    #[error("notification failed: {reason}")]
    Notification { reason: String },

    #[error(transparent)]
    Backend(#[from] SelectorError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StockSageError {
    /// Process exit status for this error family.
    pub fn exit_status(&self) -> u8 {
        match self {
            StockSageError::Io(_) => 1,
            StockSageError::ConfigParse { .. }
            | StockSageError::ConfigMissing { .. }
            | StockSageError::ConfigInvalid { .. }
            | StockSageError::Watchlist(_) => 2,
            StockSageError::MissingCredential { .. } => 3,
            StockSageError::Backend(_) => 4,
            StockSageError::DataUnavailable { .. }
            | StockSageError::NoData { .. }
            | StockSageError::News { .. }
            | StockSageError::Notification { .. } => 5,
        }
    }
}

impl From<&StockSageError> for std::process::ExitCode {
    fn from(err: &StockSageError) -> Self {
        std::process::ExitCode::from(err.exit_status())
    }
}
