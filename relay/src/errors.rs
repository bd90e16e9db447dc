use crate::protocol::RequestKind;
use thiserror::Error;

/// Result type alias for relay operations
pub type Result<T, E = RelayError> = std::result::Result<T, E>;

/// Errors that terminate a single request's pipeline. Nothing here is fatal
/// to the process.
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] datasource::fetcher::FetchError),

    #[error("no race found for round {0}")]
    RoundNotFound(u32),

    #[error("request kind {0:?} requires a parameter")]
    MissingParam(RequestKind),
}
