use thiserror::Error;

use crate::utils::date::DateKey;

/// Failures surfaced to the caller by the recap fetch pipeline.
///
/// Storage and index-refresh problems are absorbed internally (degraded to
/// a cache miss or an empty availability set) and never appear here.
#[derive(Error, Debug)]
pub enum RecapError {
    /// The availability index has no remote snapshot for this date.
    #[error("no recap data available for {0}")]
    NotAvailable(DateKey),

    /// The remote snapshot request completed with a non-success status.
    #[error("recap fetch failed with status {status}: {detail}")]
    FetchFailed { status: u16, detail: String },

    /// The remote request did not complete at the transport level.
    #[error("recap fetch failed: {0}")]
    Network(#[from] reqwest::Error),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl RecapError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            format!(
                "{}... (truncated, {} total bytes)",
                &body[..MAX_ERROR_BODY_LENGTH],
                body.len()
            )
        }
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        RecapError::FetchFailed {
            status: status.as_u16(),
            detail: Self::truncate_body(body),
        }
    }
}
