use thiserror::Error;

/// Failures that abort a crawl. A missing listing or detail table is *not*
/// one of these; table absence is a control signal (end of pagination /
/// "no match") and is represented as data, not as an error.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {status} for {url}")]
    HttpStatus {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("at least one non-empty keyword is required")]
    NoKeywords,
}
