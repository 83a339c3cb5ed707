//! Date-window scan over listing rows.
//!
//! The site returns listings in descending date order, so the rows matching
//! the target date form one contiguous block. The scan state is global
//! across the whole paginated crawl: once the window closes it never
//! reopens, even if a later page were to contain the target date again.

/// Where the crawl stands relative to the date window. Threaded through
/// each row evaluation as a value; the crawl loop holds the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// Window not entered yet; the site may still be listing newer dates.
    Seeking,
    /// At least one row matched the target date.
    InWindow,
    /// A differing date after the window; nothing further is scanned.
    Closed,
}

/// Verdict for a single row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowDecision {
    /// Posting date equals the target; run the detail-page matcher.
    Admit,
    /// Not in the window yet; move on to the next row.
    Skip,
    /// Window just closed (or already was); terminate the whole crawl.
    Close,
}

impl ScanState {
    /// Evaluate one row's posting date against the target date label.
    /// Comparison is string equality on `dd/mm/yyyy`, per the site contract.
    pub fn advance(self, posting_date: &str, target: &str) -> (RowDecision, ScanState) {
        match self {
            ScanState::Closed => (RowDecision::Close, ScanState::Closed),
            _ if posting_date == target => (RowDecision::Admit, ScanState::InWindow),
            ScanState::InWindow => (RowDecision::Close, ScanState::Closed),
            ScanState::Seeking => (RowDecision::Skip, ScanState::Seeking),
        }
    }
}
