pub mod crawler;
pub mod criteria;
pub mod date_window;
pub mod detail;
pub mod error;
pub mod fetcher;
pub mod listing;
pub mod logger;
pub mod session;

// Exporting types for convenience
pub use crawler::{CrawlOutcome, Crawler, ScrapeEvent, ScrapeMatch};
pub use criteria::SearchCriteria;
pub use error::ScrapeError;
pub use fetcher::{Fetch, HttpFetcher};
pub use listing::{ListingRow, TableScan};
pub use session::{scrape, scrape_with, CancelToken, ScrapeSession};
