use log::{debug, info, warn};
use serde::Serialize;

use crate::criteria::SearchCriteria;
use crate::date_window::{RowDecision, ScanState};
use crate::detail::detail_page_matches;
use crate::error::ScrapeError;
use crate::fetcher::Fetch;
use crate::listing::{listing_page_url, parse_listing_page, TableScan};
use crate::session::CancelToken;

/// One accepted listing: its detail URL and title, in encounter order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScrapeMatch {
    pub url: String,
    pub title: String,
}

/// Events pushed to the caller while the crawl runs. `Done` is always the
/// last event of a crawl.
#[derive(Debug)]
pub enum ScrapeEvent {
    Progress { page: u32 },
    Match(ScrapeMatch),
    Done(CrawlOutcome),
}

/// How a crawl ended. Matches emitted before a `Failed` outcome remain
/// valid; failure only means emission stopped.
#[derive(Debug)]
pub enum CrawlOutcome {
    /// A listing page had no recognizable results table: end of pagination.
    NoMorePages,
    /// The date window closed; later pages can only hold older dates.
    WindowClosed,
    /// The cancellation token was triggered.
    Cancelled,
    /// A fetch failed; the crawl aborted without retry.
    Failed(ScrapeError),
}

/// Drives the page loop: fetch, parse, date-window scan, detail match.
/// Strictly sequential; one fetch in flight at a time.
pub struct Crawler<F: Fetch> {
    fetcher: F,
}

impl<F: Fetch> Crawler<F> {
    pub fn new(fetcher: F) -> Self {
        Crawler { fetcher }
    }

    /// Run the crawl to completion, pushing `Progress` and `Match` events
    /// through `emit`. The terminal outcome is returned, not emitted; the
    /// session layer wraps it in `ScrapeEvent::Done`.
    ///
    /// Ordering guarantee: `Progress` for page N is emitted before the
    /// page N fetch, and therefore before any match from page N.
    pub fn crawl(
        &self,
        criteria: &SearchCriteria,
        cancel: &CancelToken,
        emit: &mut dyn FnMut(ScrapeEvent),
    ) -> CrawlOutcome {
        let target = criteria.date_label();
        let mut state = ScanState::Seeking;
        let mut page: u32 = 1;

        info!(
            "Starting crawl: date {} keywords {:?}",
            target,
            criteria.keywords()
        );

        loop {
            if cancel.is_cancelled() {
                info!("Crawl cancelled before page {}", page);
                return CrawlOutcome::Cancelled;
            }

            emit(ScrapeEvent::Progress { page });

            let html = match self.fetcher.fetch(&listing_page_url(page)) {
                Ok(html) => html,
                Err(e) => {
                    warn!("Listing fetch failed on page {}: {}", page, e);
                    return CrawlOutcome::Failed(e);
                }
            };

            let rows = match parse_listing_page(&html) {
                TableScan::Found(rows) => rows,
                TableScan::NotFound => {
                    info!("No listing table on page {}; end of pagination", page);
                    return CrawlOutcome::NoMorePages;
                }
            };
            debug!("Page {}: {} listing rows", page, rows.len());

            for row in rows {
                let (decision, next) = state.advance(&row.posting_date, &target);
                state = next;

                match decision {
                    RowDecision::Skip => {}
                    RowDecision::Close => {
                        info!("Date window closed on page {}", page);
                        return CrawlOutcome::WindowClosed;
                    }
                    RowDecision::Admit => {
                        if cancel.is_cancelled() {
                            info!("Crawl cancelled before detail fetch");
                            return CrawlOutcome::Cancelled;
                        }

                        let detail_html = match self.fetcher.fetch(row.detail_url.as_str()) {
                            Ok(html) => html,
                            Err(e) => {
                                warn!("Detail fetch failed for {}: {}", row.detail_url, e);
                                return CrawlOutcome::Failed(e);
                            }
                        };

                        if detail_page_matches(&detail_html, criteria.keywords()) {
                            debug!("Keyword hit: {}", row.title);
                            emit(ScrapeEvent::Match(ScrapeMatch {
                                url: row.detail_url.to_string(),
                                title: row.title,
                            }));
                        }
                    }
                }
            }

            page += 1;
        }
    }
}
