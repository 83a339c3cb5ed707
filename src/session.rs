use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::crawler::{Crawler, ScrapeEvent};
use crate::criteria::SearchCriteria;
use crate::fetcher::{Fetch, HttpFetcher};

/// Cooperative stop signal. The crawl polls it between page fetches and
/// before each detail fetch; cancellation takes effect at the next poll.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Handle to a running crawl. The caller drains events from its own
/// context; the worker never blocks on the caller. The final event is
/// always `ScrapeEvent::Done`, after which `recv` returns `None`.
pub struct ScrapeSession {
    events: Receiver<ScrapeEvent>,
    cancel: CancelToken,
    handle: Option<JoinHandle<()>>,
}

impl ScrapeSession {
    /// Next event, or `None` once the worker has finished and the channel
    /// drained.
    pub fn recv(&self) -> Option<ScrapeEvent> {
        self.events.recv().ok()
    }

    /// A token that can stop this crawl from any thread.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Wait for the worker thread to exit.
    pub fn join(mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for ScrapeSession {
    fn drop(&mut self) {
        // A dropped session should not leave the worker crawling forever.
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Start a crawl against the live site on a dedicated worker thread.
pub fn scrape(criteria: SearchCriteria) -> ScrapeSession {
    scrape_with(HttpFetcher::new(), criteria)
}

/// Same as `scrape` but with a caller-supplied fetcher.
pub fn scrape_with<F>(fetcher: F, criteria: SearchCriteria) -> ScrapeSession
where
    F: Fetch + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    let cancel = CancelToken::new();
    let worker_cancel = cancel.clone();

    let handle = thread::spawn(move || {
        let crawler = Crawler::new(fetcher);
        let sink = tx.clone();
        let mut emit = move |event| {
            // Receiver may be gone already; the cancel token is the
            // mechanism that actually stops the crawl.
            let _ = sink.send(event);
        };
        let outcome = crawler.crawl(&criteria, &worker_cancel, &mut emit);
        let _ = tx.send(ScrapeEvent::Done(outcome));
    });

    ScrapeSession {
        events: rx,
        cancel,
        handle: Some(handle),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::CrawlOutcome;
    use crate::error::ScrapeError;
    use chrono::NaiveDate;

    /// Serves one listing page with a single in-window row, then no table.
    struct OnePageSite;

    impl Fetch for OnePageSite {
        fn fetch(&self, url: &str) -> Result<String, ScrapeError> {
            if url.ends_with("?p=1") {
                Ok(r#"<table class="table table-sm table-striped">
                    <tr><th>h</th><th>h</th><th>h</th></tr>
                    <tr><td>1</td><td>02/01/2024</td>
                    <td><a href="detail.asp?id=1">Technicien</a></td></tr>
                    </table>"#
                    .to_string())
            } else if url.contains("detail.asp") {
                Ok(r#"<table class="table table-striped table-bordered table-sm">
                    <tr><td>Ville: Rabat</td></tr></table>"#
                    .to_string())
            } else {
                Ok("<html></html>".to_string())
            }
        }
    }

    fn criteria() -> SearchCriteria {
        SearchCriteria::new(["rabat"], NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()).unwrap()
    }

    #[test]
    fn events_arrive_in_order_and_end_with_done() {
        let session = scrape_with(OnePageSite, criteria());

        let mut events = Vec::new();
        while let Some(event) = session.recv() {
            events.push(event);
        }

        assert!(matches!(events[0], ScrapeEvent::Progress { page: 1 }));
        assert!(matches!(events[1], ScrapeEvent::Match(ref m) if m.title == "Technicien"));
        assert!(matches!(events[2], ScrapeEvent::Progress { page: 2 }));
        assert!(matches!(
            events[3],
            ScrapeEvent::Done(CrawlOutcome::NoMorePages)
        ));
        assert_eq!(events.len(), 4);

        // Channel is closed after Done.
        assert!(session.recv().is_none());
        session.join();
    }

    #[test]
    fn cancelled_session_reports_cancelled() {
        /// Never-ending site: every page has one row outside the window.
        struct EndlessSite;
        impl Fetch for EndlessSite {
            fn fetch(&self, _url: &str) -> Result<String, ScrapeError> {
                // Slow the loop down enough for the cancel to land.
                std::thread::sleep(std::time::Duration::from_millis(5));
                Ok(r#"<table class="table table-sm table-striped">
                    <tr><th>h</th><th>h</th><th>h</th></tr>
                    <tr><td>1</td><td>09/09/2099</td>
                    <td><a href="detail.asp?id=1">x</a></td></tr>
                    </table>"#
                    .to_string())
            }
        }

        let session = scrape_with(EndlessSite, criteria());
        session.cancel();

        let mut outcome = None;
        while let Some(event) = session.recv() {
            if let ScrapeEvent::Done(done) = event {
                outcome = Some(done);
            }
        }
        assert!(matches!(outcome, Some(CrawlOutcome::Cancelled)));
        session.join();
    }
}
