use chrono::{Duration, Local, NaiveDate};
use clap::{Parser, ValueEnum};
use log::{error, info};

use emploi_scraper_lib::criteria::DATE_FORMAT;
use emploi_scraper_lib::{logger, scrape, CrawlOutcome, ScrapeEvent, SearchCriteria};

#[derive(Parser)]
#[command(
    name = "emploi-scraper",
    about = "Search emploi-public.ma listings by posting date and detail-page keywords"
)]
struct Args {
    /// Comma-separated keywords, e.g. "Echelle, grade, ville"
    keywords: String,

    /// Which day's listings to scan
    #[arg(short, long, value_enum, default_value_t = DateChoice::Today)]
    date: DateChoice,

    /// Explicit posting date (dd/mm/yyyy); overrides --date
    #[arg(long, value_name = "DATE")]
    on: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum DateChoice {
    Today,
    Yesterday,
    LastWeek,
}

impl DateChoice {
    fn resolve(self) -> NaiveDate {
        let today = Local::now().date_naive();
        match self {
            DateChoice::Today => today,
            DateChoice::Yesterday => today - Duration::days(1),
            DateChoice::LastWeek => today - Duration::days(7),
        }
    }
}

fn main() {
    logger::init();
    let args = Args::parse();

    let target_date = match &args.on {
        Some(raw) => match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
            Ok(date) => date,
            Err(e) => {
                error!("Invalid date '{}' (expected dd/mm/yyyy): {}", raw, e);
                std::process::exit(2);
            }
        },
        None => args.date.resolve(),
    };

    let criteria = match SearchCriteria::from_comma_separated(&args.keywords, target_date) {
        Ok(criteria) => criteria,
        Err(e) => {
            error!("{}", e);
            std::process::exit(2);
        }
    };

    info!(
        "Searching listings posted on {} for keywords {:?}",
        criteria.date_label(),
        criteria.keywords()
    );

    let session = scrape(criteria);
    let mut found = 0usize;

    while let Some(event) = session.recv() {
        match event {
            ScrapeEvent::Progress { page } => info!("Searching... (page {})", page),
            ScrapeEvent::Match(m) => {
                found += 1;
                println!("{}\t{}", m.title, m.url);
            }
            ScrapeEvent::Done(outcome) => {
                match outcome {
                    CrawlOutcome::NoMorePages | CrawlOutcome::WindowClosed => {}
                    CrawlOutcome::Cancelled => info!("Search cancelled."),
                    CrawlOutcome::Failed(e) => {
                        error!("Scrape failed: {}", e);
                        std::process::exit(1);
                    }
                }
                break;
            }
        }
    }

    if found == 0 {
        info!("Nothing found !");
    } else {
        info!("{} matching listing(s).", found);
    }

    session.join();
}
