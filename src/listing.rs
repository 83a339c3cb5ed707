use scraper::{Html, Selector};
use url::Url;

/// Paginated search results page; `?p=` is the one-based page cursor.
pub const SEARCH_URL: &str = "https://www.emploi-public.ma/FR/index.asp";
/// Base against which the relative hrefs in listing rows are resolved.
pub const DETAIL_BASE_URL: &str = "https://www.emploi-public.ma/FR/";

/// One entry of the search results table. Ephemeral: built per page,
/// consumed immediately, never cached across pages.
///
/// `posting_date` stays the raw cell text. The site contract is
/// string-equality on `dd/mm/yyyy`; parsing it into a date would only add
/// a failure mode the comparison does not need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRow {
    pub posting_date: String,
    pub title: String,
    pub detail_url: Url,
}

/// Outcome of scanning a page for the results table. Absence is a control
/// signal (end of pagination), kept distinct from transport failures so
/// callers can tell "no more data" from "fetch broke".
#[derive(Debug)]
pub enum TableScan {
    Found(Vec<ListingRow>),
    NotFound,
}

pub fn listing_page_url(page: u32) -> String {
    format!("{}?p={}", SEARCH_URL, page)
}

/// Extract listing rows from a search results page.
///
/// The first `tr` is the header and is skipped. Only rows with exactly
/// three `td` cells are listings (cell 1 = posting date, cell 2 = anchor
/// with title and href); anything else is silently skipped, as are rows
/// whose anchor is missing or whose href does not resolve.
pub fn parse_listing_page(html: &str) -> TableScan {
    let document = Html::parse_document(html);
    let table_sel = Selector::parse("table.table.table-sm.table-striped").unwrap();
    let row_sel = Selector::parse("tr").unwrap();
    let cell_sel = Selector::parse("td").unwrap();
    let link_sel = Selector::parse("a").unwrap();

    let table = match document.select(&table_sel).next() {
        Some(table) => table,
        None => return TableScan::NotFound,
    };

    let base = Url::parse(DETAIL_BASE_URL).expect("valid base URL");

    let mut rows = Vec::new();
    for row in table.select(&row_sel).skip(1) {
        let cells: Vec<_> = row.select(&cell_sel).collect();
        if cells.len() != 3 {
            continue;
        }

        let posting_date = cells[1].text().collect::<String>().trim().to_string();

        let link = match cells[2].select(&link_sel).next() {
            Some(link) => link,
            None => continue,
        };
        let href = match link.value().attr("href") {
            Some(href) => href,
            None => continue,
        };
        let detail_url = match base.join(href) {
            Ok(url) => url,
            Err(_) => continue,
        };
        let title = link.text().collect::<String>().trim().to_string();

        rows.push(ListingRow {
            posting_date,
            title,
            detail_url,
        });
    }

    TableScan::Found(rows)
}
