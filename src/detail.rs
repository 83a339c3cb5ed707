use scraper::{Html, Selector};

/// Only the summary block at the top of the detail table is consulted;
/// later rows hold the long-form description and are never scanned.
const DETAIL_ROW_LIMIT: usize = 4;

/// Decide whether a job detail page matches any of the search keywords.
///
/// A match is any keyword (already lowercased by `SearchCriteria`) being a
/// substring of the concatenated, lowercased text of one of the first four
/// rows of the detail table. A page without the detail table never matches;
/// that is "no match", not an error.
pub fn detail_page_matches(html: &str, keywords: &[String]) -> bool {
    let document = Html::parse_document(html);
    let table_sel = Selector::parse("table.table.table-striped.table-bordered.table-sm").unwrap();
    let row_sel = Selector::parse("tr").unwrap();

    let table = match document.select(&table_sel).next() {
        Some(table) => table,
        None => return false,
    };

    for row in table.select(&row_sel).take(DETAIL_ROW_LIMIT) {
        let text = row.text().collect::<String>().to_lowercase();
        if keywords.iter().any(|keyword| text.contains(keyword.as_str())) {
            return true;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail_page(rows: &[&str]) -> String {
        let body: String = rows
            .iter()
            .map(|r| format!("<tr><td>{r}</td></tr>"))
            .collect();
        format!(
            r#"<html><body>
            <table class="table table-striped table-bordered table-sm">{body}</table>
            </body></html>"#
        )
    }

    fn kw(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn keyword_match_is_case_insensitive() {
        let html = detail_page(&["Administration: X", "Ville: Rabat"]);
        assert!(detail_page_matches(&html, &kw(&["rabat"])));
    }

    #[test]
    fn no_keyword_no_match() {
        let html = detail_page(&["Administration: X", "Ville: Rabat"]);
        assert!(!detail_page_matches(&html, &kw(&["casablanca"])));
    }

    #[test]
    fn keyword_in_fifth_row_never_matches() {
        let html = detail_page(&["a", "b", "c", "d", "Ville: Rabat"]);
        assert!(!detail_page_matches(&html, &kw(&["rabat"])));
    }

    #[test]
    fn keyword_in_fourth_row_matches() {
        let html = detail_page(&["a", "b", "c", "Grade: Echelle 10"]);
        assert!(detail_page_matches(&html, &kw(&["echelle"])));
    }

    #[test]
    fn missing_detail_table_is_no_match() {
        let html = "<html><body><p>page en travaux</p></body></html>";
        assert!(!detail_page_matches(html, &kw(&["rabat"])));
    }

    #[test]
    fn any_of_several_keywords_suffices() {
        let html = detail_page(&["Ville: Rabat"]);
        assert!(detail_page_matches(&html, &kw(&["tanger", "rabat"])));
    }
}
