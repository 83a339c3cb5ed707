use chrono::NaiveDate;

use crate::error::ScrapeError;

/// Site-wide date convention. Dates are compared as strings in this format;
/// the site never varies it, so no date arithmetic is done on row cells.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Validated search input. Keywords are trimmed, lowercased and deduplicated
/// at construction; the value is read-only for the rest of the crawl.
#[derive(Debug, Clone)]
pub struct SearchCriteria {
    keywords: Vec<String>,
    target_date: NaiveDate,
}

impl SearchCriteria {
    pub fn new<I, S>(keywords: I, target_date: NaiveDate) -> Result<Self, ScrapeError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut cleaned: Vec<String> = Vec::new();
        for keyword in keywords {
            let keyword = keyword.as_ref().trim().to_lowercase();
            if !keyword.is_empty() && !cleaned.contains(&keyword) {
                cleaned.push(keyword);
            }
        }

        if cleaned.is_empty() {
            return Err(ScrapeError::NoKeywords);
        }

        Ok(SearchCriteria {
            keywords: cleaned,
            target_date,
        })
    }

    /// Build criteria from a raw comma-separated keyword list, e.g.
    /// `"Echelle, grade, ville"`.
    pub fn from_comma_separated(raw: &str, target_date: NaiveDate) -> Result<Self, ScrapeError> {
        Self::new(raw.split(','), target_date)
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn target_date(&self) -> NaiveDate {
        self.target_date
    }

    /// The target date rendered the way the site prints posting dates.
    pub fn date_label(&self) -> String {
        self.target_date.format(DATE_FORMAT).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
    }

    #[test]
    fn keywords_are_normalized_and_deduplicated() {
        let criteria = SearchCriteria::new(["  Rabat ", "GRADE", "rabat", ""], day()).unwrap();
        assert_eq!(criteria.keywords(), ["rabat", "grade"]);
    }

    #[test]
    fn comma_separated_input_is_split_and_trimmed() {
        let criteria = SearchCriteria::from_comma_separated("Echelle, grade , ,ville", day()).unwrap();
        assert_eq!(criteria.keywords(), ["echelle", "grade", "ville"]);
    }

    #[test]
    fn empty_keyword_set_is_rejected() {
        let err = SearchCriteria::from_comma_separated(" , ,", day()).unwrap_err();
        assert!(matches!(err, ScrapeError::NoKeywords));
    }

    #[test]
    fn date_label_uses_site_format() {
        let criteria = SearchCriteria::new(["x"], day()).unwrap();
        assert_eq!(criteria.date_label(), "02/01/2024");
    }
}
