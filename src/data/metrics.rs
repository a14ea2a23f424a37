use super::aggregate::{sum_by_category, CategoryTotals};
use super::error::UnknownCategoryError;
use super::filter::latest_year_slice;
use super::model::Table;

// ---------------------------------------------------------------------------
// Headline metrics – the numbers shown above each dataset's charts
// ---------------------------------------------------------------------------

/// Latest-year summary of a filtered table.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlineMetrics {
    /// Maximum year present; `None` for an empty table.
    pub latest_year: Option<i32>,
    /// Per-category totals within the latest year.
    pub latest_totals: CategoryTotals,
}

impl HeadlineMetrics {
    pub fn compute<S: AsRef<str>>(table: &Table, categories: &[S]) -> Result<Self, UnknownCategoryError> {
        let latest = latest_year_slice(table);
        Ok(Self {
            latest_year: latest.year_span().map(|(_, max)| max),
            latest_totals: sum_by_category(&latest, categories)?,
        })
    }

    /// Deaths across all categories in the latest year.
    pub fn total_deaths(&self) -> f64 {
        self.latest_totals.grand_total()
    }

    /// Category with the most deaths in the latest year.
    pub fn top_category(&self) -> Option<&str> {
        self.latest_totals.max().map(|(name, _)| name)
    }

    /// Latest-year deaths of every category whose name contains one of
    /// `keywords`, or `None` when no category matches.
    pub fn keyword_total(&self, keywords: &[&str]) -> Option<f64> {
        let mut matched = self
            .latest_totals
            .iter()
            .filter(|(name, _)| keywords.iter().any(|k| name.contains(k)))
            .peekable();
        matched.peek()?;
        Some(matched.map(|(_, v)| v).sum())
    }

    /// Share (percent) of total deaths from categories matching `keywords`.
    pub fn keyword_share(&self, keywords: &[&str]) -> Option<f64> {
        let part = self.keyword_total(keywords)?;
        let total = self.total_deaths();
        Some(if total > 0.0 { part / total * 100.0 } else { 0.0 })
    }
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// Round to a whole number and group thousands: `1234567.4` → `"1,234,567"`.
pub fn format_thousands(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Shorten long labels to `max` characters followed by `...`.
pub fn truncate_label(label: &str, max: usize) -> String {
    if label.chars().count() > max {
        let head: String = label.chars().take(max).collect();
        format!("{head}...")
    } else {
        label.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{DatasetKind, MortalityRecord};

    fn table() -> Table {
        Table::new(
            DatasetKind::Causes,
            vec![
                "Cardiovascular Diseases".into(),
                "Neoplasms".into(),
                "Malaria".into(),
            ],
            vec![
                MortalityRecord::new("France", None, 2018, vec![100.0, 80.0, 0.0]),
                MortalityRecord::new("France", None, 2019, vec![50.0, 30.0, 20.0]),
                MortalityRecord::new("Japan", None, 2019, vec![50.0, 40.0, 10.0]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn latest_year_totals() {
        let t = table();
        let m = HeadlineMetrics::compute(&t, t.categories()).unwrap();
        assert_eq!(m.latest_year, Some(2019));
        assert_eq!(m.total_deaths(), 200.0);
        assert_eq!(m.top_category(), Some("Cardiovascular Diseases"));
    }

    #[test]
    fn keyword_share_and_total() {
        let t = table();
        let m = HeadlineMetrics::compute(&t, t.categories()).unwrap();
        assert_eq!(m.keyword_share(&["Cardio", "Heart"]), Some(50.0));
        assert_eq!(m.keyword_total(&["Neoplasm", "Cancer"]), Some(70.0));
        assert_eq!(m.keyword_total(&["Drowning"]), None);
    }

    #[test]
    fn empty_table_degrades_to_zero() {
        let t = table();
        let empty = crate::data::filter::filter_rows(
            &t,
            &crate::data::filter::FilterSpec::new(
                Vec::<String>::new(),
                crate::data::filter::YearRange::new(1990, 2019).unwrap(),
                Vec::<String>::new(),
            ),
        );
        let m = HeadlineMetrics::compute(&empty, t.categories()).unwrap();
        assert_eq!(m.latest_year, None);
        assert_eq!(m.total_deaths(), 0.0);
        assert_eq!(m.keyword_share(&["Cardio"]), Some(0.0));
    }

    #[test]
    fn thousands_grouping() {
        assert_eq!(format_thousands(0.0), "0");
        assert_eq!(format_thousands(999.4), "999");
        assert_eq!(format_thousands(1234567.6), "1,234,568");
        assert_eq!(format_thousands(-1000.0), "-1,000");
    }

    #[test]
    fn label_truncation() {
        assert_eq!(truncate_label("Smoking", 25), "Smoking");
        assert_eq!(
            truncate_label("High systolic blood pressure", 25),
            "High systolic blood press..."
        );
    }
}
