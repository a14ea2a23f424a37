use std::collections::BTreeSet;

use super::model::Table;

// ---------------------------------------------------------------------------
// YearRange – inclusive year interval
// ---------------------------------------------------------------------------

/// Inclusive `[start, end]` interval. `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    start: i32,
    end: i32,
}

impl YearRange {
    /// Returns `None` when `start > end`.
    pub fn new(start: i32, end: i32) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    pub fn start(self) -> i32 {
        self.start
    }

    pub fn end(self) -> i32 {
        self.end
    }

    pub fn contains(self, year: i32) -> bool {
        (self.start..=self.end).contains(&year)
    }

    /// Number of calendar years covered.
    pub fn len(self) -> usize {
        self.start.abs_diff(self.end) as usize + 1
    }

    /// Overlap of two ranges, if any.
    pub fn intersect(self, other: YearRange) -> Option<YearRange> {
        YearRange::new(self.start.max(other.start), self.end.min(other.end))
    }

    /// Clamp both bounds of `other` into `self`.
    pub fn clamp(self, other: YearRange) -> YearRange {
        let start = other.start.clamp(self.start, self.end);
        let end = other.end.clamp(self.start, self.end);
        YearRange { start, end }
    }
}

// ---------------------------------------------------------------------------
// FilterSpec – one interaction's worth of user constraints
// ---------------------------------------------------------------------------

/// Selected entities, year interval and categories.
///
/// An empty entity set means "nothing selected", not "no filter".
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec {
    pub entities: BTreeSet<String>,
    pub years: YearRange,
    pub categories: Vec<String>,
}

impl FilterSpec {
    pub fn new(
        entities: impl IntoIterator<Item = impl Into<String>>,
        years: YearRange,
        categories: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            entities: entities.into_iter().map(Into::into).collect(),
            years,
            categories: categories.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether a row with this entity and year passes the filter.
    pub fn matches(&self, entity: &str, year: i32) -> bool {
        self.years.contains(year) && self.entities.contains(entity)
    }
}

/// Keep only records whose entity is selected and whose year is in range.
pub fn filter_rows(table: &Table, spec: &FilterSpec) -> Table {
    if spec.entities.is_empty() {
        return table.derive(Vec::new());
    }
    let records = table
        .records()
        .iter()
        .filter(|r| spec.matches(&r.entity, r.year))
        .cloned()
        .collect();
    table.derive(records)
}

/// Records of a single entity, all years.
pub fn entity_rows(table: &Table, entity: &str) -> Table {
    let records = table
        .records()
        .iter()
        .filter(|r| r.entity == entity)
        .cloned()
        .collect();
    table.derive(records)
}

/// Records whose year equals the maximum year present.
pub fn latest_year_slice(table: &Table) -> Table {
    let Some((_, latest)) = table.year_span() else {
        return table.derive(Vec::new());
    };
    let records = table
        .records()
        .iter()
        .filter(|r| r.year == latest)
        .cloned()
        .collect();
    table.derive(records)
}
