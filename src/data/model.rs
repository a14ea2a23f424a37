use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use super::error::UnknownCategoryError;

// ---------------------------------------------------------------------------
// DatasetKind – which of the two fixed schemas a table follows
// ---------------------------------------------------------------------------

/// The two supported mortality datasets, told apart by their identifier column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatasetKind {
    /// Deaths attributable to risk factors (`Entity` column).
    RiskFactors,
    /// Deaths by medical cause (`Country/Territory` column).
    Causes,
}

impl DatasetKind {
    pub const ALL: [DatasetKind; 2] = [DatasetKind::RiskFactors, DatasetKind::Causes];

    /// Header name of the entity identifier column.
    pub fn entity_column(self) -> &'static str {
        match self {
            DatasetKind::RiskFactors => "Entity",
            DatasetKind::Causes => "Country/Territory",
        }
    }

    /// Detect the dataset kind from a header's identifier column.
    pub fn from_identifier(header: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.entity_column() == header)
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetKind::RiskFactors => write!(f, "Risk Factors"),
            DatasetKind::Causes => write!(f, "Causes of Death"),
        }
    }
}

/// Reserved (non-category) column names.
pub const CODE_COLUMN: &str = "Code";
pub const YEAR_COLUMN: &str = "Year";

/// Whether a header names one of the identifier / code / year columns.
pub fn is_reserved_column(header: &str) -> bool {
    header == CODE_COLUMN || header == YEAR_COLUMN || DatasetKind::from_identifier(header).is_some()
}

// ---------------------------------------------------------------------------
// MortalityRecord – one row of either dataset
// ---------------------------------------------------------------------------

/// A single entity-year row.
///
/// Values are stored positionally; index `i` holds the death count of the
/// owning table's `categories()[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct MortalityRecord {
    pub entity: String,
    pub code: Option<String>,
    pub year: i32,
    values: Vec<f64>,
}

impl MortalityRecord {
    pub fn new(entity: impl Into<String>, code: Option<String>, year: i32, values: Vec<f64>) -> Self {
        Self {
            entity: entity.into(),
            code,
            year,
            values,
        }
    }

    /// Death count for a resolved category.
    pub fn value(&self, category: CategoryId) -> f64 {
        self.values[category.0]
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

// ---------------------------------------------------------------------------
// CategoryId – a schema-validated reference to a category column
// ---------------------------------------------------------------------------

/// Index of a category column, only obtainable through [`Table::resolve`]
/// so aggregate code never sees an unknown name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CategoryId(usize);

// ---------------------------------------------------------------------------
// Table – an immutable set of records sharing one schema
// ---------------------------------------------------------------------------

/// Rows of one dataset. Derived tables (filters, slices) share the
/// category list with their source.
#[derive(Debug, Clone)]
pub struct Table {
    kind: DatasetKind,
    categories: Arc<[String]>,
    records: Vec<MortalityRecord>,
}

impl Table {
    /// Build a table, checking that every record carries one value per category.
    pub fn new(
        kind: DatasetKind,
        categories: Vec<String>,
        records: Vec<MortalityRecord>,
    ) -> Result<Self, SchemaMismatch> {
        if let Some((row, rec)) = records
            .iter()
            .enumerate()
            .find(|(_, r)| r.values.len() != categories.len())
        {
            return Err(SchemaMismatch {
                row,
                expected: categories.len(),
                found: rec.values.len(),
            });
        }
        Ok(Self {
            kind,
            categories: categories.into(),
            records,
        })
    }

    /// A table with the same schema holding a different subset of rows.
    pub(crate) fn derive(&self, records: Vec<MortalityRecord>) -> Self {
        Self {
            kind: self.kind,
            categories: Arc::clone(&self.categories),
            records,
        }
    }

    pub fn kind(&self) -> DatasetKind {
        self.kind
    }

    /// Category names in file column order.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn records(&self) -> &[MortalityRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a single category by name.
    pub fn category(&self, name: &str) -> Result<CategoryId, UnknownCategoryError> {
        self.categories
            .iter()
            .position(|c| c == name)
            .map(CategoryId)
            .ok_or_else(|| UnknownCategoryError {
                category: name.to_string(),
                dataset: self.kind,
            })
    }

    /// Validate a list of category names against the schema, preserving order.
    pub fn resolve<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<CategoryId>, UnknownCategoryError> {
        names.iter().map(|n| self.category(n.as_ref())).collect()
    }

    /// Name of a resolved category.
    pub fn category_name(&self, id: CategoryId) -> &str {
        &self.categories[id.0]
    }

    /// Sorted set of distinct entities.
    pub fn entities(&self) -> BTreeSet<String> {
        self.records.iter().map(|r| r.entity.clone()).collect()
    }

    /// `(min, max)` year present, or `None` for an empty table.
    pub fn year_span(&self) -> Option<(i32, i32)> {
        let min = self.records.iter().map(|r| r.year).min()?;
        let max = self.records.iter().map(|r| r.year).max()?;
        Some((min, max))
    }
}

/// A record whose value count disagrees with the table schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("row {row} has {found} values, schema has {expected} categories")]
pub struct SchemaMismatch {
    pub row: usize,
    pub expected: usize,
    pub found: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Table {
        Table::new(
            DatasetKind::Causes,
            vec!["A".into(), "B".into()],
            vec![
                MortalityRecord::new("France", Some("FRA".into()), 2018, vec![10.0, 5.0]),
                MortalityRecord::new("Germany", None, 2019, vec![30.0, 15.0]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn resolve_keeps_requested_order() {
        let t = table();
        let ids = t.resolve(&["B", "A"]).unwrap();
        assert_eq!(t.category_name(ids[0]), "B");
        assert_eq!(t.category_name(ids[1]), "A");
    }

    #[test]
    fn resolve_rejects_unknown_names() {
        let err = table().resolve(&["A", "Smoking"]).unwrap_err();
        assert_eq!(err.category, "Smoking");
        assert_eq!(err.dataset, DatasetKind::Causes);
    }

    #[test]
    fn new_rejects_ragged_records() {
        let err = Table::new(
            DatasetKind::RiskFactors,
            vec!["A".into()],
            vec![MortalityRecord::new("France", None, 2018, vec![1.0, 2.0])],
        )
        .unwrap_err();
        assert_eq!(err.row, 0);
        assert_eq!(err.found, 2);
    }

    #[test]
    fn year_span_of_empty_table_is_none() {
        let t = table().derive(Vec::new());
        assert_eq!(t.year_span(), None);
        assert_eq!(table().year_span(), Some((2018, 2019)));
    }

    #[test]
    fn identifier_detection() {
        assert_eq!(DatasetKind::from_identifier("Entity"), Some(DatasetKind::RiskFactors));
        assert_eq!(
            DatasetKind::from_identifier("Country/Territory"),
            Some(DatasetKind::Causes)
        );
        assert!(is_reserved_column("Year"));
        assert!(!is_reserved_column("Smoking"));
    }
}
