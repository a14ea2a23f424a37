use std::fs::File;
use std::path::Path;

use super::error::LoadError;
use super::model::{is_reserved_column, DatasetKind, MortalityRecord, Table, CODE_COLUMN, YEAR_COLUMN};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a mortality dataset from a CSV file.
///
/// Expected layout: a header row with an identifier column (`Entity` or
/// `Country/Territory`), an optional `Code` column, an integer `Year` column
/// and one numeric column per category. Every non-reserved column becomes a
/// category, in file order.
pub fn load(path: &Path) -> Result<Table, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let table = read_table(file, path)?;

    log::info!(
        "Loaded {} dataset from {}: {} rows, {} categories",
        table.kind(),
        path.display(),
        table.len(),
        table.categories().len()
    );
    Ok(table)
}

/// Like [`load`], but also insist on a particular dataset schema.
pub fn load_kind(path: &Path, expected: DatasetKind) -> Result<Table, LoadError> {
    let table = load(path)?;
    if table.kind() != expected {
        return Err(LoadError::WrongDataset {
            path: path.to_path_buf(),
            expected,
            found: table.kind(),
        });
    }
    Ok(table)
}

// ---------------------------------------------------------------------------
// CSV parsing
// ---------------------------------------------------------------------------

/// Parse a table from any CSV source. `path` is only used for error messages.
pub fn read_table<R: std::io::Read>(source: R, path: &Path) -> Result<Table, LoadError> {
    let csv_err = |source: csv::Error| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::Reader::from_reader(source);
    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let (entity_idx, kind) = headers
        .iter()
        .enumerate()
        .find_map(|(i, h)| DatasetKind::from_identifier(h).map(|k| (i, k)))
        .ok_or_else(|| LoadError::MissingColumn {
            path: path.to_path_buf(),
            column: "Entity".to_string(),
        })?;
    let year_idx = headers
        .iter()
        .position(|h| h == YEAR_COLUMN)
        .ok_or_else(|| LoadError::MissingColumn {
            path: path.to_path_buf(),
            column: YEAR_COLUMN.to_string(),
        })?;
    let code_idx = headers.iter().position(|h| h == CODE_COLUMN);

    let category_cols: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| !is_reserved_column(h))
        .map(|(i, h)| (i, h.clone()))
        .collect();
    if category_cols.is_empty() {
        return Err(LoadError::NoCategories {
            path: path.to_path_buf(),
        });
    }

    let mut records = Vec::new();

    for result in reader.records() {
        let record = result.map_err(csv_err)?;
        let field = |idx: usize| record.get(idx).unwrap_or("").trim();
        let line = record.position().map_or(0, |p| p.line());

        let year_text = field(year_idx);
        let year = year_text
            .parse::<i32>()
            .map_err(|_| LoadError::InvalidNumber {
                path: path.to_path_buf(),
                line,
                column: YEAR_COLUMN.to_string(),
                value: year_text.to_string(),
            })?;

        let code = code_idx
            .map(field)
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        let values = category_cols
            .iter()
            .map(|(idx, name)| {
                parse_count(field(*idx)).ok_or_else(|| LoadError::InvalidNumber {
                    path: path.to_path_buf(),
                    line,
                    column: name.clone(),
                    value: field(*idx).to_string(),
                })
            })
            .collect::<Result<Vec<f64>, _>>()?;

        records.push(MortalityRecord::new(field(entity_idx), code, year, values));
    }

    let categories = category_cols.into_iter().map(|(_, name)| name).collect();
    Table::new(kind, categories, records).map_err(|source| LoadError::Schema {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse a death count. Empty cells count as zero.
fn parse_count(s: &str) -> Option<f64> {
    if s.is_empty() {
        return Some(0.0);
    }
    s.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<Table, LoadError> {
        read_table(text.as_bytes(), Path::new("inline.csv"))
    }

    #[test]
    fn reads_risk_factor_layout() {
        let t = parse("Entity,Code,Year,Smoking,Air pollution\nFrance,FRA,2019,10,5\n").unwrap();
        assert_eq!(t.kind(), DatasetKind::RiskFactors);
        assert_eq!(t.categories(), ["Smoking", "Air pollution"]);
        assert_eq!(t.records()[0].code.as_deref(), Some("FRA"));
        assert_eq!(t.records()[0].values(), [10.0, 5.0]);
    }

    #[test]
    fn reads_causes_layout_without_code() {
        let t = parse("Country/Territory,Year,Neoplasms\nJapan,1990,7\n").unwrap();
        assert_eq!(t.kind(), DatasetKind::Causes);
        assert_eq!(t.records()[0].code, None);
    }

    #[test]
    fn empty_cells_are_zero() {
        let t = parse("Entity,Year,A,B\nFrance,2019,,3\n").unwrap();
        assert_eq!(t.records()[0].values(), [0.0, 3.0]);
    }

    #[test]
    fn missing_year_column_fails() {
        let err = parse("Entity,Code,A\nFrance,FRA,1\n").unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn { ref column, .. } if column == "Year"));
    }

    #[test]
    fn missing_identifier_column_fails() {
        let err = parse("Country,Year,A\nFrance,2019,1\n").unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn { .. }));
    }

    #[test]
    fn no_category_columns_fails() {
        let err = parse("Entity,Code,Year\nFrance,FRA,2019\n").unwrap_err();
        assert!(matches!(err, LoadError::NoCategories { .. }));
    }

    #[test]
    fn non_numeric_value_names_line_and_column() {
        let err = parse("Entity,Year,A\nFrance,2019,1\nFrance,2020,lots\n").unwrap_err();
        match err {
            LoadError::InvalidNumber { line, column, value, .. } => {
                assert_eq!(line, 3);
                assert_eq!(column, "A");
                assert_eq!(value, "lots");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn bad_year_reports_file_line() {
        let err = parse("Entity,Year,A\nFrance,soon,1\n").unwrap_err();
        assert!(matches!(err, LoadError::InvalidNumber { line: 2, .. }));
        assert!(err.to_string().contains("line 2"));
    }
}
