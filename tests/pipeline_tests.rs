use std::io::Write;

use mortality_dash::data::aggregate::{
    correlation_matrix, sum_by_category, sum_by_year, top_n, SortOrder,
};
use mortality_dash::data::filter::{filter_rows, latest_year_slice};
use mortality_dash::data::loader::load;
use mortality_dash::data::{DashboardContext, DatasetKind, FilterSpec, LoadError, YearRange};
use pretty_assertions::assert_eq;
use tempfile::NamedTempFile;

fn csv_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

const RISK_CSV: &str = "\
Entity,Code,Year,A,B
France,FRA,2018,10,5
France,FRA,2019,20,5
Germany,DEU,2019,30,15
";

const CAUSES_CSV: &str = "\
Country/Territory,Code,Year,Neoplasms,Malaria,Road Injuries
France,FRA,2017,7,0,3
France,FRA,2018,8,1,2
Germany,DEU,2018,9,0,4
Germany,DEU,2019,12,2,6
Japan,JPN,2019,20,0,5
";

fn years(a: i32, b: i32) -> YearRange {
    YearRange::new(a, b).unwrap()
}

#[test]
fn concrete_scenario() {
    let file = csv_file(RISK_CSV);
    let table = load(file.path()).unwrap();

    let spec = FilterSpec::new(["France"], years(2018, 2019), ["A"]);
    let filtered = filter_rows(&table, &spec);
    assert_eq!(filtered.len(), 2);

    let totals = sum_by_category(&filtered, &["A"]).unwrap();
    assert_eq!(totals.get("A"), Some(30.0));
    assert_eq!(top_n(&totals, 1, SortOrder::Descending), vec![("A".to_string(), 30.0)]);

    let latest = latest_year_slice(&filtered);
    assert_eq!(latest.len(), 1);
    assert_eq!(latest.records()[0].entity, "France");
    assert_eq!(latest.records()[0].year, 2019);
}

#[test]
fn empty_entity_selection_sums_to_zero() {
    let file = csv_file(RISK_CSV);
    let table = load(file.path()).unwrap();

    let spec = FilterSpec::new(Vec::<String>::new(), years(1990, 2019), ["A", "B"]);
    let filtered = filter_rows(&table, &spec);
    assert!(filtered.is_empty());

    let totals = sum_by_category(&filtered, &spec.categories).unwrap();
    assert_eq!(totals.get("A"), Some(0.0));
    assert_eq!(totals.get("B"), Some(0.0));
}

#[test]
fn filtered_rows_match_spec_and_sums_are_additive() {
    let file = csv_file(CAUSES_CSV);
    let table = load(file.path()).unwrap();
    let categories = table.categories().to_vec();

    for (entities, range) in [
        (vec!["France", "Germany"], years(2018, 2019)),
        (vec!["Japan"], years(2017, 2018)),
        (vec!["France", "Germany", "Japan"], years(2017, 2019)),
    ] {
        let spec = FilterSpec::new(entities.clone(), range, categories.clone());
        let filtered = filter_rows(&table, &spec);
        assert!(filtered.len() <= table.len());
        assert!(filtered
            .records()
            .iter()
            .all(|r| entities.contains(&r.entity.as_str()) && range.contains(r.year)));

        let totals = sum_by_category(&filtered, &categories).unwrap();
        for (i, category) in categories.iter().enumerate() {
            let expected: f64 = table
                .records()
                .iter()
                .filter(|r| spec.matches(&r.entity, r.year))
                .map(|r| r.values()[i])
                .sum();
            assert_eq!(totals.get(category), Some(expected));
        }
    }
}

#[test]
fn yearly_totals_add_up_to_category_totals() {
    let file = csv_file(CAUSES_CSV);
    let table = load(file.path()).unwrap();
    let categories = table.categories().to_vec();

    let overall = sum_by_category(&table, &categories).unwrap();
    let by_year = sum_by_year(&table, &categories).unwrap();
    assert_eq!(
        by_year.iter().map(|y| y.year).collect::<Vec<_>>(),
        vec![2017, 2018, 2019]
    );
    for category in &categories {
        let across_years: f64 = by_year.iter().filter_map(|y| y.totals.get(category)).sum();
        assert_eq!(Some(across_years), overall.get(category));
    }
}

#[test]
fn top_n_is_bounded_and_non_increasing() {
    let file = csv_file(CAUSES_CSV);
    let table = load(file.path()).unwrap();
    let totals = sum_by_category(&table, table.categories()).unwrap();

    for n in 0..5 {
        let top = top_n(&totals, n, SortOrder::Descending);
        assert_eq!(top.len(), n.min(totals.len()));
        assert!(top.windows(2).all(|w| w[0].1 >= w[1].1));
    }
}

#[test]
fn correlation_is_symmetric_with_unit_or_nan_diagonal() {
    let file = csv_file(CAUSES_CSV);
    let table = load(file.path()).unwrap();
    let m = correlation_matrix(&table, table.categories()).unwrap();

    for i in 0..m.size() {
        let d = m.get(i, i);
        assert!(d.is_nan() || d == 1.0);
        for j in 0..m.size() {
            let (a, b) = (m.get(i, j), m.get(j, i));
            assert!((a.is_nan() && b.is_nan()) || a == b);
        }
    }
}

#[test]
fn correlation_diagonal_is_exact_for_fractional_values() {
    let file = csv_file("Entity,Year,A\nFrance,2000,0.1\nFrance,2001,0.2\n");
    let table = load(file.path()).unwrap();
    let m = correlation_matrix(&table, &["A"]).unwrap();
    assert_eq!(m.get(0, 0), 1.0);
}

#[test]
fn missing_year_column_is_a_load_error() {
    let file = csv_file("Entity,Code,A\nFrance,FRA,1\n");
    let err = load(file.path()).unwrap_err();
    assert!(matches!(err, LoadError::MissingColumn { ref column, .. } if column == "Year"));
}

#[test]
fn missing_file_is_a_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load(&dir.path().join("absent.csv")).unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }));
}

#[test]
fn ragged_row_is_a_csv_error() {
    let file = csv_file("Entity,Code,Year,A,B\nFrance,FRA,2019,1,2\nGermany,DEU,2019,3\n");
    let err = load(file.path()).unwrap_err();
    assert!(matches!(err, LoadError::Csv { .. }));
    assert!(err.to_string().contains(&file.path().display().to_string()));
}

#[test]
fn context_checks_dataset_kinds() {
    let risk = csv_file(RISK_CSV);
    let causes = csv_file(CAUSES_CSV);

    let ctx = DashboardContext::load(risk.path(), causes.path()).unwrap();
    assert_eq!(ctx.table(DatasetKind::RiskFactors).categories(), ["A", "B"]);
    assert_eq!(ctx.entities(), ["France", "Germany"]);
    assert_eq!(ctx.year_bounds(), Some(years(2018, 2019)));

    let err = DashboardContext::load(causes.path(), risk.path()).unwrap_err();
    assert!(matches!(err, LoadError::WrongDataset { .. }));
}
