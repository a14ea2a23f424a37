//! Chart-ready views for one interaction.
//!
//! A [`DatasetView`] bundles every aggregate the dashboard draws for one
//! dataset. It is rebuilt from the immutable [`DashboardContext`] on every
//! filter change and thrown away afterwards. Each aggregate carries its own
//! `Result` so a bad category name only blanks the chart that asked for it.

use std::collections::{BTreeMap, BTreeSet};

use crate::data::aggregate::{
    correlation_matrix, entity_distribution, percent_change, pivot_entity_year, sum_by_category,
    sum_by_entity, sum_by_year, top_n, BoxStats, CategoryTotals, CorrelationMatrix,
    EntityYearPivot, SortOrder, YearTotals,
};
use crate::data::filter::{entity_rows, filter_rows};
use crate::data::metrics::HeadlineMetrics;
use crate::data::{DashboardContext, DatasetKind, FilterSpec, Table, UnknownCategoryError, YearRange};

pub type ViewResult<T> = Result<T, UnknownCategoryError>;

/// Number of categories shown in the per-country "top causes" chart.
pub const DETAIL_TOP_CATEGORIES: usize = 5;

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

/// Everything besides the loaded tables that shapes a [`DatasetView`].
#[derive(Debug, Clone)]
pub struct ViewParams {
    pub filter: FilterSpec,
    pub top_bar: usize,
    pub top_pie: usize,
    /// How many leading schema categories the heatmap and treemap use.
    pub matrix_columns: usize,
    pub correlation_columns: usize,
    /// Single category for the pivot, distribution and per-country bar.
    pub focus_category: Option<String>,
    /// Entity for the "top categories over time" breakdown.
    pub detail_entity: Option<String>,
}

// ---------------------------------------------------------------------------
// DatasetView
// ---------------------------------------------------------------------------

/// Views that depend on the single focus category.
#[derive(Debug, Clone)]
pub struct FocusView {
    pub category: String,
    pub pivot: EntityYearPivot,
    pub distribution: BTreeMap<String, BoxStats>,
    /// Per-entity totals, ascending.
    pub by_entity: Vec<(String, f64)>,
}

/// Top categories of one entity and their yearly totals.
#[derive(Debug, Clone)]
pub struct DetailView {
    pub entity: String,
    pub categories: Vec<String>,
    pub by_year: Vec<YearTotals>,
}

#[derive(Debug, Clone)]
pub struct DatasetView {
    pub kind: DatasetKind,
    pub filtered: Table,
    pub metrics: ViewResult<HeadlineMetrics>,
    /// Largest totals in ascending order (largest drawn last / on top).
    pub top_bar: ViewResult<Vec<(String, f64)>>,
    /// Largest totals, descending.
    pub top_pie: ViewResult<Vec<(String, f64)>>,
    pub trend: ViewResult<Vec<YearTotals>>,
    /// First → last selected year change, per selected category.
    pub trend_changes: Vec<(String, Option<f64>)>,
    pub entity_matrix: ViewResult<BTreeMap<String, CategoryTotals>>,
    pub correlation: ViewResult<CorrelationMatrix>,
    pub focus: Option<ViewResult<FocusView>>,
    pub detail: Option<ViewResult<DetailView>>,
}

impl DatasetView {
    pub fn compute(ctx: &DashboardContext, kind: DatasetKind, params: &ViewParams) -> Self {
        let table = ctx.table(kind);
        let filtered = filter_rows(table, &params.filter);
        let all = filtered.categories().to_vec();
        let selected = &params.filter.categories;
        let years = params.filter.years;

        let totals = sum_by_category(&filtered, &all);
        let top_bar = totals.as_ref().map_err(|e| e.clone()).map(|t| {
            let mut top = top_n(t, params.top_bar, SortOrder::Descending);
            top.reverse();
            top
        });
        let top_pie = totals
            .as_ref()
            .map_err(|e| e.clone())
            .map(|t| top_n(t, params.top_pie, SortOrder::Descending));

        let trend = sum_by_year(&filtered, selected);
        let trend_changes = match &trend {
            Ok(by_year) => selected
                .iter()
                .map(|c| (c.clone(), percent_change(by_year, c, years.start(), years.end())))
                .collect(),
            Err(_) => Vec::new(),
        };

        let view = Self {
            kind,
            metrics: HeadlineMetrics::compute(&filtered, &all),
            top_bar,
            top_pie,
            trend,
            trend_changes,
            entity_matrix: sum_by_entity(&filtered, leading(&all, params.matrix_columns)),
            correlation: correlation_matrix(&filtered, leading(&all, params.correlation_columns)),
            focus: params
                .focus_category
                .as_deref()
                .map(|c| focus_view(&filtered, c)),
            detail: params
                .detail_entity
                .as_deref()
                .map(|e| detail_view(&filtered, e)),
            filtered,
        };
        view.log_failures();
        view
    }

    pub fn is_empty(&self) -> bool {
        self.filtered.is_empty()
    }

    fn log_failures(&self) {
        let errors = [
            self.metrics.as_ref().err(),
            self.trend.as_ref().err(),
            self.entity_matrix.as_ref().err(),
            self.correlation.as_ref().err(),
            self.focus.as_ref().and_then(|f| f.as_ref().err()),
            self.detail.as_ref().and_then(|d| d.as_ref().err()),
        ];
        for err in errors.into_iter().flatten() {
            log::warn!("{} view skipped: {err}", self.kind);
        }
    }
}

/// The first `n` categories in schema order.
fn leading(categories: &[String], n: usize) -> &[String] {
    &categories[..n.min(categories.len())]
}

fn focus_view(table: &Table, category: &str) -> ViewResult<FocusView> {
    let by_entity = sum_by_entity(table, &[category])?;
    let totals: CategoryTotals = by_entity
        .into_iter()
        .map(|(entity, t)| (entity, t.grand_total()))
        .collect();
    let n = totals.len();
    Ok(FocusView {
        category: category.to_string(),
        pivot: pivot_entity_year(table, category)?,
        distribution: entity_distribution(table, category)?,
        by_entity: top_n(&totals, n, SortOrder::Ascending),
    })
}

fn detail_view(table: &Table, entity: &str) -> ViewResult<DetailView> {
    let rows = entity_rows(table, entity);
    let totals = sum_by_category(&rows, rows.categories())?;
    let categories: Vec<String> = top_n(&totals, DETAIL_TOP_CATEGORIES, SortOrder::Descending)
        .into_iter()
        .map(|(c, _)| c)
        .collect();
    Ok(DetailView {
        entity: entity.to_string(),
        by_year: sum_by_year(&rows, &categories)?,
        categories,
    })
}

// ---------------------------------------------------------------------------
// CompareView – both datasets side by side
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct CompareView {
    pub risk_factors: ViewResult<CategoryTotals>,
    pub causes: ViewResult<CategoryTotals>,
}

impl CompareView {
    /// Totals of the first `columns` categories of each dataset over the
    /// selected entities. The year range is not applied: the summary spans
    /// every year each dataset covers.
    pub fn compute(ctx: &DashboardContext, entities: &BTreeSet<String>, columns: usize) -> Self {
        let summary = |kind: DatasetKind| {
            let table = ctx.table(kind);
            let filtered = match table.year_span().and_then(|(a, b)| YearRange::new(a, b)) {
                Some(years) => filter_rows(
                    table,
                    &FilterSpec {
                        entities: entities.clone(),
                        years,
                        categories: Vec::new(),
                    },
                ),
                None => table.derive(Vec::new()),
            };
            sum_by_category(&filtered, leading(filtered.categories(), columns))
        };
        Self {
            risk_factors: summary(DatasetKind::RiskFactors),
            causes: summary(DatasetKind::Causes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{MortalityRecord, YearRange};

    fn ctx() -> DashboardContext {
        let rows = |vals: [[f64; 3]; 3]| {
            vec![
                MortalityRecord::new("France", None, 2018, vals[0].to_vec()),
                MortalityRecord::new("France", None, 2019, vals[1].to_vec()),
                MortalityRecord::new("Germany", None, 2019, vals[2].to_vec()),
            ]
        };
        let risk = Table::new(
            DatasetKind::RiskFactors,
            vec!["Smoking".into(), "Air pollution".into(), "Alcohol use".into()],
            rows([[1.0, 2.0, 3.0], [2.0, 2.0, 1.0], [5.0, 1.0, 1.0]]),
        )
        .unwrap();
        let causes = Table::new(
            DatasetKind::Causes,
            vec!["Cardiovascular Diseases".into(), "Neoplasms".into(), "Malaria".into()],
            rows([[10.0, 5.0, 0.0], [20.0, 5.0, 1.0], [30.0, 15.0, 0.0]]),
        )
        .unwrap();
        DashboardContext::from_tables(risk, causes)
    }

    fn params(entities: &[&str], categories: &[&str]) -> ViewParams {
        ViewParams {
            filter: FilterSpec::new(
                entities.iter().copied(),
                YearRange::new(2018, 2019).unwrap(),
                categories.iter().copied(),
            ),
            top_bar: 2,
            top_pie: 3,
            matrix_columns: 2,
            correlation_columns: 3,
            focus_category: Some(categories.first().copied().unwrap_or("Neoplasms").to_string()),
            detail_entity: Some("France".to_string()),
        }
    }

    #[test]
    fn causes_view_for_france() {
        let view = DatasetView::compute(
            &ctx(),
            DatasetKind::Causes,
            &params(&["France"], &["Cardiovascular Diseases"]),
        );
        assert_eq!(view.filtered.len(), 2);
        assert_eq!(
            view.top_bar.unwrap(),
            vec![
                ("Neoplasms".to_string(), 10.0),
                ("Cardiovascular Diseases".to_string(), 30.0)
            ]
        );
        assert_eq!(view.top_pie.unwrap().len(), 3);
        assert_eq!(view.trend_changes, vec![("Cardiovascular Diseases".to_string(), Some(100.0))]);

        let metrics = view.metrics.unwrap();
        assert_eq!(metrics.latest_year, Some(2019));
        assert_eq!(metrics.total_deaths(), 26.0);

        let matrix = view.entity_matrix.unwrap();
        assert_eq!(matrix["France"].len(), 2);

        let detail = view.detail.unwrap().unwrap();
        assert_eq!(detail.categories[0], "Cardiovascular Diseases");
        assert_eq!(detail.by_year.len(), 2);
    }

    #[test]
    fn unknown_selection_only_fails_its_view() {
        let view = DatasetView::compute(&ctx(), DatasetKind::RiskFactors, &params(&["France"], &["Neoplasms"]));
        assert!(view.trend.is_err());
        assert!(view.trend_changes.is_empty());
        assert!(matches!(view.focus, Some(Err(_))));
        assert!(view.top_bar.is_ok());
        assert!(view.metrics.is_ok());
    }

    #[test]
    fn empty_selection_degrades_to_empty_views() {
        let view = DatasetView::compute(&ctx(), DatasetKind::Causes, &params(&[], &[]));
        assert!(view.is_empty());
        assert!(view.top_bar.unwrap().iter().all(|(_, v)| *v == 0.0));
        assert!(view.trend.unwrap().is_empty());
        assert!(view.entity_matrix.unwrap().is_empty());
        assert_eq!(view.metrics.unwrap().latest_year, None);
        assert!(view.detail.unwrap().unwrap().by_year.is_empty());
    }

    #[test]
    fn focus_sorts_entities_ascending() {
        let view = DatasetView::compute(
            &ctx(),
            DatasetKind::Causes,
            &params(&["France", "Germany"], &["Neoplasms"]),
        );
        let focus = view.focus.unwrap().unwrap();
        assert_eq!(
            focus.by_entity,
            vec![("France".to_string(), 10.0), ("Germany".to_string(), 15.0)]
        );
        assert_eq!(focus.pivot[&2019].len(), 2);
    }

    #[test]
    fn compare_uses_leading_columns() {
        let p = params(&["France", "Germany"], &[]);
        let cmp = CompareView::compute(&ctx(), &p.filter.entities, 2);
        let risk = cmp.risk_factors.unwrap();
        assert_eq!(risk.len(), 2);
        assert_eq!(risk.get("Smoking"), Some(8.0));
        assert_eq!(cmp.causes.unwrap().get("Neoplasms"), Some(25.0));
    }

    #[test]
    fn compare_ignores_year_range() {
        let mut p = params(&["France"], &[]);
        p.filter.years = YearRange::new(2019, 2019).unwrap();
        let cmp = CompareView::compute(&ctx(), &p.filter.entities, 1);
        assert_eq!(cmp.risk_factors.unwrap().get("Smoking"), Some(3.0));
        assert_eq!(cmp.causes.unwrap().get("Cardiovascular Diseases"), Some(30.0));
    }

    #[test]
    fn compare_without_entities_is_zero() {
        let cmp = CompareView::compute(&ctx(), &BTreeSet::new(), 2);
        assert_eq!(cmp.causes.unwrap().grand_total(), 0.0);
    }
}
