//! Aggregate views over a (usually filtered) [`Table`].
//!
//! Every function here is pure: it reads the table, resolves the requested
//! categories against the schema and returns a fresh view. Unknown category
//! names fail with [`UnknownCategoryError`]; empty tables and empty
//! category lists are not errors and produce zero / empty results.

use std::collections::BTreeMap;

use super::error::UnknownCategoryError;
use super::model::{CategoryId, MortalityRecord, Table};

// ---------------------------------------------------------------------------
// CategoryTotals – category → total, in request order
// ---------------------------------------------------------------------------

/// Per-category totals. Iteration order is the order categories were
/// requested in, which `top_n` relies on for tie-breaking.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryTotals {
    entries: Vec<(String, f64)>,
}

impl CategoryTotals {
    pub fn get(&self, category: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(name, v)| (name.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum over all categories.
    pub fn grand_total(&self) -> f64 {
        self.entries.iter().map(|(_, v)| v).sum()
    }

    /// Category with the largest total; the first one wins on ties.
    pub fn max(&self) -> Option<(&str, f64)> {
        self.iter()
            .fold(None, |best: Option<(&str, f64)>, (name, v)| match best {
                Some((_, bv)) if bv >= v => best,
                _ => Some((name, v)),
            })
    }

    fn from_sums(table: &Table, ids: &[CategoryId], sums: Vec<f64>) -> Self {
        let entries = ids
            .iter()
            .zip(sums)
            .map(|(id, v)| (table.category_name(*id).to_string(), v))
            .collect();
        Self { entries }
    }
}

impl FromIterator<(String, f64)> for CategoryTotals {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Sums
// ---------------------------------------------------------------------------

/// Add one record's requested values onto running sums.
fn accumulate(sums: &mut [f64], rec: &MortalityRecord, ids: &[CategoryId]) {
    for (sum, id) in sums.iter_mut().zip(ids) {
        *sum += rec.value(*id);
    }
}

/// Total of each requested category across all records.
pub fn sum_by_category<S: AsRef<str>>(
    table: &Table,
    categories: &[S],
) -> Result<CategoryTotals, UnknownCategoryError> {
    let ids = table.resolve(categories)?;
    let mut sums = vec![0.0; ids.len()];
    for rec in table.records() {
        accumulate(&mut sums, rec, &ids);
    }
    Ok(CategoryTotals::from_sums(table, &ids, sums))
}

/// Per-year totals, years ascending.
#[derive(Debug, Clone, PartialEq)]
pub struct YearTotals {
    pub year: i32,
    pub totals: CategoryTotals,
}

/// Group records by year and sum each requested category within the group.
pub fn sum_by_year<S: AsRef<str>>(
    table: &Table,
    categories: &[S],
) -> Result<Vec<YearTotals>, UnknownCategoryError> {
    let ids = table.resolve(categories)?;
    let mut groups: BTreeMap<i32, Vec<f64>> = BTreeMap::new();
    for rec in table.records() {
        let sums = groups.entry(rec.year).or_insert_with(|| vec![0.0; ids.len()]);
        accumulate(sums, rec, &ids);
    }
    Ok(groups
        .into_iter()
        .map(|(year, sums)| YearTotals {
            year,
            totals: CategoryTotals::from_sums(table, &ids, sums),
        })
        .collect())
}

/// Group records by entity and sum each requested category, entities sorted.
pub fn sum_by_entity<S: AsRef<str>>(
    table: &Table,
    categories: &[S],
) -> Result<BTreeMap<String, CategoryTotals>, UnknownCategoryError> {
    let ids = table.resolve(categories)?;
    let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for rec in table.records() {
        let sums = groups
            .entry(rec.entity.as_str())
            .or_insert_with(|| vec![0.0; ids.len()]);
        accumulate(sums, rec, &ids);
    }
    Ok(groups
        .into_iter()
        .map(|(entity, sums)| (entity.to_string(), CategoryTotals::from_sums(table, &ids, sums)))
        .collect())
}

/// `year → {entity → value}` for one category. Duplicate entity-year rows
/// are summed.
pub type EntityYearPivot = BTreeMap<i32, BTreeMap<String, f64>>;

pub fn pivot_entity_year(table: &Table, category: &str) -> Result<EntityYearPivot, UnknownCategoryError> {
    let id = table.category(category)?;
    let mut pivot = EntityYearPivot::new();
    for rec in table.records() {
        *pivot
            .entry(rec.year)
            .or_default()
            .entry(rec.entity.clone())
            .or_insert(0.0) += rec.value(id);
    }
    Ok(pivot)
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// The `n` largest (or smallest) totals. Stable: ties keep category order.
pub fn top_n(totals: &CategoryTotals, n: usize, order: SortOrder) -> Vec<(String, f64)> {
    let mut ranked: Vec<(String, f64)> = totals.iter().map(|(c, v)| (c.to_string(), v)).collect();
    match order {
        SortOrder::Ascending => ranked.sort_by(|a, b| a.1.total_cmp(&b.1)),
        SortOrder::Descending => ranked.sort_by(|a, b| b.1.total_cmp(&a.1)),
    }
    ranked.truncate(n);
    ranked
}

/// Percent change of a category between two years of a `sum_by_year` view.
///
/// `None` unless both years are present and the first value is positive.
pub fn percent_change(by_year: &[YearTotals], category: &str, from: i32, to: i32) -> Option<f64> {
    let value_at = |year: i32| {
        by_year
            .iter()
            .find(|y| y.year == year)
            .and_then(|y| y.totals.get(category))
    };
    let first = value_at(from)?;
    let last = value_at(to)?;
    (first > 0.0).then(|| (last - first) / first * 100.0)
}

// ---------------------------------------------------------------------------
// Correlation
// ---------------------------------------------------------------------------

/// Square matrix of Pearson coefficients indexed by category.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub categories: Vec<String>,
    values: Vec<f64>,
}

impl CorrelationMatrix {
    /// Coefficient at `(row, col)`; NaN when undefined.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.categories.len() + col]
    }

    /// Coefficient looked up by category names.
    pub fn between(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.categories.iter().position(|c| c == a)?;
        let j = self.categories.iter().position(|c| c == b)?;
        Some(self.get(i, j))
    }

    pub fn size(&self) -> usize {
        self.categories.len()
    }
}

/// Sample Pearson correlation between every pair of requested categories.
///
/// A category with zero variance (or a table with fewer than two rows)
/// yields NaN for every pair it is part of, including its diagonal cell.
/// Any other diagonal cell is exactly 1.
pub fn correlation_matrix<S: AsRef<str>>(
    table: &Table,
    categories: &[S],
) -> Result<CorrelationMatrix, UnknownCategoryError> {
    let ids = table.resolve(categories)?;
    let k = ids.len();
    let n = table.len();

    let columns: Vec<Vec<f64>> = ids
        .iter()
        .map(|id| table.records().iter().map(|r| r.value(*id)).collect())
        .collect();
    let means: Vec<f64> = columns
        .iter()
        .map(|col| col.iter().sum::<f64>() / n as f64)
        .collect();

    let varies: Vec<bool> = columns
        .iter()
        .map(|col| col.iter().any(|v| *v != col[0]))
        .collect();

    let mut values = vec![f64::NAN; k * k];
    if n >= 2 {
        for i in (0..k).filter(|&i| varies[i]) {
            values[i * k + i] = 1.0;
            for j in (i + 1..k).filter(|&j| varies[j]) {
                let r = pearson(&columns[i], means[i], &columns[j], means[j]);
                values[i * k + j] = r;
                values[j * k + i] = r;
            }
        }
    }

    Ok(CorrelationMatrix {
        categories: ids.iter().map(|id| table.category_name(*id).to_string()).collect(),
        values,
    })
}

fn pearson(x: &[f64], mean_x: f64, y: &[f64], mean_y: f64) -> f64 {
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (a, b) in x.iter().zip(y) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return f64::NAN;
    }
    (sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0)
}

// ---------------------------------------------------------------------------
// Distribution
// ---------------------------------------------------------------------------

/// Five-number summary of one entity's values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxStats {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl BoxStats {
    /// `None` for an empty sample.
    pub fn from_values(mut values: Vec<f64>) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        values.sort_by(f64::total_cmp);
        Some(Self {
            min: values[0],
            q1: quantile(&values, 0.25),
            median: quantile(&values, 0.5),
            q3: quantile(&values, 0.75),
            max: values[values.len() - 1],
        })
    }
}

/// Linear-interpolated quantile of sorted, non-empty data.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Per-entity distribution of one category over the table's years.
pub fn entity_distribution(
    table: &Table,
    category: &str,
) -> Result<BTreeMap<String, BoxStats>, UnknownCategoryError> {
    let id = table.category(category)?;
    let mut samples: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for rec in table.records() {
        samples.entry(rec.entity.as_str()).or_default().push(rec.value(id));
    }
    Ok(samples
        .into_iter()
        .filter_map(|(entity, vals)| BoxStats::from_values(vals).map(|s| (entity.to_string(), s)))
        .collect())
}
