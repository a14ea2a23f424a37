use std::path::Path;

use super::error::LoadError;
use super::filter::YearRange;
use super::loader::load_kind;
use super::model::{DatasetKind, Table};

// ---------------------------------------------------------------------------
// DashboardContext – the two loaded tables, built once per process
// ---------------------------------------------------------------------------

/// Immutable session data: both datasets plus the entity list and year
/// bounds they have in common.
#[derive(Debug, Clone)]
pub struct DashboardContext {
    risk_factors: Table,
    causes: Table,
    entities: Vec<String>,
    year_bounds: Option<YearRange>,
}

impl DashboardContext {
    /// Read both dataset files. Either failing aborts the whole load.
    pub fn load(risk_factors_path: &Path, causes_path: &Path) -> Result<Self, LoadError> {
        let risk_factors = load_kind(risk_factors_path, DatasetKind::RiskFactors)?;
        let causes = load_kind(causes_path, DatasetKind::Causes)?;
        Ok(Self::from_tables(risk_factors, causes))
    }

    pub fn from_tables(risk_factors: Table, causes: Table) -> Self {
        let causes_entities = causes.entities();
        let entities: Vec<String> = risk_factors
            .entities()
            .into_iter()
            .filter(|e| causes_entities.contains(e))
            .collect();

        let span = |t: &Table| t.year_span().and_then(|(a, b)| YearRange::new(a, b));
        let year_bounds = match (span(&risk_factors), span(&causes)) {
            (Some(a), Some(b)) => a.intersect(b),
            _ => None,
        };

        log::debug!(
            "Dashboard context: {} shared entities, years {:?}",
            entities.len(),
            year_bounds
        );

        Self {
            risk_factors,
            causes,
            entities,
            year_bounds,
        }
    }

    pub fn table(&self, kind: DatasetKind) -> &Table {
        match kind {
            DatasetKind::RiskFactors => &self.risk_factors,
            DatasetKind::Causes => &self.causes,
        }
    }

    /// Entities present in both datasets, sorted.
    pub fn entities(&self) -> &[String] {
        &self.entities
    }

    /// Years observed in both datasets; `None` if they do not overlap.
    pub fn year_bounds(&self) -> Option<YearRange> {
        self.year_bounds
    }

    /// Clamp a user-chosen range into [`Self::year_bounds`].
    pub fn clamp_years(&self, years: YearRange) -> YearRange {
        match self.year_bounds {
            Some(bounds) => bounds.clamp(years),
            None => years,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::MortalityRecord;

    fn table(kind: DatasetKind, rows: &[(&str, i32)]) -> Table {
        Table::new(
            kind,
            vec!["A".into()],
            rows.iter()
                .map(|(e, y)| MortalityRecord::new(*e, None, *y, vec![1.0]))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn shared_entities_and_years() {
        let ctx = DashboardContext::from_tables(
            table(DatasetKind::RiskFactors, &[("France", 1990), ("Japan", 2019), ("World", 2019)]),
            table(DatasetKind::Causes, &[("Japan", 1995), ("France", 2015), ("Chad", 2015)]),
        );
        assert_eq!(ctx.entities(), ["France", "Japan"]);
        assert_eq!(ctx.year_bounds(), YearRange::new(1995, 2015));
        assert_eq!(
            ctx.clamp_years(YearRange::new(1990, 2019).unwrap()),
            YearRange::new(1995, 2015).unwrap()
        );
    }

    #[test]
    fn disjoint_years_have_no_bounds() {
        let ctx = DashboardContext::from_tables(
            table(DatasetKind::RiskFactors, &[("France", 1990)]),
            table(DatasetKind::Causes, &[("France", 2000)]),
        );
        assert_eq!(ctx.year_bounds(), None);
    }
}
