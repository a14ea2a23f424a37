use std::collections::BTreeSet;
use std::path::Path;

use crate::color::ColorMap;
use crate::config::DashboardConfig;
use crate::data::{DashboardContext, DatasetKind, FilterSpec, Table, YearRange};
use crate::views::{CompareView, DatasetView, ViewParams};

// ---------------------------------------------------------------------------
// UI selections
// ---------------------------------------------------------------------------

/// Which dataset section(s) the central panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetChoice {
    RiskFactors,
    Causes,
    CompareBoth,
}

impl DatasetChoice {
    pub const ALL: [DatasetChoice; 3] = [
        DatasetChoice::RiskFactors,
        DatasetChoice::Causes,
        DatasetChoice::CompareBoth,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DatasetChoice::RiskFactors => "Risk Factors",
            DatasetChoice::Causes => "Causes of Death",
            DatasetChoice::CompareBoth => "Compare Both",
        }
    }

    pub fn shows(self, kind: DatasetKind) -> bool {
        match self {
            DatasetChoice::RiskFactors => kind == DatasetKind::RiskFactors,
            DatasetChoice::Causes => kind == DatasetKind::Causes,
            DatasetChoice::CompareBoth => true,
        }
    }
}

/// Chart tabs inside a dataset section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Overview,
    Trends,
    Comparison,
    Proportions,
    Analysis,
    DeepDive,
}

impl Tab {
    pub const ALL: [Tab; 6] = [
        Tab::Overview,
        Tab::Trends,
        Tab::Comparison,
        Tab::Proportions,
        Tab::Analysis,
        Tab::DeepDive,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::Trends => "Trends",
            Tab::Comparison => "Comparison",
            Tab::Proportions => "Proportions",
            Tab::Analysis => "Analysis",
            Tab::DeepDive => "Deep Dive",
        }
    }
}

/// Per-dataset selections.
#[derive(Debug, Clone)]
pub struct DatasetSelection {
    /// Categories tracked in the trend chart.
    pub categories: Vec<String>,
    /// Single category for the pivot / distribution / per-country charts.
    pub focus: Option<String>,
    pub tab: Tab,
}

impl DatasetSelection {
    fn from_defaults(table: &Table, defaults: &[String], preferred_focus: &str) -> Self {
        let categories = defaults
            .iter()
            .filter(|d| table.categories().contains(*d))
            .cloned()
            .collect();
        let focus = table
            .categories()
            .iter()
            .find(|c| c.as_str() == preferred_focus)
            .or_else(|| table.categories().first())
            .cloned();
        Self {
            categories,
            focus,
            tab: Tab::Overview,
        }
    }
}

/// Everything recomputed after an interaction.
#[derive(Debug, Clone)]
pub struct Views {
    pub risk_factors: DatasetView,
    pub causes: DatasetView,
    pub compare: CompareView,
}

impl Views {
    pub fn get(&self, kind: DatasetKind) -> &DatasetView {
        match kind {
            DatasetKind::RiskFactors => &self.risk_factors,
            DatasetKind::Causes => &self.causes,
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Both loaded tables. Set exactly once.
    pub context: Option<DashboardContext>,

    /// Blocking startup error shown instead of the dashboard.
    pub load_error: Option<String>,

    pub choice: DatasetChoice,
    pub entities: BTreeSet<String>,
    pub years: Option<YearRange>,
    pub risk_factors: DatasetSelection,
    pub causes: DatasetSelection,
    pub detail_entity: Option<String>,

    /// Country colours, stable across charts.
    pub color_map: ColorMap,

    /// Views for the current selections (cached until the next change).
    pub views: Option<Views>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            context: None,
            load_error: None,
            choice: DatasetChoice::RiskFactors,
            entities: BTreeSet::new(),
            years: None,
            risk_factors: DatasetSelection {
                categories: Vec::new(),
                focus: None,
                tab: Tab::Overview,
            },
            causes: DatasetSelection {
                categories: Vec::new(),
                focus: None,
                tab: Tab::Overview,
            },
            detail_entity: None,
            color_map: ColorMap::default(),
            views: None,
        }
    }

    /// Load both datasets from the configured paths.
    pub fn initialize(&mut self) {
        let risk = self.config.risk_factors_path.clone();
        let causes = self.config.causes_path.clone();
        self.initialize_from(&risk, &causes);
    }

    /// Load both datasets from explicit paths. Does nothing once a context exists.
    pub fn initialize_from(&mut self, risk_factors_path: &Path, causes_path: &Path) {
        if self.context.is_some() {
            log::warn!("Dashboard already initialised, ignoring reload request");
            return;
        }
        match DashboardContext::load(risk_factors_path, causes_path) {
            Ok(ctx) => self.set_context(ctx),
            Err(e) => {
                log::error!("Failed to load datasets: {e}");
                self.load_error = Some(format!("Error loading data: {e}"));
            }
        }
    }

    /// Ingest the loaded tables, apply default selections and compute views.
    pub fn set_context(&mut self, ctx: DashboardContext) {
        let Some(bounds) = ctx.year_bounds() else {
            log::error!("Datasets share no years");
            self.load_error = Some("Error loading data: the two datasets share no years".into());
            return;
        };

        self.entities = self
            .config
            .default_entities
            .iter()
            .filter(|e| ctx.entities().contains(*e))
            .cloned()
            .collect();
        self.years = Some(bounds);
        self.risk_factors = DatasetSelection::from_defaults(
            ctx.table(DatasetKind::RiskFactors),
            &self.config.default_risk_factors,
            "",
        );
        self.causes = DatasetSelection::from_defaults(
            ctx.table(DatasetKind::Causes),
            &self.config.default_causes,
            "Cardiovascular Diseases",
        );
        self.color_map = ColorMap::new(ctx.entities());
        self.detail_entity = self.entities.iter().next().cloned();

        self.context = Some(ctx);
        self.load_error = None;
        self.recompute();
    }

    pub fn selection(&self, kind: DatasetKind) -> &DatasetSelection {
        match kind {
            DatasetKind::RiskFactors => &self.risk_factors,
            DatasetKind::Causes => &self.causes,
        }
    }

    pub fn selection_mut(&mut self, kind: DatasetKind) -> &mut DatasetSelection {
        match kind {
            DatasetKind::RiskFactors => &mut self.risk_factors,
            DatasetKind::Causes => &mut self.causes,
        }
    }

    /// Current constraints for one dataset.
    pub fn filter_spec(&self, kind: DatasetKind) -> Option<FilterSpec> {
        Some(FilterSpec {
            entities: self.entities.clone(),
            years: self.years?,
            categories: self.selection(kind).categories.clone(),
        })
    }

    fn view_params(&self, kind: DatasetKind) -> Option<ViewParams> {
        let cfg = &self.config;
        let (top_bar, top_pie, matrix_columns) = match kind {
            DatasetKind::RiskFactors => (cfg.top_bar_risk, cfg.top_pie_risk, cfg.heatmap_columns),
            DatasetKind::Causes => (cfg.top_bar_causes, cfg.top_pie_causes, cfg.treemap_columns),
        };
        Some(ViewParams {
            filter: self.filter_spec(kind)?,
            top_bar,
            top_pie,
            matrix_columns,
            correlation_columns: cfg.correlation_columns,
            focus_category: self.selection(kind).focus.clone(),
            detail_entity: self.detail_entity.clone(),
        })
    }

    /// Recompute every view from the loaded tables and current selections.
    pub fn recompute(&mut self) {
        let Some(ctx) = &self.context else {
            return;
        };
        let (Some(risk), Some(causes)) = (
            self.view_params(DatasetKind::RiskFactors),
            self.view_params(DatasetKind::Causes),
        ) else {
            return;
        };
        log::debug!(
            "Recomputing views: {} entities, years {:?}",
            self.entities.len(),
            self.years
        );
        self.views = Some(Views {
            compare: CompareView::compute(ctx, &risk.filter.entities, self.config.compare_columns),
            risk_factors: DatasetView::compute(ctx, DatasetKind::RiskFactors, &risk),
            causes: DatasetView::compute(ctx, DatasetKind::Causes, &causes),
        });
    }

    // -- interactions --

    /// Toggle a single country in the selection.
    pub fn toggle_entity(&mut self, entity: &str) {
        if !self.entities.remove(entity) {
            self.entities.insert(entity.to_string());
        }
        self.fix_detail_entity();
        self.recompute();
    }

    /// Select every country present in both datasets.
    pub fn select_all_entities(&mut self) {
        if let Some(ctx) = &self.context {
            self.entities = ctx.entities().iter().cloned().collect();
            self.fix_detail_entity();
            self.recompute();
        }
    }

    /// Deselect every country.
    pub fn select_no_entities(&mut self) {
        self.entities.clear();
        self.fix_detail_entity();
        self.recompute();
    }

    /// Set the year interval, clamped to the years both datasets cover.
    pub fn set_years(&mut self, start: i32, end: i32) {
        let (Some(ctx), Some(range)) = (&self.context, YearRange::new(start.min(end), start.max(end))) else {
            return;
        };
        self.years = Some(ctx.clamp_years(range));
        self.recompute();
    }

    /// Add or remove a tracked category of one dataset.
    pub fn toggle_category(&mut self, kind: DatasetKind, category: &str) {
        let selected = &mut self.selection_mut(kind).categories;
        if let Some(pos) = selected.iter().position(|c| c == category) {
            selected.remove(pos);
        } else {
            selected.push(category.to_string());
        }
        self.recompute();
    }

    pub fn set_focus(&mut self, kind: DatasetKind, category: String) {
        self.selection_mut(kind).focus = Some(category);
        self.recompute();
    }

    pub fn set_detail_entity(&mut self, entity: String) {
        self.detail_entity = Some(entity);
        self.recompute();
    }

    /// Keep the detail country inside the current selection.
    fn fix_detail_entity(&mut self) {
        let still_selected = self
            .detail_entity
            .as_ref()
            .is_some_and(|e| self.entities.contains(e));
        if !still_selected {
            self.detail_entity = self.entities.iter().next().cloned();
        }
    }
}
