use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::color::{ColorMap, Scale};
use crate::data::metrics::{format_thousands, truncate_label, HeadlineMetrics};
use crate::data::DatasetKind;
use crate::state::{AppState, DatasetChoice, DatasetSelection, Tab};
use crate::views::{DatasetView, ViewResult};

use super::plot;

const CHART_HEIGHT: f32 = 420.0;
const NO_DATA: &str = "No data available for the selected filters. Please adjust your selection.";

/// A user interaction collected while drawing, applied afterwards.
enum Action {
    SetTab(DatasetKind, Tab),
    SetFocus(DatasetKind, String),
    SetDetailEntity(String),
}

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

pub fn central_panel(ui: &mut Ui, state: &mut AppState) {
    let actions = draw(ui, state);
    for action in actions {
        match action {
            Action::SetTab(kind, tab) => state.selection_mut(kind).tab = tab,
            Action::SetFocus(kind, category) => state.set_focus(kind, category),
            Action::SetDetailEntity(entity) => state.set_detail_entity(entity),
        }
    }
}

fn draw(ui: &mut Ui, state: &AppState) -> Vec<Action> {
    let mut actions = Vec::new();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.vertical_centered(|ui: &mut Ui| {
                ui.heading(RichText::new("Global Death Analysis Dashboard").size(28.0).strong());
                ui.label("Risk Factors & Causes of Death (1990–2019)");
            });
            ui.separator();

            let Some(views) = &state.views else {
                ui.label("No dataset loaded.");
                return;
            };

            for kind in DatasetKind::ALL {
                if state.choice.shows(kind) {
                    dataset_section(ui, state, views.get(kind), &mut actions);
                    ui.separator();
                }
            }

            if state.choice == DatasetChoice::CompareBoth {
                ui.heading("Risk Factors vs Causes");
                ui.columns(2, |cols| {
                    cols[0].strong("Risk Factors Summary (all years)");
                    show_or_warn(&mut cols[0], &views.compare.risk_factors, |ui, totals| {
                        plot::vertical_bars(ui, "compare_risk", totals, Scale::Viridis, 320.0)
                    });
                    cols[1].strong("Causes Summary (all years)");
                    show_or_warn(&mut cols[1], &views.compare.causes, |ui, totals| {
                        plot::vertical_bars(ui, "compare_causes", totals, Scale::Reds, 320.0)
                    });
                });
            }
        });

    actions
}

/// Draw a view, or a warning if its computation failed.
fn show_or_warn<T>(ui: &mut Ui, view: &ViewResult<T>, draw: impl FnOnce(&mut Ui, &T)) {
    match view {
        Ok(v) => draw(ui, v),
        Err(e) => {
            ui.colored_label(Color32::YELLOW, format!("Chart unavailable: {e}"));
        }
    }
}

// ---------------------------------------------------------------------------
// One dataset section
// ---------------------------------------------------------------------------

fn dataset_section(ui: &mut Ui, state: &AppState, view: &DatasetView, actions: &mut Vec<Action>) {
    let kind = view.kind;
    ui.heading(match kind {
        DatasetKind::RiskFactors => "Risk Factors Analysis",
        DatasetKind::Causes => "Causes of Death Analysis",
    });
    ui.label(match kind {
        DatasetKind::RiskFactors => {
            "Deaths attributable to risk factors like air pollution, smoking, diet, and lifestyle choices."
        }
        DatasetKind::Causes => {
            "Deaths by specific medical causes like cardiovascular diseases, cancer, infectious diseases, and more."
        }
    });

    if view.is_empty() {
        ui.colored_label(Color32::YELLOW, NO_DATA);
        return;
    }

    show_or_warn(ui, &view.metrics, |ui, m| metrics_row(ui, state, kind, m));
    ui.separator();

    let selection = state.selection(kind);
    ui.horizontal(|ui: &mut Ui| {
        for tab in Tab::ALL {
            if ui.selectable_label(selection.tab == tab, tab.label()).clicked() {
                actions.push(Action::SetTab(kind, tab));
            }
        }
    });
    ui.add_space(6.0);

    match selection.tab {
        Tab::Overview => overview_tab(ui, view),
        Tab::Trends => trends_tab(ui, view, selection),
        Tab::Comparison => comparison_tab(ui, view, selection, actions),
        Tab::Proportions => {
            ui.strong("Proportional View");
            show_or_warn(ui, &view.entity_matrix, |ui, m| plot::treemap(ui, m, CHART_HEIGHT));
        }
        Tab::Analysis => analysis_tab(ui, view, selection, &state.color_map, actions),
        Tab::DeepDive => deep_dive_tab(ui, state, view, actions),
    }
}

fn metrics_row(ui: &mut Ui, state: &AppState, kind: DatasetKind, m: &HeadlineMetrics) {
    let year = m.latest_year.map(|y| format!("Year {y}")).unwrap_or_default();
    let top = m.top_category().map(|c| truncate_label(c, 25)).unwrap_or_default();
    let years_covered = state.years.map_or(0, |y| y.len());

    let cards: [(String, String, String); 4] = match kind {
        DatasetKind::RiskFactors => [
            ("Total Deaths (Latest Year)".into(), format_thousands(m.total_deaths()), year),
            ("Top Risk Factor".into(), top, String::new()),
            ("Countries Analyzed".into(), state.entities.len().to_string(), String::new()),
            ("Years Covered".into(), years_covered.to_string(), String::new()),
        ],
        DatasetKind::Causes => {
            let third: (String, String, String) = match m.keyword_share(&["Cardio", "Heart"]) {
                Some(pct) => ("Cardiovascular %".into(), format!("{pct:.1}%"), String::new()),
                None => ("Countries".into(), state.entities.len().to_string(), String::new()),
            };
            let fourth: (String, String, String) = match m.keyword_total(&["Neoplasm", "Cancer"]) {
                Some(total) => ("Cancer Deaths".into(), format_thousands(total), String::new()),
                None => (
                    "Causes Tracked".into(),
                    m.latest_totals.len().to_string(),
                    String::new(),
                ),
            };
            [
                ("Total Deaths (Latest Year)".into(), format_thousands(m.total_deaths()), year),
                ("Leading Cause".into(), top, String::new()),
                third,
                fourth,
            ]
        }
    };

    ui.columns(4, |cols| {
        for (col, (label, value, delta)) in cols.iter_mut().zip(cards) {
            col.group(|ui: &mut Ui| {
                ui.label(RichText::new(label).weak());
                ui.label(RichText::new(value).size(22.0).strong());
                if !delta.is_empty() {
                    ui.label(RichText::new(delta).color(Color32::LIGHT_GREEN));
                }
            });
        }
    });
}

fn bar_scale(kind: DatasetKind) -> Scale {
    match kind {
        DatasetKind::RiskFactors => Scale::Viridis,
        DatasetKind::Causes => Scale::Reds,
    }
}

// ---------------------------------------------------------------------------
// Tabs
// ---------------------------------------------------------------------------

fn overview_tab(ui: &mut Ui, view: &DatasetView) {
    let kind = view.kind;
    ui.columns(2, |cols| {
        cols[0].strong(match kind {
            DatasetKind::RiskFactors => "Top Risk Factors",
            DatasetKind::Causes => "Leading Causes of Death",
        });
        show_or_warn(&mut cols[0], &view.top_bar, |ui, items| {
            plot::horizontal_bars(ui, &format!("{kind:?}_top_bar"), items, bar_scale(kind), CHART_HEIGHT)
        });

        cols[1].strong(match kind {
            DatasetKind::RiskFactors => "Risk Factor Distribution",
            DatasetKind::Causes => "Death Cause Categories",
        });
        let hole = match kind {
            DatasetKind::RiskFactors => 0.4,
            DatasetKind::Causes => 0.5,
        };
        show_or_warn(&mut cols[1], &view.top_pie, |ui, items| plot::donut(ui, items, hole, 360.0));
    });
}

fn trends_tab(ui: &mut Ui, view: &DatasetView, selection: &DatasetSelection) {
    ui.strong(format!("{} Trends Over Time", view.kind));
    if selection.categories.is_empty() {
        ui.label("Select categories in the side panel to track them over time.");
        return;
    }
    show_or_warn(ui, &view.trend, |ui, by_year| {
        plot::trend_lines(
            ui,
            &format!("{:?}_trend", view.kind),
            by_year,
            &selection.categories,
            CHART_HEIGHT,
        )
    });

    ui.strong("Change Over Selected Period");
    for (category, change) in view.trend_changes.iter().take(3) {
        if let Some(pct) = change {
            let arrow = if *pct > 0.0 { "▲" } else { "▼" };
            ui.label(format!("{category}: {arrow} {pct:+.1}%"));
        }
    }
}

fn focus_picker(ui: &mut Ui, view: &DatasetView, selection: &DatasetSelection, actions: &mut Vec<Action>) {
    let current = selection.focus.clone().unwrap_or_default();
    egui::ComboBox::from_id_salt(format!("{:?}_focus", view.kind))
        .selected_text(&current)
        .show_ui(ui, |ui: &mut Ui| {
            for category in view.filtered.categories() {
                if ui.selectable_label(current == *category, category).clicked() {
                    actions.push(Action::SetFocus(view.kind, category.clone()));
                }
            }
        });
}

fn comparison_tab(ui: &mut Ui, view: &DatasetView, selection: &DatasetSelection, actions: &mut Vec<Action>) {
    ui.strong("Country Comparison");
    show_or_warn(ui, &view.entity_matrix, |ui, m| plot::heatmap(ui, m, CHART_HEIGHT));

    ui.add_space(8.0);
    ui.strong("Deaths by Country");
    focus_picker(ui, view, selection, actions);
    if let Some(focus) = &view.focus {
        show_or_warn(ui, focus, |ui, f| {
            plot::horizontal_bars(
                ui,
                &format!("{:?}_by_entity", view.kind),
                &f.by_entity,
                Scale::Heat,
                CHART_HEIGHT,
            )
        });
    }
}

fn analysis_tab(
    ui: &mut Ui,
    view: &DatasetView,
    selection: &DatasetSelection,
    color_map: &ColorMap,
    actions: &mut Vec<Action>,
) {
    ui.strong("Detailed Analysis");
    focus_picker(ui, view, selection, actions);
    let Some(focus) = &view.focus else {
        return;
    };
    show_or_warn(ui, focus, |ui, f| {
        ui.columns(2, |cols| {
            plot::pivot_area(
                &mut cols[0],
                &format!("{:?}_pivot", view.kind),
                &f.pivot,
                color_map,
                CHART_HEIGHT,
            );
            cols[1].strong(format!("Distribution of {}", f.category));
            plot::box_plot(
                &mut cols[1],
                &format!("{:?}_box", view.kind),
                &f.distribution,
                color_map,
                CHART_HEIGHT,
            );
        });
    });
}

fn deep_dive_tab(ui: &mut Ui, state: &AppState, view: &DatasetView, actions: &mut Vec<Action>) {
    ui.columns(2, |cols| {
        cols[0].strong("Correlation Between Categories");
        show_or_warn(&mut cols[0], &view.correlation, |ui, m| plot::correlation(ui, m, 450.0));

        let ui = &mut cols[1];
        ui.strong("Year-by-Year Breakdown");
        let current = state.detail_entity.clone().unwrap_or_default();
        egui::ComboBox::from_id_salt(format!("{:?}_detail", view.kind))
            .selected_text(&current)
            .show_ui(ui, |ui: &mut Ui| {
                for entity in &state.entities {
                    if ui.selectable_label(current == *entity, entity).clicked() {
                        actions.push(Action::SetDetailEntity(entity.clone()));
                    }
                }
            });
        if let Some(detail) = &view.detail {
            show_or_warn(ui, detail, |ui, d| {
                ui.label(format!("Top {} in {}", d.categories.len(), d.entity));
                let years: Vec<i32> = d.by_year.iter().map(|y| y.year).collect();
                let series: Vec<(String, Vec<f64>)> = d
                    .categories
                    .iter()
                    .map(|c| {
                        let values = d.by_year.iter().map(|y| y.totals.get(c).unwrap_or(0.0)).collect();
                        (c.clone(), values)
                    })
                    .collect();
                let palette = crate::color::generate_palette(series.len());
                plot::stacked_area(
                    ui,
                    &format!("{:?}_detail_area", view.kind),
                    &years,
                    &series,
                    |i, _| palette[i],
                    400.0,
                );
                egui::CollapsingHeader::new("Data table")
                    .id_salt(format!("{:?}_detail_table", view.kind))
                    .show(ui, |ui: &mut Ui| breakdown_table(ui, view.kind, &years, &series));
            });
        }
    });
}

/// Year rows by category columns, values with thousands separators.
fn breakdown_table(ui: &mut Ui, kind: DatasetKind, years: &[i32], series: &[(String, Vec<f64>)]) {
    use egui_extras::{Column, TableBuilder};

    TableBuilder::new(ui)
        .id_salt(format!("{kind:?}_breakdown"))
        .striped(true)
        .vscroll(false)
        .column(Column::auto().at_least(48.0))
        .columns(Column::remainder().at_least(72.0), series.len())
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("Year");
            });
            for (name, _) in series {
                header.col(|ui| {
                    ui.strong(truncate_label(name, 14)).on_hover_text(name);
                });
            }
        })
        .body(|mut body| {
            for (row_idx, year) in years.iter().enumerate() {
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        ui.label(year.to_string());
                    });
                    for (_, values) in series {
                        row.col(|ui| {
                            ui.label(format_thousands(values[row_idx]));
                        });
                    }
                });
            }
        });
}
