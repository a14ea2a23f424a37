use std::path::PathBuf;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::DatasetKind;
use crate::state::{AppState, DatasetChoice};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left control panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Dashboard Controls");
    ui.separator();

    let Some(ctx) = &state.context else {
        ui.label("No dataset loaded.");
        return;
    };

    // Clone what we need so we can mutate state inside the loop.
    let all_entities = ctx.entities().to_vec();
    let bounds = ctx.year_bounds();
    let risk_categories = ctx.table(DatasetKind::RiskFactors).categories().to_vec();
    let cause_categories = ctx.table(DatasetKind::Causes).categories().to_vec();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Dataset selection ----
            ui.strong("Select Dataset");
            for choice in DatasetChoice::ALL {
                ui.radio_value(&mut state.choice, choice, choice.label());
            }
            ui.separator();

            // ---- Year range ----
            if let (Some(bounds), Some(years)) = (bounds, state.years) {
                ui.strong("Time Period");
                let mut start = years.start();
                let mut end = years.end();
                let mut changed = false;
                changed |= ui
                    .add(egui::Slider::new(&mut start, bounds.start()..=bounds.end()).text("From"))
                    .changed();
                changed |= ui
                    .add(egui::Slider::new(&mut end, bounds.start()..=bounds.end()).text("To"))
                    .changed();
                if changed {
                    state.set_years(start, end);
                }
                ui.separator();
            }

            // ---- Countries ----
            let header = format!("Countries  ({}/{})", state.entities.len(), all_entities.len());
            egui::CollapsingHeader::new(RichText::new(header).strong())
                .id_salt("countries")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            state.select_all_entities();
                        }
                        if ui.small_button("None").clicked() {
                            state.select_no_entities();
                        }
                    });
                    for entity in &all_entities {
                        let mut checked = state.entities.contains(entity);
                        let text = RichText::new(entity).color(state.color_map.color_for(entity));
                        if ui.checkbox(&mut checked, text).changed() {
                            state.toggle_entity(entity);
                        }
                    }
                });
            ui.separator();

            // ---- Categories ----
            category_picker(ui, state, DatasetKind::Causes, "Causes of Death", &cause_categories);
            category_picker(ui, state, DatasetKind::RiskFactors, "Risk Factors", &risk_categories);
        });
}

fn category_picker(ui: &mut Ui, state: &mut AppState, kind: DatasetKind, title: &str, all: &[String]) {
    let selected = state.selection(kind).categories.clone();
    let header = format!("{title}  ({}/{})", selected.len(), all.len());
    egui::CollapsingHeader::new(RichText::new(header).strong())
        .id_salt(title)
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            for category in all {
                let mut checked = selected.contains(category);
                if ui.checkbox(&mut checked, category).changed() {
                    state.toggle_category(kind, category);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            let can_locate = state.context.is_none();
            if ui
                .add_enabled(can_locate, egui::Button::new("Locate data files…"))
                .clicked()
            {
                locate_data_files(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(views) = &state.views {
            ui.label(format!(
                "{} risk-factor rows, {} cause rows visible",
                views.risk_factors.filtered.len(),
                views.causes.filtered.len()
            ));
        }
    });
}

// ---------------------------------------------------------------------------
// Startup failure
// ---------------------------------------------------------------------------

/// Blocking error screen shown while no dataset could be loaded.
pub fn load_error_screen(ui: &mut Ui, state: &mut AppState) {
    let message = state.load_error.clone().unwrap_or_default();
    ui.vertical_centered(|ui: &mut Ui| {
        ui.add_space(80.0);
        ui.heading("Global Death Analysis Dashboard");
        ui.add_space(20.0);
        ui.label(RichText::new(message).color(Color32::RED));
        ui.add_space(20.0);
        if ui.button("Locate data files…").clicked() {
            locate_data_files(state);
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

fn pick_csv(title: &str) -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title(title)
        .add_filter("CSV", &["csv"])
        .pick_file()
}

/// Ask for both dataset files and perform the one-time load.
pub fn locate_data_files(state: &mut AppState) {
    let Some(risk) = pick_csv("Open risk factors dataset") else {
        return;
    };
    let Some(causes) = pick_csv("Open causes of death dataset") else {
        return;
    };
    state.initialize_from(&risk, &causes);
}
