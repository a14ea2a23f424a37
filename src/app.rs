use eframe::egui;

use crate::config::DashboardConfig;
use crate::state::AppState;
use crate::ui::{dashboard, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct MortalityDashApp {
    pub state: AppState,
}

impl MortalityDashApp {
    /// Build the app and load both datasets once.
    pub fn new(config: DashboardConfig) -> Self {
        let mut state = AppState::new(config);
        state.initialize();
        Self { state }
    }
}

impl eframe::App for MortalityDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // No partial dashboard without data.
        if self.state.context.is_none() {
            egui::CentralPanel::default().show(ctx, |ui| {
                panels::load_error_screen(ui, &mut self.state);
            });
            return;
        }

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            dashboard::central_panel(ui, &mut self.state);
        });
    }
}
