use eframe::egui;
use mortality_dash::app::MortalityDashApp;
use mortality_dash::config::DashboardConfig;

fn main() -> eframe::Result {
    env_logger::init();

    let config = match DashboardConfig::discover() {
        Ok(config) => config,
        Err(e) => {
            log::error!("{e}; falling back to default configuration");
            DashboardConfig::default()
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Global Death Analysis Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(MortalityDashApp::new(config)))),
    )
}
