use eframe::egui;
use penguins_dashboard::app::PenguinsApp;
use penguins_dashboard::config::DashboardConfig;

fn main() -> eframe::Result {
    env_logger::init();

    let config = match DashboardConfig::load() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration, using defaults: {e:#}");
            DashboardConfig::default()
        }
    };

    let app = match PenguinsApp::new(&config) {
        Ok(app) => app,
        Err(e) => {
            log::error!("Failed to start dashboard: {e:#}");
            return Err(eframe::Error::AppCreation(e.into()));
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(&config.title)
            .with_inner_size(config.window_size)
            .with_min_inner_size(config.min_window_size),
        ..Default::default()
    };

    eframe::run_native(
        &config.title,
        options,
        Box::new(|_cc| Ok(Box::new(app))),
    )
}
