mod app;
mod config;
mod data;
mod error;
mod state;
mod ui;

use app::FramePairApp;
use config::ViewerConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = ViewerConfig::default();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size(config.min_window_size),
        ..Default::default()
    };

    eframe::run_native(
        "Frame Pair – Side-by-side Frame Viewer",
        options,
        Box::new(|cc| {
            // Install image loaders so egui can render file:// frames.
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(FramePairApp::new(cc, config)))
        }),
    )
}
