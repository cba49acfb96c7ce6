//! Macanan GUI
//!
//! Play men or tiger against the AI, or let two humans or two AIs play.

use macanan::ui::MacananApp;
use macanan::Config;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), eframe::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 720.0])
            .with_min_inner_size([900.0, 600.0])
            .with_title("Macanan"),
        ..Default::default()
    };

    eframe::run_native(
        "Macanan",
        options,
        Box::new(|cc| Ok(Box::new(MacananApp::new(cc, config)))),
    )
}
