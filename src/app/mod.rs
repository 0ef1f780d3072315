//! Application entry point wiring logging and egui/eframe to launch the font module builder.

use crate::ui::FontModApp;
use eframe::egui;
use egui_phosphor::Variant;

/// Environment variable holding the `env_logger` filter.
const LOG_ENV: &str = "FONTMOD_LOG";

/// Initialise logging from `FONTMOD_LOG`, defaulting to `info`.
pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::new().filter_or(LOG_ENV, "info")).init();
}

/// Bootstrap the desktop application and run the main egui event loop.
pub fn run() -> eframe::Result<()> {
    // Register Phosphor icon font.
    let mut fonts = egui::FontDefinitions::default();
    egui_phosphor::add_to_fonts(&mut fonts, Variant::Regular);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([720.0, 760.0])
            .with_min_inner_size([480.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Font Module Builder",
        options,
        Box::new(|cc| {
            cc.egui_ctx.set_fonts(fonts);
            Ok(Box::new(FontModApp::default()))
        }),
    )
}
