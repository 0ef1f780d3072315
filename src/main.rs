mod app;
mod logic;
mod models;
mod mvu;
mod ui;
mod utils;

fn main() -> eframe::Result<()> {
    app::init_logging();
    log::info!("Starting fontmod {}", env!("CARGO_PKG_VERSION"));
    app::run()
}
