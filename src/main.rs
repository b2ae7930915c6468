mod app;
mod color;
mod config;
mod dashboard;
mod data;
mod state;
mod ui;

use anyhow::{anyhow, Context};
use app::PandaDashApp;
use clap::Parser;
use config::{AppConfig, Args};
use eframe::egui;
use state::AppState;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = AppConfig::resolve(Args::parse())?;
    log::info!("Starting {:?} dashboard with {:?}", config.variant, config.source);

    // Load before any window exists: without data there is no dashboard.
    let state = AppState::load(&config).context("cannot start the dashboard")?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };

    let title = state.view.title.clone();
    eframe::run_native(
        &title,
        options,
        Box::new(|_cc| Ok(Box::new(PandaDashApp::new(state)))),
    )
    .map_err(|e| anyhow!("UI error: {e}"))
}
