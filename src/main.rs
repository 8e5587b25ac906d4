// src/main.rs
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]
use anyhow::{anyhow, Context, Result};
use eframe::egui;
use log::info;
use tapscope::config::{self, AppConfig};
use tapscope::gui::TapScopeApp;
fn main() -> Result<()> {
    env_logger::init();
    let config = match std::env::args().nth(1) {
        Some(path) => {
            config::load(&path).with_context(|| format!("failed to load config from {path}"))?
        }
        None => AppConfig::default(),
    };
    info!(
        "starting viewer: {:?} via {:?}, {} s window",
        config.profile, config.connection.mode, config.window.width_secs
    );
    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([900.0, 500.0])
        .with_min_inner_size([640.0, 400.0])
        .with_title("TapScope");
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };
    eframe::run_native(
        "TapScope",
        options,
        Box::new(move |_cc| Box::new(TapScopeApp::new(config))),
    )
    .map_err(|e| anyhow!("viewer failed: {e}"))
}
