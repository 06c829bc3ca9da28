use anyhow::{anyhow, Context, Result};
use eframe::NativeOptions;
use egui_player::app::WINDOW_TITLE;
use egui_player::config::PlayerConfig;
use egui_player::PlayerApp;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    ffmpeg_next::init().context("Failed to initialize FFmpeg")?;

    let config = PlayerConfig::load();
    let initial = std::env::args_os().nth(1).map(PathBuf::from);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), ?config, "Starting");

    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(WINDOW_TITLE)
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([300.0, 300.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        WINDOW_TITLE,
        options,
        Box::new(|cc| Ok(Box::new(PlayerApp::new(cc, config, initial)))),
    )
    .map_err(|e| anyhow!("eframe error: {e}"))
}
