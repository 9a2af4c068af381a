pub mod config;
pub mod controller;
pub mod display;
pub mod ui;
pub mod visualizer;

use std::time::Duration;

use color_eyre::{eyre::eyre, Result};
use eframe::egui;
use tokio::runtime::Handle;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use crate::config::VisualizerConfig;
use crate::controller::gilrs_backend;
use crate::display::{assets::AssetLoader, Display};
use crate::ui::VisualizerUI;
use crate::visualizer::{Visualizer, VisualizerSettings};

#[tokio::main]
async fn main() -> Result<()> {
    setup()?;

    let config_path = VisualizerConfig::default_path();
    let config = VisualizerConfig::load_or_create(&config_path)
        .await
        .map_err(|e| eyre!("Failed to load configuration: {}", e))?;

    info!("Opening input backend");
    let backend =
        gilrs_backend::open().map_err(|e| eyre!("Failed to open input backend: {}", e))?;

    let (loader, deliveries) = AssetLoader::new(config.display.asset_dir.clone(), Handle::current());
    let display = Display::with_loader(loader, deliveries);

    let settings = VisualizerSettings::from(&config);
    info!(
        "Frame loop at {} fps, haptics {}",
        settings.target_fps,
        if settings.haptics_enabled { "on" } else { "off" }
    );
    let visualizer = Visualizer::new(backend, display, settings);
    let idle_poll = Duration::from_millis(config.frame_loop.idle_poll_ms);

    info!("Starting UI");
    let mut native_options = eframe::NativeOptions::default();
    native_options.viewport = egui::ViewportBuilder::default()
        .with_title("padview")
        .with_inner_size([config.display.width, config.display.height])
        .with_fullscreen(config.display.fullscreen);

    eframe::run_native(
        "padview",
        native_options,
        Box::new(move |cc| Ok(Box::new(VisualizerUI::new(cc, visualizer, idle_poll)))),
    )
    .map_err(|e| eyre!("UI terminated with error: {}", e))?;

    Ok(())
}

fn setup() -> Result<()> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "0")
    }
    color_eyre::install()?;
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    setup_logging_env();
    Ok(())
}

fn setup_logging_env() {
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .pretty()
        .init();
}
