mod app;
mod config;
mod export;
mod session;

use anyhow::Result;
use artifex_canvas::BrushImage;
use artifex_engine::device::GpuInit;
use artifex_engine::logging::{init_logging, LoggingConfig};
use artifex_engine::window::Runtime;

use app::ArtifexApp;
use config::StudioConfig;

fn main() -> Result<()> {
    let (config, source) = StudioConfig::resolve()?;

    init_logging(LoggingConfig::with_filter(config.log_filter.clone()));
    match &source {
        Some(path) => log::info!("config loaded from {}", path.display()),
        None => log::info!("no config file; using defaults"),
    }

    let strokes = config
        .session_file
        .as_deref()
        .map(session::load)
        .unwrap_or_default();
    let brush = BrushImage::load_or_fallback(config.brush_texture.as_deref());

    log::info!(
        "keys: C/Delete clear, S save PNG to {}, Escape quit",
        config.export_dir.display()
    );

    let runtime_config = config.runtime_config();
    let app = ArtifexApp::new(config, brush, strokes);

    Runtime::run(runtime_config, GpuInit::default(), app).inspect_err(|e| log::error!("{e:#}"))
}
