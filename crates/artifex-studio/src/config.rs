use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use artifex_canvas::CanvasStyle;
use artifex_engine::paint::Color;
use artifex_engine::window::RuntimeConfig;
use serde::{Deserialize, Serialize};
use winit::dpi::LogicalSize;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "ARTIFEX_CONFIG";
/// Config file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "artifex.json";

/// Studio settings. Every field is optional in the JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudioConfig {
    pub title: String,
    /// Initial window size in logical pixels.
    pub width: f64,
    pub height: f64,
    /// sRGB RGBA bytes.
    pub background: [u8; 4],
    pub stroke: [u8; 4],
    pub brush_texture: Option<PathBuf>,
    pub export_dir: PathBuf,
    /// `None` disables session persistence.
    pub session_file: Option<PathBuf>,
    /// `env_logger` filter; overrides `RUST_LOG`.
    pub log_filter: Option<String>,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            title: "Artifex".to_string(),
            width: 768.0,
            height: 768.0,
            background: [255, 255, 255, 255],
            stroke: [0, 0, 0, 255],
            brush_texture: None,
            export_dir: PathBuf::from("exports"),
            session_file: Some(PathBuf::from("artifex-session.json")),
            log_filter: None,
        }
    }
}

impl StudioConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// `$ARTIFEX_CONFIG`, then `./artifex.json`, then defaults.
    ///
    /// Returns the path the config came from, if any. A file named by the
    /// environment variable must exist.
    pub fn resolve() -> Result<(Self, Option<PathBuf>)> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            let path = PathBuf::from(path);
            return Ok((Self::load(&path)?, Some(path)));
        }
        let path = Path::new(DEFAULT_CONFIG_FILE);
        if path.exists() {
            return Ok((Self::load(path)?, Some(path.to_path_buf())));
        }
        Ok((Self::default(), None))
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0,
            "window size must be positive, got {}x{}",
            self.width,
            self.height
        );
        Ok(())
    }

    pub fn runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            title: self.title.clone(),
            initial_size: LogicalSize::new(self.width, self.height),
        }
    }

    pub fn canvas_style(&self) -> CanvasStyle {
        let [r, g, b, a] = self.background;
        let background = Color::from_srgb_u8(r, g, b, a);
        let [r, g, b, a] = self.stroke;
        let stroke = Color::from_srgb_u8(r, g, b, a);
        CanvasStyle { background, stroke }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        assert_eq!(StudioConfig::parse("{}").unwrap(), StudioConfig::default());
    }

    #[test]
    fn partial_file_overrides_only_named_fields() {
        let cfg = StudioConfig::parse(
            r#"{ "title": "Sketch", "stroke": [255, 0, 0, 255], "session_file": null }"#,
        )
        .unwrap();
        assert_eq!(cfg.title, "Sketch");
        assert_eq!(cfg.stroke, [255, 0, 0, 255]);
        assert_eq!(cfg.session_file, None);
        assert_eq!(cfg.width, 768.0);
    }

    #[test]
    fn non_positive_size_is_rejected() {
        assert!(StudioConfig::parse(r#"{ "width": 0 }"#).is_err());
        assert!(StudioConfig::parse(r#"{ "height": -5 }"#).is_err());
    }

    #[test]
    fn default_style_is_black_on_white() {
        let style = StudioConfig::default().canvas_style();
        assert_eq!(style, CanvasStyle::default());
    }

    #[test]
    fn load_reports_missing_file() {
        let err = StudioConfig::load(Path::new("/nonexistent/artifex.json")).unwrap_err();
        assert!(format!("{err:#}").contains("failed to read config"));
    }
}
