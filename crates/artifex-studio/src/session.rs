//! Stroke persistence across runs.

use std::path::Path;

use anyhow::{Context, Result};
use artifex_canvas::Stroke;
use serde::{Deserialize, Serialize};

/// On-disk session: `{"strokes": [[{"x": .., "y": ..}, ..], ..]}`.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub strokes: Vec<Stroke>,
}

/// Reads the saved strokes. A missing or unreadable file yields an empty canvas.
pub fn load(path: &Path) -> Vec<Stroke> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::debug!("no session at {}", path.display());
            return Vec::new();
        }
        Err(e) => {
            log::warn!("failed to read session {}: {e}; starting empty", path.display());
            return Vec::new();
        }
    };

    match serde_json::from_str::<Session>(&text) {
        Ok(session) => session.strokes,
        Err(e) => {
            log::warn!("corrupt session {}: {e}; starting empty", path.display());
            Vec::new()
        }
    }
}

pub fn save(path: &Path, strokes: &[Stroke]) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
    }
    let session = Session {
        strokes: strokes.to_vec(),
    };
    let json = serde_json::to_string(&session)?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write session {}", path.display()))?;
    log::info!("saved {} strokes to {}", strokes.len(), path.display());
    Ok(())
}
