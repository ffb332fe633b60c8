use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use artifex_canvas::RasterImage;
use chrono::{DateTime, Local};

pub fn timestamped_stem(now: DateTime<Local>) -> String {
    now.format("artifex_%Y%m%d_%H%M%S").to_string()
}

/// Picks `<stem>.png` in `dir`, adding `_1`, `_2`, … if the name is taken.
pub fn unique_png_path(dir: &Path, stem: &str) -> PathBuf {
    let first = dir.join(format!("{stem}.png"));
    if !first.exists() {
        return first;
    }
    (1u32..)
        .map(|n| dir.join(format!("{stem}_{n}.png")))
        .find(|p| !p.exists())
        .unwrap_or(first)
}

/// Writes `image` as PNG into `dir` and returns the file path.
pub fn save_snapshot(dir: &Path, image: &RasterImage) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create export folder {}", dir.display()))?;
    let path = unique_png_path(dir, &timestamped_stem(Local::now()));
    image.save_png(&path)?;
    log::info!("exported {}x{} snapshot to {}", image.width(), image.height(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn stem_formats_local_time() {
        let t = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(timestamped_stem(t), "artifex_20240309_140507");
    }

    #[test]
    fn taken_names_get_a_suffix() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("shot.png"), b"").unwrap();
        std::fs::write(dir.path().join("shot_1.png"), b"").unwrap();
        assert_eq!(unique_png_path(dir.path(), "shot"), dir.path().join("shot_2.png"));
    }

    #[test]
    fn snapshot_is_written_as_png() {
        let dir = tempfile::tempdir().unwrap();
        let image = RasterImage::from_padded_rows(
            1,
            1,
            4,
            &[255, 0, 0, 255],
            wgpu::TextureFormat::Rgba8Unorm,
        );
        let path = save_snapshot(&dir.path().join("out"), &image).unwrap();
        let bytes = std::fs::read(path).unwrap();
        assert_eq!(&bytes[..4], b"\x89PNG");
    }
}
