use std::path::{Path, PathBuf};

use image::RgbImage;
use log::info;

use crate::error::{EditorError, Result};

pub const DEFAULT_EXTENSION: &str = "jpg";
/// Extensions offered by the open dialogs and accepted by `is_supported_image`.
pub const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "bmp"];

pub fn decode(path: &Path) -> Result<RgbImage> {
    let image = image::open(path).map_err(|source| EditorError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Decoded {}", path.display());
    Ok(image.to_rgb8())
}

/// Writes `image` to `path`, adding `.jpg` when the path has no extension.
/// Returns the path actually written.
pub fn encode(image: &RgbImage, path: &Path) -> Result<PathBuf> {
    let path = with_default_extension(path);
    image.save(&path).map_err(|source| EditorError::Encode {
        path: path.clone(),
        source,
    })?;
    info!("Saved {}", path.display());
    Ok(path)
}

pub fn with_default_extension(path: &Path) -> PathBuf {
    if path.extension().is_some() {
        path.to_path_buf()
    } else {
        path.with_extension(DEFAULT_EXTENSION)
    }
}

/// Last path component, used to name blend sources in the operation log.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext_lower = ext.to_lowercase();
            IMAGE_EXTENSIONS.contains(&ext_lower.as_str())
        })
        .unwrap_or(false)
}
