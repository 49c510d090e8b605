use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::operation::{AspectMode, BorderMethod, PadParams, ThresholdMode};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Directory the open/save dialogs start in.
    pub last_directory: Option<String>,
    /// Edge length of the square the current image is drawn into.
    pub display_size: u32,
    /// Edge length of each half of the before/after preview.
    pub preview_size: u32,
    pub show_preview: bool,
    /// Last padding fill, by name (`constant`, `reflect`, `replicate`).
    pub pad_method: String,
    /// Last padding shape: `square`, `rectangle` or `a:b`.
    pub pad_aspect: String,
    pub threshold_mode: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            last_directory: None,
            display_size: 500,
            preview_size: 300,
            show_preview: true,
            pad_method: BorderMethod::default().name().to_string(),
            pad_aspect: AspectMode::Square.to_string(),
            threshold_mode: ThresholdMode::default().name().to_string(),
        }
    }
}

impl EditorConfig {
    /// `<config dir>/PhotoEditor/config.json`, falling back to the working directory.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("PhotoEditor")
            .join("config.json")
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Loads `path`, using defaults when it is missing or unreadable.
    /// Image sizes are clamped to at least one pixel.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            info!("Config file does not exist at {}", path.display());
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                config.clamped()
            }
            Err(e) => {
                warn!("Failed to load config from {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    fn clamped(mut self) -> Self {
        if self.display_size == 0 || self.preview_size == 0 {
            warn!(
                "Zero image size in config (display {}, preview {}), using 1",
                self.display_size, self.preview_size
            );
        }
        self.display_size = self.display_size.max(1);
        self.preview_size = self.preview_size.max(1);
        self
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        info!("Saved config to {}", path.display());
        Ok(())
    }

    pub fn last_directory(&self) -> Option<PathBuf> {
        self.last_directory
            .as_ref()
            .map(PathBuf::from)
            .filter(|dir| dir.is_dir())
    }

    /// Remembers the parent directory of `file`. Returns true if it changed.
    pub fn remember_directory_of(&mut self, file: &Path) -> bool {
        let dir = match file.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_string_lossy().to_string(),
            _ => return false,
        };
        if self.last_directory.as_deref() == Some(dir.as_str()) {
            return false;
        }
        self.last_directory = Some(dir);
        true
    }

    pub fn pad_method(&self) -> BorderMethod {
        BorderMethod::from_name(&self.pad_method)
    }

    /// Stored padding shape. A malformed entry falls back to `Square`.
    pub fn pad_aspect(&self) -> AspectMode {
        match AspectMode::parse(&self.pad_aspect) {
            Ok(aspect) => aspect,
            Err(e) => {
                warn!("Ignoring pad_aspect '{}' in config: {}", self.pad_aspect, e);
                AspectMode::Square
            }
        }
    }

    pub fn threshold_mode(&self) -> ThresholdMode {
        ThresholdMode::from_name(&self.threshold_mode)
    }

    /// Stores the fill and shape of `params`. Returns true if either changed.
    pub fn remember_pad(&mut self, params: &PadParams) -> bool {
        let method = params.method.name().to_string();
        let aspect = params.aspect.to_string();
        if self.pad_method == method && self.pad_aspect == aspect {
            return false;
        }
        self.pad_method = method;
        self.pad_aspect = aspect;
        true
    }

    /// Stores `mode`. Returns true if it changed.
    pub fn remember_threshold(&mut self, mode: ThresholdMode) -> bool {
        if self.threshold_mode == mode.name() {
            return false;
        }
        self.threshold_mode = mode.name().to_string();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_config_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("photo-editor-{}", uuid::Uuid::new_v4()))
            .join("config.json")
    }

    #[test]
    fn test_save_and_load() {
        let path = temp_config_path();
        let config = EditorConfig {
            last_directory: Some("/tmp/pictures".to_string()),
            display_size: 640,
            preview_size: 200,
            show_preview: false,
            pad_method: "replicate".to_string(),
            pad_aspect: "4:5".to_string(),
            threshold_mode: "inverse".to_string(),
        };

        config.save(&path).unwrap();
        assert_eq!(EditorConfig::load(&path).unwrap(), config);
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: EditorConfig = serde_json::from_str(r#"{"display_size": 800}"#).unwrap();
        assert_eq!(config.display_size, 800);
        assert_eq!(config.preview_size, 300);
        assert!(config.show_preview);
        assert!(config.last_directory.is_none());
        assert_eq!(config.pad_method(), BorderMethod::Reflect);
        assert_eq!(config.pad_aspect(), AspectMode::Square);
        assert_eq!(config.threshold_mode(), ThresholdMode::Binary);
    }

    #[test]
    fn test_zero_sizes_are_clamped() {
        let path = temp_config_path();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, r#"{"display_size": 0, "preview_size": 0}"#).unwrap();

        let config = EditorConfig::load_or_default(&path);
        assert_eq!(config.display_size, 1);
        assert_eq!(config.preview_size, 1);
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_stored_operation_choices() {
        let config: EditorConfig = serde_json::from_str(
            r#"{"pad_method": "Replicate", "pad_aspect": "16:9", "threshold_mode": "inverse"}"#,
        )
        .unwrap();
        assert_eq!(config.pad_method(), BorderMethod::Replicate);
        assert_eq!(config.pad_aspect(), AspectMode::Ratio(16, 9));
        assert_eq!(config.threshold_mode(), ThresholdMode::Inverse);

        // Unknown or malformed names fall back instead of failing the load.
        let config: EditorConfig = serde_json::from_str(
            r#"{"pad_method": "wrap", "pad_aspect": "4:0", "threshold_mode": "otsu"}"#,
        )
        .unwrap();
        assert_eq!(config.pad_method(), BorderMethod::Reflect);
        assert_eq!(config.pad_aspect(), AspectMode::Square);
        assert_eq!(config.threshold_mode(), ThresholdMode::Binary);
    }

    #[test]
    fn test_remember_operation_choices() {
        let mut config = EditorConfig::default();
        let params = PadParams {
            method: BorderMethod::Constant,
            aspect: AspectMode::Ratio(4, 5),
            margin: 10,
        };
        assert!(config.remember_pad(&params));
        assert!(!config.remember_pad(&PadParams { margin: 0, ..params }));
        assert_eq!(config.pad_aspect, "4:5");
        assert_eq!(config.pad_aspect(), AspectMode::Ratio(4, 5));

        assert!(config.remember_threshold(ThresholdMode::Inverse));
        assert!(!config.remember_threshold(ThresholdMode::Inverse));
        assert_eq!(config.threshold_mode(), ThresholdMode::Inverse);
    }

    #[test]
    fn test_load_or_default_on_garbage() {
        let path = temp_config_path();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "not json").unwrap();

        assert_eq!(EditorConfig::load_or_default(&path), EditorConfig::default());
        assert!(matches!(
            EditorConfig::load(&path),
            Err(ConfigError::JsonError(_))
        ));
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_remember_directory_of() {
        let mut config = EditorConfig::default();
        assert!(config.remember_directory_of(Path::new("/photos/cat.jpg")));
        assert!(!config.remember_directory_of(Path::new("/photos/tree.jpg")));
        assert_eq!(config.last_directory.as_deref(), Some("/photos"));
        assert!(!config.remember_directory_of(Path::new("cat.jpg")));
    }
}
