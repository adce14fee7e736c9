//! Template matching module

pub mod loader;
pub mod matcher;

pub use loader::TemplateLoader;
pub use matcher::PixelMatcher;

use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Reference image whose appearance on a display raises an alert.
///
/// The pixels are never mutated after load.
#[derive(Debug, Clone)]
pub struct Template {
    pub name: String,
    pub path: PathBuf,
    pub image: RgbaImage,
    /// Maximum per-channel difference still counted as a match
    pub tolerance: u8,
}

impl Template {
    pub fn new(name: String, image: RgbaImage) -> Self {
        Self {
            path: PathBuf::from(&name),
            name,
            image,
            tolerance: 0,
        }
    }

    pub fn with_tolerance(mut self, tolerance: u8) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.path = path.as_ref().to_path_buf();
        self
    }
}

/// Top-left offset of a match in container coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchLocation {
    pub x: u32,
    pub y: u32,
}

/// Template discovery and tolerance configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Default per-channel margin (0 = exact)
    pub tolerance: u8,
    /// Margin per template, keyed by template name or file name
    pub tolerance_overrides: HashMap<String, u8>,
    pub supported_extensions: Vec<String>,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            tolerance: 0,
            tolerance_overrides: HashMap::new(),
            supported_extensions: ["png", "jpg", "jpeg", "bmp", "gif"]
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }
}

impl TemplateConfig {
    /// Margin for a template, override first
    pub fn tolerance_for(&self, name: &str, path: &Path) -> u8 {
        let file_name = path.file_name().map(|n| n.to_string_lossy().to_string());

        self.tolerance_overrides
            .get(name)
            .or_else(|| file_name.and_then(|f| self.tolerance_overrides.get(&f)))
            .copied()
            .unwrap_or(self.tolerance)
    }

    pub fn is_supported(&self, path: &Path) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .is_some_and(|ext| self.supported_extensions.iter().any(|s| *s == ext))
    }
}
