//! Scan configuration

use crate::Result;
use crate::error::WatchError;
use crate::template::TemplateConfig;
use anyhow::Context;
use screenwatch_core::Region;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main scan configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub template_config: TemplateConfig,
    pub template_root: PathBuf,
    pub alert_sound: PathBuf,
    pub tick_interval_ms: u64,
    /// Sub-rectangle of each display to search; whole display when unset
    pub search_region: Option<Region>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            template_config: TemplateConfig::default(),
            template_root: "resources".into(),
            alert_sound: "sounds/tindeck_1.mp3".into(),
            tick_interval_ms: 30,
            search_region: None,
        }
    }
}

impl ScanConfig {
    /// Load from a JSON file; missing keys fall back to defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {:?}", path))?;
        let config: ScanConfig = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config: {:?}", path))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.tick_interval_ms == 0 {
            let reason = "tick_interval_ms must be positive".to_string();
            return Err(WatchError::InvalidConfig(reason).into());
        }
        if self.search_region.is_some_and(|r| r.is_empty()) {
            return Err(WatchError::InvalidConfig("search_region must not be empty".into()).into());
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Area of a `width` x `height` display to scan
    pub fn region_for(&self, width: u32, height: u32) -> Region {
        self.search_region
            .unwrap_or(Region::full(width, height))
            .clip_to(width, height)
    }
}
