//! Command line arguments and config resolution

use anyhow::Result;
use clap::Parser;
use screenwatch_cv::ScanConfig;
use std::path::PathBuf;

/// Watch the screen for reference images and chime when they appear or vanish.
#[derive(Debug, Parser)]
#[command(name = "screenwatch", version)]
pub struct Cli {
    /// JSON config file; flags below override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory scanned recursively for template images
    #[arg(short, long)]
    pub templates: Option<PathBuf>,

    /// Alert sound played on every presence change
    #[arg(short, long)]
    pub sound: Option<PathBuf>,

    /// Milliseconds between scans
    #[arg(short, long)]
    pub interval_ms: Option<u64>,

    /// Default per-channel tolerance (0 = exact match)
    #[arg(long)]
    pub tolerance: Option<u8>,

    /// Run a single scan and exit
    #[arg(long)]
    pub once: bool,
}

impl Cli {
    pub fn resolve_config(&self) -> Result<ScanConfig> {
        let mut config = match &self.config {
            Some(path) => ScanConfig::from_file(path)?,
            None => ScanConfig::default(),
        };

        if let Some(dir) = &self.templates {
            config.template_root = dir.clone();
        }
        if let Some(sound) = &self.sound {
            config.alert_sound = sound.clone();
        }
        if let Some(ms) = self.interval_ms {
            config.tick_interval_ms = ms;
        }
        if let Some(tolerance) = self.tolerance {
            config.template_config.tolerance = tolerance;
        }

        config.validate()?;
        Ok(config)
    }
}
