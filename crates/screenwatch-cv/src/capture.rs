//! Display capture

use crate::Result;
use crate::error::WatchError;
use crate::traits::CaptureSource;
use anyhow::Context;
use image::RgbaImage;
use xcap::Monitor;

/// Capture source backed by the platform screenshot APIs.
///
/// Monitors are re-enumerated on every `display_count` call so that
/// hot-plugged displays are picked up on the next tick.
#[derive(Default)]
pub struct ScreenCapture {
    monitors: Vec<Monitor>,
}

impl ScreenCapture {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CaptureSource for ScreenCapture {
    fn display_count(&mut self) -> Result<usize> {
        self.monitors =
            Monitor::all().map_err(|e| WatchError::DisplayEnumeration(e.to_string()))?;
        Ok(self.monitors.len())
    }

    fn capture(&mut self, display: usize) -> Result<RgbaImage> {
        let monitor = self.monitors.get(display).ok_or(WatchError::Capture {
            display,
            reason: "display is no longer active".to_string(),
        })?;

        let image = monitor.capture_image().map_err(|e| WatchError::Capture {
            display,
            reason: e.to_string(),
        })?;

        Ok(image)
    }
}

/// Snapshot every active display. Fails on the first display that cannot be read.
pub fn capture_all<C: CaptureSource + ?Sized>(source: &mut C) -> Result<Vec<RgbaImage>> {
    let count = source.display_count()?;

    (0..count)
        .map(|display| {
            source
                .capture(display)
                .with_context(|| format!("Capture of display {} of {} failed", display, count))
        })
        .collect()
}
