//! Tick-driven orchestration: capture, match, transition, alert

use super::config::ScanConfig;
use crate::Result;
use crate::capture::capture_all;
use crate::template::{PixelMatcher, Template};
use crate::traits::{CaptureSource, TemplateMatchable};
use image::RgbaImage;
use log::{debug, info, warn};
use screenwatch_core::{Alert, AlertStateTracker, Notifier};
use std::thread;
use std::time::Instant;

/// Drives one scan cycle per tick over a fixed, load-ordered template set
pub struct Scanner<C, M = PixelMatcher> {
    config: ScanConfig,
    templates: Vec<Template>,
    tracker: AlertStateTracker,
    capture: C,
    matcher: M,
    ticks: u64,
}

impl<C: CaptureSource> Scanner<C, PixelMatcher> {
    pub fn new(config: ScanConfig, templates: Vec<Template>, capture: C) -> Self {
        Self::with_matcher(config, templates, capture, PixelMatcher::new())
    }
}

impl<C: CaptureSource, M: TemplateMatchable> Scanner<C, M> {
    pub fn with_matcher(
        config: ScanConfig,
        templates: Vec<Template>,
        capture: C,
        matcher: M,
    ) -> Self {
        let tracker = AlertStateTracker::new(templates.iter().map(|t| t.name.clone()));

        Self {
            config,
            templates,
            tracker,
            capture,
            matcher,
            ticks: 0,
        }
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    pub fn tracker(&self) -> &AlertStateTracker {
        &self.tracker
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// One full cycle. Every display is captured and every template matched
    /// before any presence flag changes.
    pub fn tick<N: Notifier + ?Sized>(&mut self, notifier: &mut N) -> Result<Vec<Alert>> {
        let started = Instant::now();
        let displays = capture_all(&mut self.capture)?;
        let results = self.match_all(&displays);
        let alerts = self.tracker.apply_tick(&results, notifier)?;

        self.ticks += 1;
        debug!(
            "Tick {}: {} displays, {} templates, {} alerts in {:?}",
            self.ticks,
            displays.len(),
            self.templates.len(),
            alerts.len(),
            started.elapsed()
        );

        Ok(alerts)
    }

    /// Aggregated (OR across displays) result per template, in load order
    pub fn match_all(&self, displays: &[RgbaImage]) -> Vec<bool> {
        let matcher = &self.matcher;
        let config = &self.config;

        #[cfg(feature = "parallel")]
        let results = {
            use rayon::prelude::*;
            self.templates
                .par_iter()
                .map(|template| found_on_any(matcher, config, displays, template))
                .collect()
        };

        #[cfg(not(feature = "parallel"))]
        let results = self
            .templates
            .iter()
            .map(|template| found_on_any(matcher, config, displays, template))
            .collect();

        results
    }

    /// Tick forever at the configured interval. Returns only on error.
    pub fn run<N: Notifier + ?Sized>(&mut self, notifier: &mut N) -> Result<()> {
        self.run_while(notifier, |_| true)
    }

    /// Tick at the configured interval while `keep_going` holds.
    ///
    /// Ticks never overlap: a cycle that overruns the interval pushes the
    /// next tick back instead of queueing extra ones.
    pub fn run_while<N, F>(&mut self, notifier: &mut N, mut keep_going: F) -> Result<()>
    where
        N: Notifier + ?Sized,
        F: FnMut(&Self) -> bool,
    {
        let interval = self.config.tick_interval();
        info!(
            "Watching for {} templates every {:?}",
            self.templates.len(),
            interval
        );

        let mut next_tick = Instant::now();
        while keep_going(self) {
            let now = Instant::now();
            if next_tick > now {
                thread::sleep(next_tick - now);
            }

            let started = Instant::now();
            self.tick(notifier)?;

            let elapsed = started.elapsed();
            if elapsed > interval {
                warn!("Scan took {:?}, longer than the {:?} interval", elapsed, interval);
                next_tick = Instant::now();
            } else {
                next_tick = started + interval;
            }
        }

        Ok(())
    }
}

fn found_on_any<M: TemplateMatchable + ?Sized>(
    matcher: &M,
    config: &ScanConfig,
    displays: &[RgbaImage],
    template: &Template,
) -> bool {
    displays.iter().enumerate().any(|(index, display)| {
        let area = config.region_for(display.width(), display.height());

        match matcher.find(display, template, area) {
            Some(location) => {
                debug!(
                    "{} matched on display {} at ({}, {})",
                    template.name, index, location.x, location.y
                );
                true
            }
            None => false,
        }
    })
}
