//! Presence flags for every loaded template and the alerts they raise

use super::state::{AlertKind, Presence, transition};
use anyhow::{Context, Result, ensure};
use log::info;
use serde::Serialize;

/// Playback handle for the preloaded alert sound.
///
/// Called synchronously on the thread that owns the tracker, so
/// implementations never see overlapping alerts.
pub trait Notifier {
    /// Begin playback from the current position
    fn play(&mut self) -> Result<()>;

    /// Reset the read position to the start of the sound
    fn rewind(&mut self) -> Result<()>;
}

/// A presence change for one template
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub template: String,
    pub kind: AlertKind,
}

#[derive(Debug, Clone)]
struct TrackedTemplate {
    name: String,
    presence: Presence,
}

/// Owns exactly one presence flag per template, in load order.
#[derive(Debug, Clone, Default)]
pub struct AlertStateTracker {
    templates: Vec<TrackedTemplate>,
}

impl AlertStateTracker {
    /// Every template starts `Absent`.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let templates = names
            .into_iter()
            .map(|name| TrackedTemplate {
                name: name.into(),
                presence: Presence::Absent,
            })
            .collect();

        Self { templates }
    }

    pub fn presence(&self, index: usize) -> Option<Presence> {
        self.templates.get(index).map(|t| t.presence)
    }

    /// Feed one template's aggregated result for the tick.
    ///
    /// On a transition the notifier is played and rewound before this returns.
    pub fn observe<N: Notifier + ?Sized>(
        &mut self,
        index: usize,
        found: bool,
        notifier: &mut N,
    ) -> Result<Option<Alert>> {
        let tracked = self
            .templates
            .get_mut(index)
            .with_context(|| format!("No tracked template at index {}", index))?;

        let (next, kind) = transition(tracked.presence, found);
        tracked.presence = next;

        let Some(kind) = kind else {
            return Ok(None);
        };

        let alert = Alert {
            template: tracked.name.clone(),
            kind,
        };

        info!("Notifying {} {}", alert.kind, alert.template);
        notifier.play().context("Failed to play alert sound")?;
        notifier.rewind().context("Failed to rewind alert sound")?;

        Ok(Some(alert))
    }

    /// Apply a completed tick: one aggregated result per template, in load order.
    pub fn apply_tick<N: Notifier + ?Sized>(
        &mut self,
        results: &[bool],
        notifier: &mut N,
    ) -> Result<Vec<Alert>> {
        ensure!(
            results.len() == self.templates.len(),
            "Tick produced {} results for {} templates",
            results.len(),
            self.templates.len()
        );

        let mut alerts = Vec::new();
        for (index, &found) in results.iter().enumerate() {
            if let Some(alert) = self.observe(index, found, notifier)? {
                alerts.push(alert);
            }
        }

        Ok(alerts)
    }
}
