use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a template was seen in the most recent completed scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Presence {
    #[default]
    Absent,
    Present,
}

/// Direction of a presence change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertKind {
    /// Absent -> Present
    Found,
    /// Present -> Absent
    NotFound,
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertKind::Found => write!(f, "found"),
            AlertKind::NotFound => write!(f, "not found"),
        }
    }
}

/// Next presence state for `current` given this tick's aggregated result,
/// plus the alert to raise if the state changed.
pub fn transition(current: Presence, found: bool) -> (Presence, Option<AlertKind>) {
    match (current, found) {
        (Presence::Absent, true) => (Presence::Present, Some(AlertKind::Found)),
        (Presence::Present, false) => (Presence::Absent, Some(AlertKind::NotFound)),
        (state, _) => (state, None),
    }
}
