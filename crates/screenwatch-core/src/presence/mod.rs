//! Per-template presence tracking

pub mod state;
pub mod tracker;

pub use state::{AlertKind, Presence, transition};
pub use tracker::{Alert, AlertStateTracker, Notifier};
