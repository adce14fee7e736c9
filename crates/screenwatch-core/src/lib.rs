//! Screenwatch core domain
//!
//! Geometry and the per-template presence state machine. Nothing in here
//! touches pixels, displays or audio devices.

pub mod presence;
pub mod region;

pub use presence::{Alert, AlertKind, AlertStateTracker, Notifier, Presence};
pub use region::Region;
