//! Screenwatch Computer Vision Library
//!
//! Template loading, pixel-exact matching against captured displays, and
//! the scan loop that feeds match results into the presence tracker.

pub mod capture;
pub mod error;
pub mod scan;
pub mod template;

// Re-export commonly used types
pub use capture::ScreenCapture;
pub use error::WatchError;
pub use scan::{ScanConfig, Scanner};
pub use template::{MatchLocation, PixelMatcher, Template, TemplateConfig, TemplateLoader};

// Error handling
pub type Result<T> = anyhow::Result<T>;

/// Seams between the scan loop and its collaborators
pub mod traits {
    use super::*;
    use image::RgbaImage;
    use screenwatch_core::Region;

    /// Trait for template matching implementations
    pub trait TemplateMatchable: Send + Sync {
        /// First offset, row-major from the top-left of `region`, where
        /// `template` appears in `container`.
        fn find(
            &self,
            container: &RgbaImage,
            template: &Template,
            region: Region,
        ) -> Option<MatchLocation>;

        fn matches(&self, container: &RgbaImage, template: &Template, region: Region) -> bool {
            self.find(container, template, region).is_some()
        }
    }

    /// Source of per-display pixel snapshots
    pub trait CaptureSource {
        /// Number of active displays right now
        fn display_count(&mut self) -> Result<usize>;

        /// Snapshot of display `display`, full bounds
        fn capture(&mut self, display: usize) -> Result<RgbaImage>;
    }
}
