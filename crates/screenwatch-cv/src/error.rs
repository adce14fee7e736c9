//! Typed failures at the load and capture boundaries

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WatchError {
    #[error("template directory not found: {0:?}")]
    TemplateRootMissing(PathBuf),

    #[error("no templates with a supported extension under {0:?}")]
    NoTemplates(PathBuf),

    #[error("failed to decode template {path:?}")]
    TemplateDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to enumerate displays: {0}")]
    DisplayEnumeration(String),

    #[error("failed to capture display {display}: {reason}")]
    Capture { display: usize, reason: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
