use std::path::PathBuf;

use thiserror::Error;

use crate::types::control::ControlRole;

#[derive(Error, Debug)]
pub enum PlayerError {
    #[error("No video source was provided")]
    MissingSource,

    #[error("No player container selector was provided")]
    MissingContainer,

    #[error("Player container '{0}' was not found")]
    ContainerNotFound(String),

    #[error("The rendered player has no {0}")]
    MissingControl(ControlRole),

    #[error("Invalid player settings: {0}")]
    InvalidSettings(#[from] serde_json::Error),

    #[error("Failed to read settings from {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[cfg(feature = "gstreamer")]
    #[error("GStreamer error: {0}")]
    Gstreamer(String),
}
