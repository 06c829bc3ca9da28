//! Error types shared by the settings store and the player shell.

use std::path::PathBuf;

use thiserror::Error;

/// Failures reading or writing persisted settings.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Settings I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No per-user configuration directory is available")]
    NoConfigDir,

    #[error("Settings store unavailable: {reason}")]
    Unavailable { reason: String },
}

/// User-input failures handled by the player shell.
#[derive(Error, Debug)]
pub enum PlayerError {
    #[error("File {} not found", .0.display())]
    FileNotFound(PathBuf),

    #[error("No recent file at position {0}")]
    NoRecentFile(usize),
}
