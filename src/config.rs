//! Player tunables, optionally overridden by `config.json` in the per-user
//! configuration directory.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::settings::project_dirs;

const CONFIG_FILE: &str = "config.json";

/// Playback speeds offered in the Playback > Speed menu.
pub const PLAYBACK_SPEEDS: [f32; 5] = [0.25, 0.5, 1.0, 1.5, 2.0];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Skip backward/forward distance in milliseconds.
    pub skip_ms: u64,
    /// Volume step in percent for Up/Down and the Audio menu.
    pub volume_step: u8,
    /// Volume (percent) at startup.
    pub initial_volume: u8,
    /// Idle time before fullscreen chrome hides, in milliseconds.
    pub hide_controls_ms: u64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            skip_ms: 5000,
            volume_step: 5,
            initial_volume: 100,
            hide_controls_ms: 3000,
        }
    }
}

impl PlayerConfig {
    /// Load from the per-user configuration directory, falling back to
    /// defaults when the file is absent or unreadable.
    pub fn load() -> Self {
        match project_dirs() {
            Some(dirs) => Self::load_from(&dirs.config_dir().join(CONFIG_FILE)),
            None => Self::default(),
        }
    }

    pub fn load_from(path: &Path) -> Self {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!(path = %path.display(), error = %e, "Failed to read config");
                }
                return Self::default();
            }
        };

        match serde_json::from_str::<Self>(&json) {
            Ok(config) => {
                info!(path = %path.display(), "Loaded player config");
                config.sanitized()
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Invalid config, using defaults");
                Self::default()
            }
        }
    }

    fn sanitized(mut self) -> Self {
        self.initial_volume = self.initial_volume.min(100);
        self.volume_step = self.volume_step.min(100);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = PlayerConfig::load_from(&dir.path().join("config.json"));
        assert_eq!(config, PlayerConfig::default());
        assert_eq!(config.skip_ms, 5000);
        assert_eq!(config.hide_controls_ms, 3000);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "skip_ms": 10000 }"#).expect("write");

        let config = PlayerConfig::load_from(&path);
        assert_eq!(config.skip_ms, 10000);
        assert_eq!(config.volume_step, 5);
    }

    #[test]
    fn out_of_range_volume_is_capped() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "initial_volume": 250 }"#).expect("write");
        assert_eq!(PlayerConfig::load_from(&path).initial_volume, 100);
    }

    #[test]
    fn invalid_json_gives_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, "volume = loud").expect("write");
        assert_eq!(PlayerConfig::load_from(&path), PlayerConfig::default());
    }
}
