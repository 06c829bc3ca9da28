//! Per-user settings storage for the recent-files list.
//!
//! The store is injected into [`RecentFiles`](crate::recent::RecentFiles) so
//! tests can swap the on-disk JSON file for [`MemoryStore`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use directories::ProjectDirs;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::SettingsError;

/// File name for the persisted recent-files list.
const RECENT_FILES_FILE: &str = "recent_files.json";

/// Durable storage for one ordered list of strings.
pub trait SettingsStore {
    fn load(&self) -> Result<Vec<String>, SettingsError>;
    fn save(&self, recent_files: &[String]) -> Result<(), SettingsError>;
}

impl<T: SettingsStore + ?Sized> SettingsStore for Box<T> {
    fn load(&self) -> Result<Vec<String>, SettingsError> {
        (**self).load()
    }

    fn save(&self, recent_files: &[String]) -> Result<(), SettingsError> {
        (**self).save(recent_files)
    }
}

/// Per-user application directories (`~/.config/egui-player` on Linux).
pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "egui-player")
}

#[derive(Serialize, Deserialize, Default)]
struct StoredSettings {
    #[serde(default)]
    recent_files: Vec<String>,
}

/// JSON file in the per-user configuration directory.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Store at the platform default location.
    pub fn open_default() -> Result<Self, SettingsError> {
        let dirs = project_dirs().ok_or(SettingsError::NoConfigDir)?;
        Ok(Self::at(dirs.config_dir().join(RECENT_FILES_FILE)))
    }

    /// Store backed by an explicit file path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for JsonFileStore {
    fn load(&self) -> Result<Vec<String>, SettingsError> {
        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No settings file yet");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };
        let stored: StoredSettings = serde_json::from_str(&json)?;
        Ok(stored.recent_files)
    }

    fn save(&self, recent_files: &[String]) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let stored = StoredSettings {
            recent_files: recent_files.to_vec(),
        };
        let json = serde_json::to_string_pretty(&stored)?;
        std::fs::write(&self.path, json.as_bytes())?;

        info!(
            count = recent_files.len(),
            path = %self.path.display(),
            "Saved recent files"
        );
        Ok(())
    }
}

#[derive(Default)]
struct MemoryInner {
    values: Vec<String>,
    fail_saves: bool,
    saves: usize,
}

/// In-memory store. Clones share the same contents.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `values`, as if written by an earlier run.
    pub fn with_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let store = Self::default();
        store.inner.lock().values = values.into_iter().map(Into::into).collect();
        store
    }

    /// Make every subsequent `save` fail.
    pub fn set_fail_saves(&self, fail: bool) {
        self.inner.lock().fail_saves = fail;
    }

    /// Current stored contents.
    pub fn values(&self) -> Vec<String> {
        self.inner.lock().values.clone()
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.inner.lock().saves
    }
}

impl SettingsStore for MemoryStore {
    fn load(&self) -> Result<Vec<String>, SettingsError> {
        Ok(self.inner.lock().values.clone())
    }

    fn save(&self, recent_files: &[String]) -> Result<(), SettingsError> {
        let mut inner = self.inner.lock();
        if inner.fail_saves {
            warn!("Memory settings store rejecting save");
            return Err(SettingsError::Unavailable {
                reason: "saves disabled".to_string(),
            });
        }
        inner.values = recent_files.to_vec();
        inner.saves += 1;
        Ok(())
    }
}
