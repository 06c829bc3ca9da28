//! Most-recently-opened files, capped and persisted on every change.

use tracing::{debug, warn};

use crate::settings::SettingsStore;

/// Maximum number of recent files kept. Also the number of `Ctrl+N` shortcuts.
pub const MAX_RECENT_FILES: usize = 5;

/// Ordered list of recently opened paths, rank 0 first.
pub struct RecentFiles<S> {
    entries: Vec<String>,
    store: S,
}

impl<S: SettingsStore> RecentFiles<S> {
    /// Read the stored list once. Unreadable storage starts an empty list.
    pub fn load(store: S) -> Self {
        let stored = match store.load() {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "Failed to load recent files, starting fresh");
                Vec::new()
            }
        };

        let mut entries: Vec<String> = Vec::with_capacity(MAX_RECENT_FILES);
        for path in stored {
            if !entries.contains(&path) {
                entries.push(path);
            }
        }
        entries.truncate(MAX_RECENT_FILES);

        debug!(count = entries.len(), "Loaded recent files");
        Self { entries, store }
    }

    /// Move `path` to rank 0, evicting the oldest entry past the cap, then
    /// write the whole list back. Write failures are logged only.
    pub fn add(&mut self, path: &str) {
        self.entries.retain(|p| p != path);
        self.entries.insert(0, path.to_string());
        self.entries.truncate(MAX_RECENT_FILES);

        if let Err(e) = self.store.save(&self.entries) {
            warn!(error = %e, "Failed to persist recent files");
        }
        debug!(path, count = self.entries.len(), "Added recent file");
    }

    /// Snapshot of the list, most recent first.
    pub fn list(&self) -> Vec<String> {
        self.entries.clone()
    }

    pub fn get(&self, rank: usize) -> Option<&str> {
        self.entries.get(rank).map(String::as_str)
    }

    pub fn max_size(&self) -> usize {
        MAX_RECENT_FILES
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
