//! Durable per-date snapshot cache.
//!
//! Each fetched snapshot is persisted as one JSON file named after its
//! namespaced key. The store keeps no in-memory state: it is a thin
//! wrapper over the cache directory, shared by everything in the process.
//! Storage problems never propagate; reads degrade to a miss and a failed
//! write falls back to eviction.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::models::Snapshot;
use crate::utils::date::DateKey;

/// Namespace prefix for persisted snapshot entries.
pub const SNAPSHOT_KEY_PREFIX: &str = "aewiki-recap-";

/// Divisor for the eviction pass: remove the oldest 1/4 of entries,
/// rounded up.
const EVICTION_DIVISOR: usize = 4;

pub struct SnapshotStore {
    cache_dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(cache_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&cache_dir)
            .with_context(|| format!("Failed to create cache directory {}", cache_dir.display()))?;
        Ok(Self { cache_dir })
    }

    fn entry_path(&self, date: &DateKey) -> PathBuf {
        self.cache_dir
            .join(format!("{}{}.json", SNAPSHOT_KEY_PREFIX, date))
    }

    /// Read a cached snapshot. Any read or deserialize failure is logged
    /// and treated as a miss.
    pub fn get(&self, date: &DateKey) -> Option<Snapshot> {
        match self.try_get(date) {
            Ok(found) => found,
            Err(e) => {
                debug!(date = %date, error = %e, "Cache read failed, treating as miss");
                None
            }
        }
    }

    fn try_get(&self, date: &DateKey) -> Result<Option<Snapshot>> {
        let path = self.entry_path(date);
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read cache entry for {}", date))?;

        let snapshot = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse cache entry for {}", date))?;

        Ok(Some(snapshot))
    }

    /// Persist a snapshot under its date key.
    ///
    /// A failed write triggers one eviction pass and one best-effort
    /// retry; a second failure is logged and dropped.
    pub fn put(&self, date: &DateKey, snapshot: &Snapshot) {
        if let Err(e) = self.try_put(date, snapshot) {
            warn!(date = %date, error = %e, "Cache write failed, evicting oldest entries");
            self.evict_oldest();
            if let Err(e) = self.try_put(date, snapshot) {
                warn!(date = %date, error = %e, "Cache write failed after eviction, dropping entry");
            }
        }
    }

    fn try_put(&self, date: &DateKey, snapshot: &Snapshot) -> Result<()> {
        let contents = serde_json::to_string(snapshot)?;
        std::fs::write(self.entry_path(date), contents)
            .with_context(|| format!("Failed to write cache entry for {}", date))?;
        Ok(())
    }

    /// Remove the chronologically oldest quarter of cached snapshots,
    /// rounded up and never more than are present. Removal failures are
    /// logged and skipped. Returns the number of entries removed.
    pub fn evict_oldest(&self) -> usize {
        let dates = self.entry_dates();
        if dates.is_empty() {
            return 0;
        }

        let evict_count = dates.len().div_ceil(EVICTION_DIVISOR);
        let mut removed = 0;
        for date in dates.iter().take(evict_count) {
            match std::fs::remove_file(self.entry_path(date)) {
                Ok(()) => {
                    debug!(date = %date, "Evicted cached snapshot");
                    removed += 1;
                }
                Err(e) => warn!(date = %date, error = %e, "Failed to evict cached snapshot"),
            }
        }
        removed
    }

    /// All cached snapshot dates, oldest first. Files that do not carry
    /// the namespace prefix (the availability index, stray files) are
    /// ignored.
    pub fn entry_dates(&self) -> Vec<DateKey> {
        let mut dates = Vec::new();
        let entries = match std::fs::read_dir(&self.cache_dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!(error = %e, "Failed to enumerate cache directory");
                return dates;
            }
        };

        for entry in entries.flatten() {
            let name = entry.file_name();
            if let Some(name) = name.to_str() {
                let stem = name
                    .strip_prefix(SNAPSHOT_KEY_PREFIX)
                    .and_then(|rest| rest.strip_suffix(".json"));
                if let Some(stem) = stem {
                    if let Ok(date) = DateKey::new(stem) {
                        dates.push(date);
                    }
                }
            }
        }

        dates.sort();
        dates
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn key(s: &str) -> DateKey {
        DateKey::new(s).unwrap()
    }

    fn snapshot(total: u64) -> Snapshot {
        Snapshot {
            total_contributors: total,
            contributors: Vec::new(),
        }
    }

    fn store() -> (TempDir, SnapshotStore) {
        let dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(dir.path().to_path_buf()).unwrap();
        (dir, store)
    }

    #[test]
    fn test_put_then_get_returns_equal_snapshot() {
        let (_dir, store) = store();
        let date = key("2025-06-01");
        let snap = snapshot(12);

        store.put(&date, &snap);
        assert_eq!(store.get(&date), Some(snap));
    }

    #[test]
    fn test_get_missing_entry_is_none() {
        let (_dir, store) = store();
        assert_eq!(store.get(&key("2025-06-01")), None);
    }

    #[test]
    fn test_get_corrupt_entry_is_a_miss() {
        let (dir, store) = store();
        let date = key("2025-06-01");
        std::fs::write(
            dir.path().join(format!("{}{}.json", SNAPSHOT_KEY_PREFIX, date)),
            "not json",
        )
        .unwrap();

        assert_eq!(store.get(&date), None);
    }

    #[test]
    fn test_entry_dates_sorted_oldest_first() {
        let (_dir, store) = store();
        for d in ["2025-03-01", "2024-12-31", "2025-01-15"] {
            store.put(&key(d), &snapshot(1));
        }

        assert_eq!(
            store.entry_dates(),
            vec![key("2024-12-31"), key("2025-01-15"), key("2025-03-01")]
        );
    }

    #[test]
    fn test_entry_dates_ignores_foreign_files() {
        let (dir, store) = store();
        store.put(&key("2025-06-01"), &snapshot(1));
        std::fs::write(dir.path().join("aewiki-available-files.json"), "{}").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "hi").unwrap();

        assert_eq!(store.entry_dates(), vec![key("2025-06-01")]);
    }

    #[test]
    fn test_evict_removes_ceil_quarter_oldest_first() {
        let (_dir, store) = store();
        let days = [
            "2025-01-01",
            "2025-01-02",
            "2025-01-03",
            "2025-01-04",
            "2025-01-05",
        ];
        for d in days {
            store.put(&key(d), &snapshot(1));
        }

        // ceil(5 / 4) == 2: the two oldest go
        assert_eq!(store.evict_oldest(), 2);
        assert_eq!(
            store.entry_dates(),
            vec![key("2025-01-03"), key("2025-01-04"), key("2025-01-05")]
        );
    }

    #[test]
    fn test_evict_single_entry_removes_it() {
        let (_dir, store) = store();
        store.put(&key("2025-06-01"), &snapshot(1));

        assert_eq!(store.evict_oldest(), 1);
        assert!(store.entry_dates().is_empty());
    }

    #[test]
    fn test_evict_empty_store_is_a_no_op() {
        let (_dir, store) = store();
        assert_eq!(store.evict_oldest(), 0);
    }
}
