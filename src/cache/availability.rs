//! Time-boxed availability index of dated recap snapshots.
//!
//! Discovering which dates exist requires a full remote listing call, so
//! the derived date set is held in memory for the process lifetime and
//! mirrored to a durable side-channel file. Only the durable copy expires
//! (after one day); the in-memory handle is never invalidated mid-process.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::api::{RecapClient, TreeEntry};
use crate::utils::date::DateKey;

/// File name of the durable index copy inside the cache directory.
pub const INDEX_FILE_NAME: &str = "aewiki-available-files.json";

/// Maximum age of the durable index copy before it is re-derived from
/// the remote listing.
const FRESHNESS_WINDOW_HOURS: i64 = 24;

fn recap_file_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"recap-(\d{4}-\d{2}-\d{2})\.json$").expect("recap file pattern"))
}

/// Durable form of the index: last refresh time plus the known date set.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedIndex {
    #[serde(with = "chrono::serde::ts_milliseconds")]
    timestamp: DateTime<Utc>,
    files: Vec<DateKey>,
}

impl PersistedIndex {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now - self.timestamp < Duration::hours(FRESHNESS_WINDOW_HOURS)
    }
}

/// The set of dates known to have a remote snapshot.
///
/// Absence of a date only means "not seen as of the last refresh"; it is
/// re-derived once the durable copy outlives the freshness window.
pub struct AvailabilityIndex {
    path: PathBuf,
    loaded: Option<BTreeSet<DateKey>>,
}

impl AvailabilityIndex {
    pub fn new(cache_dir: &Path) -> Self {
        Self {
            path: cache_dir.join(INDEX_FILE_NAME),
            loaded: None,
        }
    }

    /// Derive the current availability set.
    ///
    /// A fresh durable copy short-circuits the listing call. Otherwise
    /// the remote listing is filtered down to snapshot files, the result
    /// persisted best-effort, and the set returned. A failed listing
    /// degrades to an empty set rather than an error.
    pub async fn refresh(&self, client: &RecapClient) -> BTreeSet<DateKey> {
        if let Some(persisted) = self.load_persisted() {
            if persisted.is_fresh(Utc::now()) {
                debug!(dates = persisted.files.len(), "Using persisted availability index");
                return persisted.files.into_iter().collect();
            }
        }

        let entries = match client.list_data_files().await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "Availability listing failed, treating all dates as unavailable");
                return BTreeSet::new();
            }
        };

        let dates = extract_available_dates(&entries);
        if let Err(e) = self.persist(&dates) {
            warn!(error = %e, "Failed to persist availability index");
        }
        debug!(dates = dates.len(), "Refreshed availability index from remote listing");
        dates
    }

    /// Populate the in-memory handle, at most once per process lifetime.
    /// Later calls are no-ops regardless of elapsed time.
    pub async fn ensure_loaded(&mut self, client: &RecapClient) {
        if self.loaded.is_none() {
            let dates = self.refresh(client).await;
            self.loaded = Some(dates);
        }
    }

    pub async fn contains(&mut self, client: &RecapClient, date: &DateKey) -> bool {
        self.ensure_loaded(client).await;
        self.loaded
            .as_ref()
            .is_some_and(|dates| dates.contains(date))
    }

    /// The chronologically latest known date, if any.
    pub async fn most_recent(&mut self, client: &RecapClient) -> Option<DateKey> {
        self.ensure_loaded(client).await;
        self.loaded.as_ref().and_then(|dates| dates.last().cloned())
    }

    fn load_persisted(&self) -> Option<PersistedIndex> {
        if !self.path.exists() {
            return None;
        }
        match self.try_load_persisted() {
            Ok(persisted) => Some(persisted),
            Err(e) => {
                debug!(error = %e, "Failed to load persisted availability index");
                None
            }
        }
    }

    fn try_load_persisted(&self) -> Result<PersistedIndex> {
        let contents =
            std::fs::read_to_string(&self.path).context("Failed to read availability index")?;
        serde_json::from_str(&contents).context("Failed to parse availability index")
    }

    fn persist(&self, dates: &BTreeSet<DateKey>) -> Result<()> {
        let persisted = PersistedIndex {
            timestamp: Utc::now(),
            files: dates.iter().cloned().collect(),
        };
        let contents = serde_json::to_string(&persisted)?;
        std::fs::write(&self.path, contents).context("Failed to write availability index")?;
        Ok(())
    }
}

/// Filter a remote tree listing down to the dates of published recap
/// snapshots: blob entries under `data/` named `recap-YYYY-MM-DD.json`.
pub fn extract_available_dates(entries: &[TreeEntry]) -> BTreeSet<DateKey> {
    entries
        .iter()
        .filter(|e| e.entry_type == "blob")
        .filter(|e| {
            e.path.starts_with("data/") && e.path.ends_with(".json") && e.path.contains("recap-")
        })
        .filter_map(|e| recap_file_re().captures(&e.path))
        .filter_map(|caps| caps.get(1))
        .filter_map(|m| DateKey::new(m.as_str()).ok())
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
