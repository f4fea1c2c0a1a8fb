//! Recap fetch orchestration.
//!
//! `RecapService` ties the snapshot cache, the availability index, and
//! the remote client together: cache lookup first, then availability
//! check, then a single fetch-and-store attempt. It also owns the
//! initial-date resolution used by the presentation layer and the small
//! output-shaping helpers applied when a payload is consumed.

use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, info};

use crate::api::{RecapClient, RecapError};
use crate::cache::{AvailabilityIndex, SnapshotStore};
use crate::models::Snapshot;
use crate::utils::date::DateKey;

/// Placeholder shown when a contributor entry carries no usable avatar.
const DEFAULT_AVATAR_URL: &str = "https://aewiki.net/images/default-avatar.png";

/// Avatar size tokens: thumbnails are published at 36px and upgraded for
/// display.
const AVATAR_SIZE_THUMB: &str = "width/36/height/36";
const AVATAR_SIZE_DISPLAY: &str = "width/128/height/128";

fn avatar_src_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"src="([^"]*)""#).expect("avatar src pattern"))
}

/// Extract a display-sized avatar URL from a contributor's HTML fragment.
///
/// Takes the first `src` attribute and upgrades the embedded thumbnail
/// size token; a fragment with no `src` yields the fixed placeholder.
pub fn avatar_url(html: &str) -> String {
    match avatar_src_re().captures(html).and_then(|caps| caps.get(1)) {
        Some(src) => src.as_str().replace(AVATAR_SIZE_THUMB, AVATAR_SIZE_DISPLAY),
        None => DEFAULT_AVATAR_URL.to_string(),
    }
}

/// Shareable link for one dated recap, suitable for pasting back into a
/// browser.
pub fn permalink(page_url: &str, date: &DateKey) -> String {
    format!("{}?date={}", page_url, date.as_str())
}

/// Orchestrates cache lookup, availability check, and remote fetch.
///
/// The service exclusively owns the in-memory availability handle; the
/// snapshot store stays stateless on its behalf.
pub struct RecapService {
    client: RecapClient,
    store: SnapshotStore,
    index: AvailabilityIndex,
}

impl RecapService {
    pub fn new(client: RecapClient, store: SnapshotStore, index: AvailabilityIndex) -> Self {
        Self {
            client,
            store,
            index,
        }
    }

    /// Retrieve the snapshot for one date.
    ///
    /// A cached snapshot is returned as-is, with no availability check
    /// and no network traffic, even when the index is stale. On a miss
    /// the date must be present in the availability index before the
    /// single remote attempt is made; a successful fetch is persisted
    /// before returning, a failed one propagates without caching.
    pub async fn fetch(&mut self, date: &DateKey) -> Result<Snapshot, RecapError> {
        if let Some(snapshot) = self.store.get(date) {
            debug!(date = %date, "Serving recap from cache");
            return Ok(snapshot);
        }

        if !self.index.contains(&self.client, date).await {
            return Err(RecapError::NotAvailable(date.clone()));
        }

        let snapshot = self.client.fetch_snapshot(date).await?;
        self.store.put(date, &snapshot);
        info!(
            date = %date,
            contributors = snapshot.total_contributors,
            "Fetched recap snapshot"
        );
        Ok(snapshot)
    }

    /// Decide which date to open on.
    ///
    /// An explicit well-formed override wins and is returned unchecked
    /// against the index (a missing date surfaces as `NotAvailable` from
    /// [`fetch`](Self::fetch) instead). Otherwise the most recent known
    /// date, falling back to today when the index is empty.
    pub async fn resolve_initial_date(&mut self, override_date: Option<&str>) -> DateKey {
        if let Some(raw) = override_date {
            match DateKey::new(raw) {
                Ok(date) => {
                    debug!(date = %date, "Using explicit date override");
                    return date;
                }
                Err(e) => debug!(error = %e, "Ignoring malformed date override"),
            }
        }

        if let Some(latest) = self.index.most_recent(&self.client).await {
            return latest;
        }
        DateKey::today()
    }
}

// ============================================================================
// Tests
// ============================================================================
