//! HTTP client for the remote recap data repository.
//!
//! This module provides the `RecapClient` struct for talking to the static
//! repository that publishes recap snapshots: a git tree listing used to
//! discover which dated files exist, and the raw snapshot documents
//! themselves.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::models::Snapshot;
use crate::utils::date::DateKey;

use super::RecapError;

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
/// The reference behavior waits on a hung remote indefinitely; a bounded
/// wait keeps an interactive caller responsive.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// One entry in the remote repository's flat tree listing.
#[derive(Debug, Clone, Deserialize)]
pub struct TreeEntry {
    pub path: String,
    #[serde(rename = "type")]
    pub entry_type: String,
}

#[derive(Debug, Deserialize)]
struct TreeListing {
    #[serde(default)]
    tree: Vec<TreeEntry>,
}

/// Client for the static recap data repository.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct RecapClient {
    client: Client,
    listing_url: String,
    snapshot_base_url: String,
}

impl RecapClient {
    /// Create a new client for the given listing and snapshot endpoints.
    pub fn new(listing_url: String, snapshot_base_url: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            listing_url,
            snapshot_base_url,
        })
    }

    /// Fetch the flat file listing of the data repository.
    ///
    /// A single attempt; the availability index decides how a failure
    /// degrades.
    pub async fn list_data_files(&self) -> Result<Vec<TreeEntry>> {
        let response = self
            .client
            .get(&self.listing_url)
            .send()
            .await
            .with_context(|| format!("Failed to send listing request to {}", self.listing_url))?;

        if !response.status().is_success() {
            anyhow::bail!("listing request returned status {}", response.status());
        }

        let listing: TreeListing = response
            .json()
            .await
            .context("Failed to parse tree listing")?;

        debug!(entries = listing.tree.len(), "Fetched remote tree listing");
        Ok(listing.tree)
    }

    /// The remote location of one dated snapshot, derived from the key's
    /// year component: `<base>/<year>/recap-<date>.json`.
    pub fn snapshot_url(&self, date: &DateKey) -> String {
        format!(
            "{}/{}/recap-{}.json",
            self.snapshot_base_url,
            date.year(),
            date
        )
    }

    /// Fetch one dated snapshot. A single attempt, no retry.
    pub async fn fetch_snapshot(&self, date: &DateKey) -> Result<Snapshot, RecapError> {
        let url = self.snapshot_url(date);
        debug!(%url, "Fetching recap snapshot");

        let response = self.client.get(&url).send().await?;
        let response = Self::check_response(response).await?;

        let snapshot: Snapshot = response.json().await?;
        Ok(snapshot)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, RecapError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(RecapError::from_status(status, &body))
        }
    }
}
