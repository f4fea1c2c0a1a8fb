//! Recap snapshot payload published by the data repository.

use serde::{Deserialize, Serialize};

/// One day's contributor leaderboard.
///
/// Created remotely once per date, fetched at most once per local cache
/// instance unless evicted, and never mutated locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub total_contributors: u64,
    #[serde(default)]
    pub contributors: Vec<Contributor>,
}

/// A ranked contributor entry within a [`Snapshot`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contributor {
    pub user_id: i64,
    pub user_name: String,
    /// Raw HTML fragment holding the avatar `<img>` tag; see
    /// [`crate::recap::avatar_url`] for extraction.
    #[serde(default)]
    pub avatar: String,
    pub contributions: u64,
    #[serde(default)]
    pub contributions_text: String,
    #[serde(default)]
    pub is_admin: bool,
}
