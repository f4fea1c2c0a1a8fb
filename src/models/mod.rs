//! Data models for recap payloads.
//!
//! - `Snapshot`: one day's contributor leaderboard
//! - `Contributor`: a single ranked entry with avatar and edit counts

pub mod snapshot;

pub use snapshot::{Contributor, Snapshot};
