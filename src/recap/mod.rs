//! Recap fetch service.
//!
//! This module provides the `RecapService` that the presentation layer
//! drives: cache-first snapshot retrieval, availability-gated remote
//! fetching, and initial-date resolution.

pub mod service;

pub use service::{avatar_url, permalink, RecapService};
