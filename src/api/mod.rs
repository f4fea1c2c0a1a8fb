//! HTTP access to the remote recap data repository.
//!
//! This module provides the `RecapClient` for fetching the published file
//! listing and individual dated snapshot documents. The repository is
//! static content; requests carry no authentication.

pub mod client;
pub mod error;

pub use client::{RecapClient, TreeEntry};
pub use error::RecapError;
