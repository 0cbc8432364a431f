//! Codereview GitHub - GitHub contents API source for codereview
//!
//! This crate lists repository directories and downloads raw file contents
//! through the GitHub REST API.

mod client;
mod error;

pub use client::GitHubClient;
pub use error::{Error, Result};
