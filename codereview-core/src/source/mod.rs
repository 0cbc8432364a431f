//! Remote repository content
//!
//! A [`ContentSource`] answers two kinds of call: a listing call returning the
//! entries of one directory, and a download call returning one file's raw text.
//! [`list_tree`] walks the listings depth-first into a flat sequence of files and
//! [`aggregate`] downloads them into an [`AggregatedPayload`].

mod aggregate;
mod reference;
mod tree;

pub use aggregate::{aggregate, AggregatedPayload, FileRecord};
pub use reference::RepositoryReference;
pub use tree::list_tree;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;

/// Kind of node in a repository tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    #[serde(rename = "dir")]
    Directory,
}

/// One node returned by a listing call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    /// Path relative to the repository root
    pub path: String,
    /// File or directory
    pub kind: EntryKind,
    /// Where to fetch this node from: a listing locator for directories,
    /// a raw download locator for files
    pub locator: String,
}

impl TreeEntry {
    /// Create a file entry
    pub fn file(path: impl Into<String>, locator: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::File,
            locator: locator.into(),
        }
    }

    /// Create a directory entry
    pub fn directory(path: impl Into<String>, locator: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Directory,
            locator: locator.into(),
        }
    }

    /// Whether this entry is a file
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }
}

/// Provider of repository listings and file contents
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Get the name of this source
    fn name(&self) -> &'static str;

    /// Locator of the listing call for the repository root
    fn root_locator(&self, repo: &RepositoryReference) -> String;

    /// Execute one listing call, returning entries in provider order
    async fn list(&self, locator: &str) -> Result<Vec<TreeEntry>>;

    /// Download one file's raw content
    async fn fetch(&self, locator: &str) -> Result<String>;
}
