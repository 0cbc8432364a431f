//! Content aggregation

use futures_util::stream::{self, StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{ContentSource, TreeEntry};
use crate::Result;

/// Bullet prefix for each line of the file listing
const LISTING_BULLET: &str = "• ";

/// A downloaded file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub path: String,
    pub content: String,
}

/// All of a repository's content plus a readable listing of its files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedPayload {
    /// Every file as a labeled block, in traversal order
    pub content: String,
    /// One bullet line per file path, in traversal order
    pub listing: String,
}

impl AggregatedPayload {
    /// Build the payload from downloaded files and the entries they came from
    pub fn build(entries: &[TreeEntry], records: &[FileRecord]) -> Self {
        let content = records.iter().map(format_block).collect::<String>();
        let listing = entries
            .iter()
            .filter(|e| e.is_file())
            .map(|e| format!("{}{}", LISTING_BULLET, e.path))
            .collect::<Vec<_>>()
            .join("\n");

        Self { content, listing }
    }
}

fn format_block(record: &FileRecord) -> String {
    format!("File: {}\nContent:\n{}\n\n", record.path, record.content)
}

/// Download every file entry and combine them into one payload
///
/// Up to `concurrency` downloads are in flight at once; results keep traversal
/// order regardless. The first failed download aborts the aggregation.
pub async fn aggregate(
    source: &dyn ContentSource,
    entries: &[TreeEntry],
    concurrency: usize,
) -> Result<AggregatedPayload> {
    let records: Vec<FileRecord> = stream::iter(entries.iter().filter(|e| e.is_file()))
        .map(|entry| async move {
            debug!(path = %entry.path, "Downloading file");
            let content = source.fetch(&entry.locator).await?;
            Ok::<_, crate::Error>(FileRecord {
                path: entry.path.clone(),
                content,
            })
        })
        .buffered(concurrency.max(1))
        .try_collect::<Vec<_>>()
        .await?;

    let payload = AggregatedPayload::build(entries, &records);
    info!(
        files = records.len(),
        bytes = payload.content.len(),
        "Aggregated repository content"
    );
    Ok(payload)
}
