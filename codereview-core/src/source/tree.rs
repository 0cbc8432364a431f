//! Recursive tree enumeration

use futures_util::future::BoxFuture;
use tracing::{debug, info};

use super::{ContentSource, EntryKind, RepositoryReference, TreeEntry};
use crate::Result;

/// List every file in a repository, depth-first in pre-order
///
/// Listing calls are issued one at a time in traversal order. A directory's files
/// are placed where the directory appeared before its later siblings are scanned.
/// Any failing listing call, at any depth, aborts the whole walk and nothing
/// gathered so far is returned.
pub async fn list_tree(
    source: &dyn ContentSource,
    repo: &RepositoryReference,
) -> Result<Vec<TreeEntry>> {
    let root = source.root_locator(repo);
    debug!(repo = %repo, source = source.name(), "Listing repository tree");

    let files = walk(source, root, 0).await?;

    info!(repo = %repo, files = files.len(), "Listed repository tree");
    Ok(files)
}

fn walk<'a>(
    source: &'a dyn ContentSource,
    locator: String,
    depth: usize,
) -> BoxFuture<'a, Result<Vec<TreeEntry>>> {
    Box::pin(async move {
        debug!(locator = %locator, depth, "Listing directory");

        let mut files = Vec::new();
        for entry in source.list(&locator).await? {
            match entry.kind {
                EntryKind::File => files.push(entry),
                EntryKind::Directory => {
                    let nested = walk(source, entry.locator, depth + 1).await?;
                    files.extend(nested);
                }
            }
        }
        Ok(files)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockSource;
    use crate::Error;

    fn repo() -> RepositoryReference {
        RepositoryReference::new("acme", "calc").unwrap()
    }

    fn paths(entries: &[TreeEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.path.as_str()).collect()
    }

    #[tokio::test]
    async fn test_flat_tree_keeps_listing_order() {
        let source = MockSource::new().with_listing(
            "acme/calc",
            vec![
                TreeEntry::file("b.py", "raw/b.py"),
                TreeEntry::file("a.py", "raw/a.py"),
                TreeEntry::file("c.py", "raw/c.py"),
            ],
        );

        let files = list_tree(&source, &repo()).await.unwrap();
        assert_eq!(files.len(), 3);
        assert_eq!(paths(&files), vec!["b.py", "a.py", "c.py"]);
    }

    #[tokio::test]
    async fn test_nested_tree_is_depth_first_pre_order() {
        let source = MockSource::new()
            .with_listing(
                "acme/calc",
                vec![
                    TreeEntry::file("fileA", "raw/fileA"),
                    TreeEntry::directory("dir1", "list/dir1"),
                    TreeEntry::file("fileC", "raw/fileC"),
                ],
            )
            .with_listing("list/dir1", vec![TreeEntry::file("dir1/fileB", "raw/fileB")]);

        let files = list_tree(&source, &repo()).await.unwrap();
        assert_eq!(paths(&files), vec!["fileA", "dir1/fileB", "fileC"]);
    }

    #[tokio::test]
    async fn test_deep_nesting_and_empty_directories() {
        let source = MockSource::new()
            .with_listing(
                "acme/calc",
                vec![
                    TreeEntry::directory("a", "list/a"),
                    TreeEntry::directory("empty", "list/empty"),
                    TreeEntry::file("z", "raw/z"),
                ],
            )
            .with_listing(
                "list/a",
                vec![
                    TreeEntry::directory("a/b", "list/a/b"),
                    TreeEntry::file("a/y", "raw/a/y"),
                ],
            )
            .with_listing("list/a/b", vec![TreeEntry::file("a/b/x", "raw/a/b/x")])
            .with_listing("list/empty", vec![]);

        let files = list_tree(&source, &repo()).await.unwrap();
        assert_eq!(paths(&files), vec!["a/b/x", "a/y", "z"]);
    }

    #[tokio::test]
    async fn test_listing_calls_are_sequential_in_traversal_order() {
        let source = MockSource::new()
            .with_listing(
                "acme/calc",
                vec![
                    TreeEntry::directory("d1", "list/d1"),
                    TreeEntry::directory("d2", "list/d2"),
                ],
            )
            .with_listing("list/d1", vec![TreeEntry::file("d1/f", "raw/d1/f")])
            .with_listing("list/d2", vec![TreeEntry::file("d2/f", "raw/d2/f")]);

        list_tree(&source, &repo()).await.unwrap();
        assert_eq!(
            source.calls(),
            vec!["list:acme/calc", "list:list/d1", "list:list/d2"]
        );
    }

    #[tokio::test]
    async fn test_nested_failure_aborts_whole_walk() {
        let source = MockSource::new()
            .with_listing(
                "acme/calc",
                vec![
                    TreeEntry::file("fileA", "raw/fileA"),
                    TreeEntry::directory("dir1", "list/dir1"),
                    TreeEntry::file("fileC", "raw/fileC"),
                ],
            )
            .with_failure("list/dir1", 500);

        let result = list_tree(&source, &repo()).await;
        assert!(matches!(
            result,
            Err(Error::Upstream {
                status: Some(500),
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_root_not_found() {
        let source = MockSource::new().with_failure("acme/calc", 404);
        let result = list_tree(&source, &repo()).await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_failure_stops_further_calls() {
        let source = MockSource::new()
            .with_listing(
                "acme/calc",
                vec![
                    TreeEntry::directory("bad", "list/bad"),
                    TreeEntry::directory("good", "list/good"),
                ],
            )
            .with_failure("list/bad", 403)
            .with_listing("list/good", vec![]);

        assert!(list_tree(&source, &repo()).await.is_err());
        assert_eq!(source.calls(), vec!["list:acme/calc", "list:list/bad"]);
    }
}
