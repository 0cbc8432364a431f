//! Deterministic cache key derivation

/// Separates the namespace from the first part
pub const NAMESPACE_DELIMITER: char = ':';

/// Separates consecutive parts
pub const PART_DELIMITER: char = '|';

/// Namespace for memoized repository payloads
pub const REPOSITORY_NAMESPACE: &str = "github_repo";

/// Namespace for memoized analysis results
pub const ANALYSIS_NAMESPACE: &str = "openai_analysis";

/// Build a cache key from a namespace and ordered parts
///
/// Parts are joined verbatim. No escaping is performed, so a part that itself
/// contains [`PART_DELIMITER`] can collide with a different split of the same text.
pub fn build_key(namespace: &str, parts: &[&str]) -> String {
    let mut key = String::with_capacity(
        namespace.len() + 1 + parts.iter().map(|p| p.len() + 1).sum::<usize>(),
    );
    key.push_str(namespace);
    key.push(NAMESPACE_DELIMITER);
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            key.push(PART_DELIMITER);
        }
        key.push_str(part);
    }
    key
}
