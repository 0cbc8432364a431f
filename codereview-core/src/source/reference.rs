//! Repository references

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A repository identified by its owner and name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepositoryReference {
    owner: String,
    name: String,
}

impl RepositoryReference {
    /// Create a reference from already-split parts
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Result<Self> {
        let owner = owner.into();
        let name = name.into();
        if owner.is_empty() || name.is_empty() {
            return Err(Error::InvalidReference(format!(
                "owner and name must be non-empty (got '{}/{}')",
                owner, name
            )));
        }
        Ok(Self { owner, name })
    }

    /// Resolve a user-supplied repository string
    ///
    /// Supports formats:
    /// - owner/repo
    /// - https://github.com/owner/repo
    /// - github.com/owner/repo
    /// - git@github.com:owner/repo.git
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();

        if input.starts_with("https://") || input.starts_with("http://") {
            let url = url::Url::parse(input)
                .map_err(|e| Error::InvalidReference(format!("{}: {}", input, e)))?;
            return Self::from_path(url.path(), input);
        }

        if let Some(rest) = input.strip_prefix("git@") {
            let path = rest.split_once(':').map(|(_, path)| path).ok_or_else(|| {
                Error::InvalidReference(format!("Invalid SSH URL: {}", input))
            })?;
            return Self::from_path(path, input);
        }

        if input.contains("://") {
            return Err(Error::InvalidReference(format!(
                "Unrecognized URL format: {}",
                input
            )));
        }

        // Owners never contain a dot, so a dotted first segment is a host
        if let Some((host, path)) = input.split_once('/') {
            if host.contains('.') {
                return Self::from_path(path, input);
            }
        }

        Self::from_path(input, input)
    }

    /// Split a path into exactly two non-empty segments
    fn from_path(path: &str, original: &str) -> Result<Self> {
        let path = path.trim_matches('/');
        let path = path.strip_suffix(".git").unwrap_or(path);
        let parts: Vec<&str> = path.split('/').collect();

        match parts.as_slice() {
            [owner, name] if !owner.is_empty() && !name.is_empty() => Ok(Self {
                owner: owner.to_string(),
                name: name.to_string(),
            }),
            _ => Err(Error::InvalidReference(format!(
                "{}. Expected owner/repo",
                original
            ))),
        }
    }

    /// Get the repository owner
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Get the repository name
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for RepositoryReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepositoryReference {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> (String, String) {
        let r = RepositoryReference::parse(input).unwrap();
        (r.owner().to_string(), r.name().to_string())
    }

    #[test]
    fn test_parse_shorthand() {
        assert_eq!(parse("owner/repo"), ("owner".into(), "repo".into()));
    }

    #[test]
    fn test_parse_https_url() {
        assert_eq!(
            parse("https://github.com/acme/calc"),
            ("acme".into(), "calc".into())
        );
    }

    #[test]
    fn test_parse_https_url_with_git_suffix_and_slash() {
        assert_eq!(
            parse("https://github.com/acme/calc.git"),
            ("acme".into(), "calc".into())
        );
        assert_eq!(
            parse("https://github.com/acme/calc/"),
            ("acme".into(), "calc".into())
        );
    }

    #[test]
    fn test_parse_url_without_scheme() {
        assert_eq!(
            parse("github.com/acme/calc"),
            ("acme".into(), "calc".into())
        );
        assert_eq!(
            parse("www.github.com/acme/calc.git"),
            ("acme".into(), "calc".into())
        );
        assert!(RepositoryReference::parse("github.com/acme").is_err());
    }

    #[test]
    fn test_dotted_repository_name_is_not_a_host() {
        assert_eq!(
            parse("acme/calc.js"),
            ("acme".into(), "calc.js".into())
        );
    }

    #[test]
    fn test_parse_ssh_url() {
        assert_eq!(
            parse("git@github.com:owner/repo.git"),
            ("owner".into(), "repo".into())
        );
    }

    #[test]
    fn test_single_segment_is_invalid() {
        let err = RepositoryReference::parse("invalid").unwrap_err();
        assert!(matches!(err, Error::InvalidReference(_)));
    }

    #[test]
    fn test_extra_segments_are_invalid() {
        assert!(RepositoryReference::parse("https://github.com/acme/calc/tree/main").is_err());
        assert!(RepositoryReference::parse("a/b/c").is_err());
    }

    #[test]
    fn test_empty_segment_is_invalid() {
        assert!(RepositoryReference::parse("acme/").is_err());
        assert!(RepositoryReference::parse("/calc").is_err());
        assert!(RepositoryReference::parse("https://github.com/").is_err());
        assert!(RepositoryReference::parse("").is_err());
    }

    #[test]
    fn test_unknown_scheme_is_invalid() {
        assert!(RepositoryReference::parse("ftp://github.com/acme/calc").is_err());
    }

    #[test]
    fn test_new_rejects_empty_parts() {
        assert!(RepositoryReference::new("", "calc").is_err());
        assert!(RepositoryReference::new("acme", "calc").is_ok());
    }

    #[test]
    fn test_display() {
        let r = RepositoryReference::new("acme", "calc").unwrap();
        assert_eq!(r.to_string(), "acme/calc");
    }
}
