//! Mock collaborators

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::analysis::InferenceBackend;
use crate::source::{ContentSource, RepositoryReference, TreeEntry};
use crate::{Error, Result};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Content source serving fixture listings and files by locator
///
/// The root locator for `owner/name` is the string `"owner/name"`. Every call is
/// recorded as `list:<locator>` or `fetch:<locator>`.
#[derive(Debug, Default)]
pub struct MockSource {
    listings: HashMap<String, Vec<TreeEntry>>,
    files: HashMap<String, String>,
    failures: HashMap<String, u16>,
    calls: Mutex<Vec<String>>,
}

impl MockSource {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source for one repository holding flat `(path, content)` files
    pub fn flat(repo: &str, files: &[(&str, &str)]) -> Self {
        let entries = files
            .iter()
            .map(|(path, _)| TreeEntry::file(*path, format!("raw/{}", path)))
            .collect();
        let mut source = Self::new().with_listing(repo, entries);
        for (path, content) in files {
            source = source.with_file(format!("raw/{}", path), *content);
        }
        source
    }

    /// Serve `entries` for a listing call on `locator`
    pub fn with_listing(mut self, locator: impl Into<String>, entries: Vec<TreeEntry>) -> Self {
        self.listings.insert(locator.into(), entries);
        self
    }

    /// Serve `content` for a download call on `locator`
    pub fn with_file(mut self, locator: impl Into<String>, content: impl Into<String>) -> Self {
        self.files.insert(locator.into(), content.into());
        self
    }

    /// Fail any call on `locator` with the given HTTP status
    pub fn with_failure(mut self, locator: impl Into<String>, status: u16) -> Self {
        self.failures.insert(locator.into(), status);
        self
    }

    /// Calls made so far, in order
    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }

    /// Number of calls made so far
    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    fn check_failure(&self, locator: &str) -> Result<()> {
        match self.failures.get(locator) {
            Some(status) => Err(Error::from_status(
                *status,
                format!("GET {} returned {}", locator, status),
            )),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ContentSource for MockSource {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn root_locator(&self, repo: &RepositoryReference) -> String {
        repo.to_string()
    }

    async fn list(&self, locator: &str) -> Result<Vec<TreeEntry>> {
        lock(&self.calls).push(format!("list:{}", locator));
        self.check_failure(locator)?;
        self.listings
            .get(locator)
            .cloned()
            .ok_or_else(|| Error::from_status(404, format!("No listing at {}", locator)))
    }

    async fn fetch(&self, locator: &str) -> Result<String> {
        lock(&self.calls).push(format!("fetch:{}", locator));
        self.check_failure(locator)?;
        self.files
            .get(locator)
            .cloned()
            .ok_or_else(|| Error::from_status(404, format!("No file at {}", locator)))
    }
}

/// Inference backend replaying scripted outcomes in order
///
/// Once the script is exhausted every call fails.
#[derive(Debug, Default)]
pub struct MockBackend {
    script: Mutex<VecDeque<std::result::Result<String, String>>>,
    prompts: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl MockBackend {
    /// Create a backend with an empty script
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a successful response to the script
    pub fn with_response(self, text: impl Into<String>) -> Self {
        lock(&self.script).push_back(Ok(text.into()));
        self
    }

    /// Append a failure to the script
    pub fn with_failure(self, message: impl Into<String>) -> Self {
        lock(&self.script).push_back(Err(message.into()));
        self
    }

    /// Number of completions requested so far
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Prompts received so far, in order
    pub fn prompts(&self) -> Vec<String> {
        lock(&self.prompts).clone()
    }
}

#[async_trait]
impl InferenceBackend for MockBackend {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        lock(&self.prompts).push(prompt.to_string());

        match lock(&self.script).pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(Error::Backend(message)),
            None => Err(Error::Backend("No scripted response left".to_string())),
        }
    }
}
