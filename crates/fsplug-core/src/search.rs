use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::DEFAULT_SEARCH_DEPTH;
use crate::error::Result;
use crate::pattern::CompiledPattern;
use crate::walker::{self, Visitor, WalkEntry};

/// Parameters of one search call.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub root: PathBuf,
    pub pattern: String,
    /// Case-insensitive substring the file content must contain.
    pub content: Option<String>,
    /// Directories at this depth or deeper are not enumerated.
    pub max_depth: usize,
}

impl SearchQuery {
    pub fn new(root: impl Into<PathBuf>, pattern: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            pattern: pattern.into(),
            content: None,
            max_depth: DEFAULT_SEARCH_DEPTH,
        }
    }

    pub fn content(mut self, needle: impl Into<String>) -> Self {
        self.content = Some(needle.into());
        self
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}

/// A matched file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
    pub modified: DateTime<Utc>,
}

struct SearchVisitor {
    pattern: CompiledPattern,
    needle: Option<String>,
    max_depth: usize,
    results: Vec<SearchResult>,
}

impl SearchVisitor {
    fn content_matches(&self, path: &Path) -> bool {
        let Some(needle) = &self.needle else {
            return true;
        };
        match std::fs::read(path) {
            Ok(bytes) => String::from_utf8_lossy(&bytes)
                .to_lowercase()
                .contains(needle.as_str()),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "content unreadable, treating as no match");
                false
            }
        }
    }
}

impl Visitor for SearchVisitor {
    type Node = ();

    fn enter(&self, depth: usize) -> bool {
        depth < self.max_depth
    }

    fn descend(&self, _entry: &WalkEntry, _depth: usize) -> bool {
        true
    }

    fn visit(&mut self, entry: &WalkEntry, _depth: usize) -> Option<()> {
        if !entry.metadata.is_file() || !self.pattern.matches(&entry.name) {
            return None;
        }
        if self.content_matches(&entry.path) {
            self.results.push(SearchResult {
                name: entry.name.clone(),
                path: entry.path.clone(),
                size: entry.metadata.len(),
                modified: entry
                    .metadata
                    .modified()
                    .map(DateTime::<Utc>::from)
                    .unwrap_or_default(),
            });
        }
        None
    }

    fn attach(&mut self, entry: &WalkEntry, _node: Option<&mut ()>, children: Result<Vec<()>>) {
        if let Err(e) = children {
            debug!(path = %entry.path.display(), error = %e, "skipping unreadable subdirectory");
        }
    }
}

/// Find files under `query.root` whose name matches the pattern and whose
/// content (when a needle is given) contains it, case-insensitively.
///
/// Never fails as a whole: unreadable directories and files are skipped.
/// Results come back depth-first in directory enumeration order.
pub fn search(query: &SearchQuery) -> Result<Vec<SearchResult>> {
    let mut visitor = SearchVisitor {
        pattern: CompiledPattern::compile(&query.pattern)?,
        needle: query.content.as_ref().map(|n| n.to_lowercase()),
        max_depth: query.max_depth,
        results: Vec::new(),
    };

    if let Err(e) = walker::walk(&query.root, 0, &mut visitor) {
        warn!(root = %query.root.display(), error = %e, "search root unreadable");
    }

    Ok(visitor.results)
}
