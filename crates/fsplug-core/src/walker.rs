//! Depth-first directory walker shared by listing and search.
//!
//! The walker owns enumeration, per-entry stat and recursion; the
//! [`Visitor`] decides which names are kept, whether a directory is entered,
//! and what a visited entry turns into. Everything runs sequentially on the
//! calling thread, so at most one directory handle per level is open.

use std::fs::Metadata;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{FsError, Result};

/// Entry name prefix treated as hidden.
pub const HIDDEN_MARKER: char = '.';

pub fn is_hidden(name: &str) -> bool {
    name.starts_with(HIDDEN_MARKER)
}

/// One direct child, stat'ed once.
#[derive(Debug)]
pub struct WalkEntry {
    pub name: String,
    pub path: PathBuf,
    pub metadata: Metadata,
}

impl WalkEntry {
    pub fn is_dir(&self) -> bool {
        self.metadata.is_dir()
    }
}

pub trait Visitor {
    type Node;

    /// Whether a directory at `depth` may be enumerated. Returning false
    /// yields an empty branch without touching the filesystem.
    fn enter(&self, _depth: usize) -> bool {
        true
    }

    /// Name filter applied before the entry is stat'ed.
    fn include(&self, _name: &str) -> bool {
        true
    }

    /// Whether to recurse into a directory entry found at `depth`.
    fn descend(&self, entry: &WalkEntry, depth: usize) -> bool;

    fn visit(&mut self, entry: &WalkEntry, depth: usize) -> Option<Self::Node>;

    /// Receives the outcome of descending into `entry`.
    fn attach(
        &mut self,
        entry: &WalkEntry,
        node: Option<&mut Self::Node>,
        children: Result<Vec<Self::Node>>,
    );

    /// Called when a single child could not be read; the walk continues.
    fn skipped(&mut self, path: &Path, error: &std::io::Error) {
        debug!(path = %path.display(), error = %error, "skipping entry");
    }
}

/// Walk the direct children of `directory`, recursing as the visitor asks.
///
/// Fails only when `directory` itself cannot be enumerated.
pub fn walk<V: Visitor>(directory: &Path, depth: usize, visitor: &mut V) -> Result<Vec<V::Node>> {
    if !visitor.enter(depth) {
        return Ok(Vec::new());
    }

    let entries = std::fs::read_dir(directory).map_err(|e| FsError::root(directory, e))?;
    let mut nodes = Vec::new();

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                visitor.skipped(directory, &e);
                continue;
            }
        };

        let name = entry.file_name().to_string_lossy().into_owned();
        if !visitor.include(&name) {
            continue;
        }

        // The OS path is kept as-is; the lossy name is only for display and matching.
        let path = entry.path();
        let metadata = match std::fs::metadata(&path) {
            Ok(meta) => meta,
            Err(e) => {
                visitor.skipped(&path, &e);
                continue;
            }
        };

        let entry = WalkEntry {
            name,
            path,
            metadata,
        };
        let mut node = visitor.visit(&entry, depth);

        if entry.is_dir() && visitor.descend(&entry, depth) {
            let children = walk(&entry.path, depth + 1, visitor);
            visitor.attach(&entry, node.as_mut(), children);
        }

        nodes.extend(node);
    }

    Ok(nodes)
}
