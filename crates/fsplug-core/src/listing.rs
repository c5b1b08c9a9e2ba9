use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;
use crate::metadata::EntryMetadata;
use crate::walker::{self, is_hidden, Visitor, WalkEntry};

/// Hard ceiling on listing recursion, independent of the caller.
pub const LISTING_DEPTH_LIMIT: usize = 5;

/// One entry of a directory listing.
///
/// `children` is present only for directories that were recursed into;
/// `error` replaces it when that one descent failed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingNode {
    #[serde(flatten)]
    pub entry: EntryMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<ListingNode>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ListingNode {
    pub fn name(&self) -> &str {
        &self.entry.name
    }

    /// Depth of the deepest node below and including this one (self is 0).
    pub fn height(&self) -> usize {
        self.children
            .iter()
            .flatten()
            .map(|c| c.height() + 1)
            .max()
            .unwrap_or(0)
    }
}

struct ListingVisitor {
    show_hidden: bool,
    recursive: bool,
}

impl Visitor for ListingVisitor {
    type Node = ListingNode;

    fn include(&self, name: &str) -> bool {
        self.show_hidden || !is_hidden(name)
    }

    fn descend(&self, _entry: &WalkEntry, depth: usize) -> bool {
        self.recursive && depth < LISTING_DEPTH_LIMIT
    }

    fn visit(&mut self, entry: &WalkEntry, _depth: usize) -> Option<ListingNode> {
        Some(ListingNode {
            entry: EntryMetadata::project(&entry.metadata, entry.name.clone(), entry.path.clone()),
            children: None,
            error: None,
        })
    }

    fn attach(
        &mut self,
        entry: &WalkEntry,
        node: Option<&mut ListingNode>,
        children: Result<Vec<ListingNode>>,
    ) {
        let Some(node) = node else { return };
        match children {
            Ok(children) => node.children = Some(children),
            Err(e) => {
                warn!(path = %entry.path.display(), error = %e, "subdirectory listing failed");
                node.error = Some(format!("cannot access: {e}"));
            }
        }
    }
}

/// Build a structured listing of `dir`.
///
/// Only an unreadable `dir` is an error; failures further down are attached
/// to the node whose enumeration failed. Order follows the directory
/// enumeration and is not sorted.
pub fn build_listing(dir: &Path, show_hidden: bool, recursive: bool) -> Result<Vec<ListingNode>> {
    let mut visitor = ListingVisitor {
        show_hidden,
        recursive,
    };
    walker::walk(dir, 0, &mut visitor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FsError;
    use crate::metadata::EntryKind;
    use tempfile::TempDir;

    fn names(nodes: &[ListingNode]) -> Vec<String> {
        let mut names: Vec<String> = nodes.iter().map(|n| n.name().to_string()).collect();
        names.sort();
        names
    }

    fn sample_tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.txt"), b"alpha").unwrap();
        std::fs::write(dir.path().join(".hidden"), b"secret").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub/b.log"), b"INFO ok").unwrap();
        dir
    }

    #[test]
    fn non_recursive_listing_has_no_children() {
        let dir = sample_tree();
        let nodes = build_listing(dir.path(), false, false).unwrap();
        assert_eq!(names(&nodes), vec!["a.txt", "sub"]);
        assert!(nodes.iter().all(|n| n.children.is_none() && n.error.is_none()));
    }

    #[test]
    fn recursive_listing_matches_scenario() {
        let dir = sample_tree();
        let nodes = build_listing(dir.path(), false, true).unwrap();
        assert_eq!(names(&nodes), vec!["a.txt", "sub"]);

        let file = nodes.iter().find(|n| n.name() == "a.txt").unwrap();
        assert_eq!(file.entry.kind, EntryKind::File);
        assert_eq!(file.entry.size, 5);
        assert!(file.children.is_none());

        let sub = nodes.iter().find(|n| n.name() == "sub").unwrap();
        assert_eq!(sub.entry.kind, EntryKind::Directory);
        let children = sub.children.as_ref().unwrap();
        assert_eq!(names(children), vec!["b.log"]);
        assert_eq!(children[0].entry.path, dir.path().join("sub").join("b.log"));
    }

    #[test]
    fn show_hidden_includes_dotfiles() {
        let dir = sample_tree();
        let nodes = build_listing(dir.path(), true, false).unwrap();
        assert_eq!(names(&nodes), vec![".hidden", "a.txt", "sub"]);
    }

    #[test]
    fn recursion_is_capped_at_five() {
        let dir = TempDir::new().unwrap();
        let mut deep = dir.path().to_path_buf();
        for i in 0..9 {
            deep = deep.join(format!("d{i}"));
        }
        std::fs::create_dir_all(&deep).unwrap();
        std::fs::write(deep.join("bottom.txt"), b"").unwrap();

        let nodes = build_listing(dir.path(), false, true).unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].height(), LISTING_DEPTH_LIMIT);

        // The deepest listed node is a plain entry: no children, no error.
        let mut node = &nodes[0];
        while let Some(children) = node.children.as_ref() {
            assert!(node.error.is_none());
            node = &children[0];
        }
        assert_eq!(node.name(), "d5");
        assert!(node.error.is_none());
    }

    #[test]
    fn unreadable_root_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = build_listing(&dir.path().join("missing"), false, true).unwrap_err();
        assert!(matches!(err, FsError::RootUnreadable { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_subdirectory_gets_node_error() {
        use std::os::unix::fs::PermissionsExt;

        let dir = sample_tree();
        let locked = dir.path().join("locked");
        std::fs::create_dir(&locked).unwrap();
        std::fs::write(locked.join("x.txt"), b"").unwrap();
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o000)).unwrap();

        // Root bypasses permission bits; nothing to assert in that case.
        let readable_anyway = std::fs::read_dir(&locked).is_ok();

        let nodes = build_listing(dir.path(), false, true).unwrap();
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();

        let node = nodes.iter().find(|n| n.name() == "locked").unwrap();
        if !readable_anyway {
            assert!(node.children.is_none());
            assert!(node.error.as_deref().unwrap().starts_with("cannot access"));
        }
        // Siblings are still present.
        assert!(nodes.iter().any(|n| n.name() == "sub" && n.children.is_some()));
    }

    #[cfg(unix)]
    #[test]
    fn dangling_symlink_is_skipped() {
        let dir = sample_tree();
        std::os::unix::fs::symlink(dir.path().join("nowhere"), dir.path().join("broken")).unwrap();
        let nodes = build_listing(dir.path(), false, false).unwrap();
        assert_eq!(names(&nodes), vec!["a.txt", "sub"]);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn non_utf8_names_are_listed() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(OsStr::from_bytes(b"caf\xe9.txt")), b"").unwrap();
        std::fs::write(dir.path().join("plain.txt"), b"").unwrap();

        let nodes = build_listing(dir.path(), false, false).unwrap();
        assert_eq!(nodes.len(), 2);
        assert!(nodes.iter().any(|n| n.name() == "caf\u{FFFD}.txt"));
        assert!(nodes.iter().all(|n| n.entry.path.exists()));
    }

    #[test]
    fn serialized_node_is_flat() {
        let dir = sample_tree();
        let nodes = build_listing(dir.path(), false, true).unwrap();
        let value = serde_json::to_value(&nodes).unwrap();
        let sub = value
            .as_array()
            .unwrap()
            .iter()
            .find(|v| v["name"] == "sub")
            .unwrap();
        assert_eq!(sub["type"], "directory");
        assert!(sub["children"].is_array());
        assert!(sub.get("error").is_none());
    }
}
