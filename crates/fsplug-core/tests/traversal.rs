//! End-to-end traversal behaviour through the public `FileSystem` facade.

use std::path::Path;

use fsplug_core::config::FsConfig;
use fsplug_core::listing::{ListingNode, LISTING_DEPTH_LIMIT};
use fsplug_core::metadata::EntryKind;
use fsplug_core::FileSystem;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

/// A tree with dotfiles and dot-directories sprinkled at several levels.
fn mixed_tree() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "a.txt", "alpha");
    write(root, ".env", "SECRET=1");
    write(root, "src/main.rs", "fn main() {}");
    write(root, "src/.cache/blob", "x");
    write(root, "src/lib/.keep", "");
    write(root, "src/lib/mod.rs", "// ERROR handling");
    write(root, ".git/config", "[core]");
    write(root, "docs/guide/intro.md", "Intro");
    dir
}

fn walk_nodes<'a>(nodes: &'a [ListingNode], depth: usize, out: &mut Vec<(usize, &'a ListingNode)>) {
    for node in nodes {
        out.push((depth, node));
        if let Some(children) = &node.children {
            walk_nodes(children, depth + 1, out);
        }
    }
}

#[tokio::test]
async fn hidden_entries_never_listed_at_any_depth() {
    let dir = mixed_tree();
    let fs = FileSystem::default();
    let nodes = fs.list_directory(dir.path(), false, true).await.unwrap();

    let mut all = Vec::new();
    walk_nodes(&nodes, 0, &mut all);
    assert!(!all.is_empty());
    assert!(all.iter().all(|(_, n)| !n.name().starts_with('.')));

    let mut names: Vec<&str> = all.iter().map(|(_, n)| n.name()).collect();
    names.sort();
    assert_eq!(
        names,
        vec!["a.txt", "docs", "guide", "intro.md", "lib", "main.rs", "mod.rs", "src"]
    );
}

#[tokio::test]
async fn show_hidden_lists_dot_directories_recursively() {
    let dir = mixed_tree();
    let fs = FileSystem::default();
    let nodes = fs.list_directory(dir.path(), true, true).await.unwrap();

    let git = nodes.iter().find(|n| n.name() == ".git").unwrap();
    assert_eq!(git.entry.kind, EntryKind::Directory);
    let children = git.children.as_ref().unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].name(), "config");
}

#[tokio::test]
async fn listing_depth_never_exceeds_limit() {
    let dir = TempDir::new().unwrap();
    let mut rel = String::new();
    for i in 0..12 {
        rel.push_str(&format!("level{i}/"));
        write(dir.path(), &format!("{rel}file{i}.txt"), "");
    }

    let fs = FileSystem::default();
    let nodes = fs.list_directory(dir.path(), false, true).await.unwrap();

    let mut all = Vec::new();
    walk_nodes(&nodes, 0, &mut all);
    let deepest = all.iter().map(|(d, _)| *d).max().unwrap();
    assert_eq!(deepest, LISTING_DEPTH_LIMIT);
    assert!(all.iter().all(|(_, n)| n.error.is_none()));
}

#[tokio::test]
async fn search_scenario_from_log_tree() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "sub/b.log", "INFO ok");
    write(dir.path(), "sub/c.log", "ERROR fail");

    let fs = FileSystem::default();
    let results = fs
        .search(dir.path(), "*.log", Some("ERROR"), Some(10))
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].path, dir.path().join("sub").join("c.log"));
}

#[tokio::test]
async fn search_results_respect_max_depth() {
    let dir = TempDir::new().unwrap();
    let mut rel = String::new();
    for i in 0..6 {
        write(dir.path(), &format!("{rel}hit{i}.txt"), "");
        rel.push_str(&format!("d{i}/"));
    }

    let fs = FileSystem::default();
    for max_depth in 1..=6 {
        let results = fs
            .search(dir.path(), "hit*.txt", None, Some(max_depth))
            .await
            .unwrap();
        assert_eq!(results.len(), max_depth);
        for r in &results {
            let depth = r.path.strip_prefix(dir.path()).unwrap().components().count() - 1;
            assert!(depth < max_depth, "{} at depth {depth}", r.path.display());
        }
    }
}

#[tokio::test]
async fn search_content_without_name_match_is_excluded() {
    let dir = mixed_tree();
    let fs = FileSystem::new(FsConfig::default());
    let results = fs.search(dir.path(), "*.rs", Some("error"), None).await.unwrap();
    let names: Vec<&str> = results.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["mod.rs"]);

    let results = fs.search(dir.path(), "*.md", Some("error"), None).await.unwrap();
    assert!(results.is_empty());
}
