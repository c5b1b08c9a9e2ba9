//! Projection of raw filesystem metadata into the attribute sets returned by
//! listing, search and stat.

use std::fs::Metadata;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const READ_MASK: u32 = 0o444;
const WRITE_MASK: u32 = 0o222;
const EXEC_MASK: u32 = 0o111;

/// Entry classification. Anything the stat call does not report as a
/// directory (symlink targets, sockets, devices) is a `File`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

impl EntryKind {
    pub fn of(meta: &Metadata) -> Self {
        if meta.is_dir() {
            Self::Directory
        } else {
            Self::File
        }
    }

    pub fn is_dir(self) -> bool {
        self == Self::Directory
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Directory => write!(f, "directory"),
        }
    }
}

/// Structured attributes of one filesystem entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryMetadata {
    pub name: String,
    pub path: PathBuf,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub size: u64,
    pub modified: DateTime<Utc>,
    /// Octal rendering of the raw mode, file-type bits included.
    pub permissions: String,
    pub is_readable: bool,
    pub is_writable: bool,
    pub is_executable: bool,
}

impl EntryMetadata {
    pub fn project(meta: &Metadata, name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        let mode = raw_mode(meta);
        let flags = ModeFlags::from_mode(mode);
        Self {
            name: name.into(),
            path: path.into(),
            kind: EntryKind::of(meta),
            size: meta.len(),
            modified: timestamp(meta.modified()),
            permissions: format!("{mode:o}"),
            is_readable: flags.readable,
            is_writable: flags.writable,
            is_executable: flags.executable,
        }
    }
}

/// Full stat record for a single path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileStat {
    pub path: PathBuf,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub size: u64,
    /// Not every filesystem records a birth time.
    pub created: Option<DateTime<Utc>>,
    pub modified: DateTime<Utc>,
    pub accessed: DateTime<Utc>,
    pub permissions: String,
    pub is_readable: bool,
    pub is_writable: bool,
    pub is_executable: bool,
}

impl FileStat {
    pub fn project(meta: &Metadata, absolute_path: impl Into<PathBuf>) -> Self {
        let mode = raw_mode(meta);
        let flags = ModeFlags::from_mode(mode);
        Self {
            path: absolute_path.into(),
            kind: EntryKind::of(meta),
            size: meta.len(),
            created: meta.created().ok().map(DateTime::<Utc>::from),
            modified: timestamp(meta.modified()),
            accessed: timestamp(meta.accessed()),
            permissions: format!("{mode:o}"),
            is_readable: flags.readable,
            is_writable: flags.writable,
            is_executable: flags.executable,
        }
    }
}

/// Coarse read/write/execute flags: set when any of owner, group or other
/// holds the bit. Not a capability check against the calling user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeFlags {
    pub readable: bool,
    pub writable: bool,
    pub executable: bool,
}

impl ModeFlags {
    pub fn from_mode(mode: u32) -> Self {
        Self {
            readable: mode & READ_MASK != 0,
            writable: mode & WRITE_MASK != 0,
            executable: mode & EXEC_MASK != 0,
        }
    }
}

#[cfg(unix)]
pub fn raw_mode(meta: &Metadata) -> u32 {
    use std::os::unix::fs::MetadataExt;
    meta.mode()
}

#[cfg(not(unix))]
pub fn raw_mode(meta: &Metadata) -> u32 {
    let base = if meta.is_dir() { 0o40755 } else { 0o100644 };
    if meta.permissions().readonly() {
        base & !WRITE_MASK
    } else {
        base
    }
}

fn timestamp(time: std::io::Result<SystemTime>) -> DateTime<Utc> {
    DateTime::<Utc>::from(time.unwrap_or(UNIX_EPOCH))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn mode_flags_use_any_class_bit() {
        assert_eq!(
            ModeFlags::from_mode(0o100644),
            ModeFlags {
                readable: true,
                writable: true,
                executable: false
            }
        );
        let other_exec = ModeFlags::from_mode(0o001);
        assert!(other_exec.executable);
        assert!(!other_exec.readable);
        assert_eq!(
            ModeFlags::from_mode(0),
            ModeFlags {
                readable: false,
                writable: false,
                executable: false
            }
        );
    }

    #[test]
    fn projects_file_and_directory() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.txt");
        std::fs::write(&file, b"hello").unwrap();

        let meta = std::fs::metadata(&file).unwrap();
        let entry = EntryMetadata::project(&meta, "a.txt", &file);
        assert_eq!(entry.kind, EntryKind::File);
        assert_eq!(entry.size, 5);
        assert_eq!(entry.name, "a.txt");
        assert!(entry.is_readable);

        let meta = std::fs::metadata(dir.path()).unwrap();
        let entry = EntryMetadata::project(&meta, "root", dir.path());
        assert_eq!(entry.kind, EntryKind::Directory);
    }

    #[cfg(unix)]
    #[test]
    fn permissions_are_octal_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let file = dir.path().join("script.sh");
        std::fs::write(&file, b"#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&file, std::fs::Permissions::from_mode(0o750)).unwrap();

        let meta = std::fs::metadata(&file).unwrap();
        let entry = EntryMetadata::project(&meta, "script.sh", &file);
        assert_eq!(entry.permissions, "100750");
        assert!(entry.is_executable);
        assert!(entry.is_writable);
    }

    #[test]
    fn serializes_kind_as_type() {
        let dir = TempDir::new().unwrap();
        let meta = std::fs::metadata(dir.path()).unwrap();
        let entry = EntryMetadata::project(&meta, "d", dir.path());
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["type"], "directory");
        assert!(value.get("isReadable").is_some());
    }
}
