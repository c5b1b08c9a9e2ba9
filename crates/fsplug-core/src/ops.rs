//! Single-entry operations: read, write, mkdir, delete, copy, move, stat.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::info;

use crate::error::{FsError, Result};
use crate::metadata::FileStat;

/// Text encoding for file payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    #[default]
    Utf8,
    Base64,
}

impl FromStr for Encoding {
    type Err = FsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "utf8" | "utf-8" => Ok(Self::Utf8),
            "base64" => Ok(Self::Base64),
            _ => Err(FsError::UnsupportedEncoding(s.to_string())),
        }
    }
}

impl std::fmt::Display for Encoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Utf8 => write!(f, "utf8"),
            Self::Base64 => write!(f, "base64"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileContent {
    pub path: PathBuf,
    pub content: String,
    pub size: u64,
    pub modified: DateTime<Utc>,
    pub encoding: Encoding,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WriteReceipt {
    pub path: PathBuf,
    pub size: u64,
    pub modified: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferReceipt {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub size: u64,
}

pub async fn read_file(path: &Path, encoding: Encoding, max_size: u64) -> Result<FileContent> {
    let meta = fs::metadata(path).await.map_err(|e| FsError::root(path, e))?;
    if meta.len() > max_size {
        return Err(FsError::FileTooLarge {
            path: path.to_path_buf(),
            size: meta.len(),
            limit: max_size,
        });
    }
    let bytes = fs::read(path).await.map_err(|e| FsError::root(path, e))?;
    // Invalid UTF-8 sequences decode to U+FFFD rather than failing the read.
    let content = match encoding {
        Encoding::Utf8 => String::from_utf8_lossy(&bytes).into_owned(),
        Encoding::Base64 => BASE64.encode(&bytes),
    };
    Ok(FileContent {
        path: path.to_path_buf(),
        content,
        size: meta.len(),
        modified: modified_of(&meta),
        encoding,
    })
}

pub async fn write_file(
    path: &Path,
    content: &str,
    encoding: Encoding,
    create_directories: bool,
) -> Result<WriteReceipt> {
    let bytes = match encoding {
        Encoding::Utf8 => content.as_bytes().to_vec(),
        Encoding::Base64 => BASE64.decode(content)?,
    };
    if create_directories {
        create_parent(path, "write").await?;
    }
    fs::write(path, &bytes)
        .await
        .map_err(|e| FsError::io("write", path, e))?;
    let meta = fs::metadata(path)
        .await
        .map_err(|e| FsError::io("write", path, e))?;
    info!(path = %path.display(), bytes = bytes.len(), "file written");
    Ok(WriteReceipt {
        path: path.to_path_buf(),
        size: meta.len(),
        modified: modified_of(&meta),
    })
}

pub async fn create_directory(path: &Path, recursive: bool) -> Result<()> {
    let res = if recursive {
        fs::create_dir_all(path).await
    } else {
        fs::create_dir(path).await
    };
    res.map_err(|e| FsError::io("create directory", path, e))?;
    info!(path = %path.display(), recursive, "directory created");
    Ok(())
}

/// Remove a single file. Directories are rejected by the OS.
pub async fn delete_file(path: &Path) -> Result<()> {
    fs::remove_file(path).await.map_err(|e| FsError::root(path, e))?;
    info!(path = %path.display(), "file deleted");
    Ok(())
}

pub async fn delete_directory(path: &Path, recursive: bool) -> Result<()> {
    let res = if recursive {
        fs::remove_dir_all(path).await
    } else {
        fs::remove_dir(path).await
    };
    res.map_err(|e| FsError::root(path, e))?;
    info!(path = %path.display(), recursive, "directory deleted");
    Ok(())
}

/// Copy `source` over `destination`. Copying a file onto itself (same path
/// or an alias of it) leaves the content untouched.
pub async fn copy_file(source: &Path, destination: &Path, overwrite: bool) -> Result<TransferReceipt> {
    let source_meta = fs::metadata(source).await.map_err(|e| FsError::root(source, e))?;
    if !overwrite {
        ensure_vacant(destination).await?;
    }
    if same_file(source, &source_meta, destination).await {
        info!(path = %source.display(), "copy onto itself, nothing to do");
        return Ok(TransferReceipt {
            source: source.to_path_buf(),
            destination: destination.to_path_buf(),
            size: source_meta.len(),
        });
    }
    create_parent(destination, "copy").await?;
    fs::copy(source, destination)
        .await
        .map_err(|e| FsError::io("copy", source, e))?;
    let size = destination_size(destination, "copy").await?;
    info!(from = %source.display(), to = %destination.display(), size, "file copied");
    Ok(TransferReceipt {
        source: source.to_path_buf(),
        destination: destination.to_path_buf(),
        size,
    })
}

/// Rename within one filesystem; cross-device moves are not attempted.
pub async fn move_file(source: &Path, destination: &Path, overwrite: bool) -> Result<TransferReceipt> {
    fs::symlink_metadata(source)
        .await
        .map_err(|e| FsError::root(source, e))?;
    if !overwrite {
        ensure_vacant(destination).await?;
    }
    create_parent(destination, "move").await?;
    fs::rename(source, destination)
        .await
        .map_err(|e| FsError::io("move", source, e))?;
    let size = destination_size(destination, "move").await?;
    info!(from = %source.display(), to = %destination.display(), "file moved");
    Ok(TransferReceipt {
        source: source.to_path_buf(),
        destination: destination.to_path_buf(),
        size,
    })
}

pub async fn stat(path: &Path) -> Result<FileStat> {
    let meta = fs::metadata(path).await.map_err(|e| FsError::root(path, e))?;
    let absolute = std::path::absolute(path).map_err(|e| FsError::root(path, e))?;
    Ok(FileStat::project(&meta, absolute))
}

/// Fails with `DestinationCollision` when `path` exists. A missing path is
/// fine; any other lookup failure is reported as-is.
async fn ensure_vacant(path: &Path) -> Result<()> {
    match fs::symlink_metadata(path).await {
        Ok(_) => Err(FsError::DestinationCollision {
            path: path.to_path_buf(),
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(FsError::io("check destination", path, e)),
    }
}

/// Whether `path` names the same file as `source`, whose metadata is given.
#[cfg(unix)]
async fn same_file(_source: &Path, source_meta: &std::fs::Metadata, path: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;
    match fs::metadata(path).await {
        Ok(meta) => meta.dev() == source_meta.dev() && meta.ino() == source_meta.ino(),
        Err(_) => false,
    }
}

#[cfg(not(unix))]
async fn same_file(source: &Path, _source_meta: &std::fs::Metadata, path: &Path) -> bool {
    match (fs::canonicalize(source).await, fs::canonicalize(path).await) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

async fn create_parent(path: &Path, op: &'static str) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent)
            .await
            .map_err(|e| FsError::io(op, parent, e)),
        _ => Ok(()),
    }
}

async fn destination_size(path: &Path, op: &'static str) -> Result<u64> {
    fs::metadata(path)
        .await
        .map(|m| m.len())
        .map_err(|e| FsError::io(op, path, e))
}

fn modified_of(meta: &std::fs::Metadata) -> DateTime<Utc> {
    meta.modified().map(DateTime::<Utc>::from).unwrap_or_default()
}
