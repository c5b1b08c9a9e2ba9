pub mod config;
pub mod error;
pub mod listing;
pub mod metadata;
pub mod ops;
pub mod pattern;
pub mod search;
pub mod walker;

use std::path::{Path, PathBuf};

use tracing::debug;

use config::FsConfig;
use error::{FsError, Result};
use listing::ListingNode;
use metadata::FileStat;
use ops::{Encoding, FileContent, TransferReceipt, WriteReceipt};
use search::{SearchQuery, SearchResult};

pub use config::FsConfigBuilder;

/// Entry point for every filesystem operation.
///
/// Holds only configuration; each call builds its own accumulator, so one
/// instance can serve concurrent callers. Traversals run on the blocking
/// pool and stay strictly sequential inside a call.
#[derive(Debug, Clone, Default)]
pub struct FileSystem {
    config: FsConfig,
}

impl FileSystem {
    pub fn new(config: FsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FsConfig {
        &self.config
    }

    /// List `dir`, recursing up to five levels when `recursive` is set.
    pub async fn list_directory(
        &self,
        dir: impl Into<PathBuf>,
        show_hidden: bool,
        recursive: bool,
    ) -> Result<Vec<ListingNode>> {
        let dir = dir.into();
        debug!(path = %dir.display(), show_hidden, recursive, "listing directory");
        tokio::task::spawn_blocking(move || listing::build_listing(&dir, show_hidden, recursive)).await?
    }

    /// Run a search. `max_depth` of `None` falls back to the configured
    /// search depth.
    pub async fn search(
        &self,
        root: impl Into<PathBuf>,
        pattern: &str,
        content: Option<&str>,
        max_depth: Option<usize>,
    ) -> Result<Vec<SearchResult>> {
        let mut query = SearchQuery::new(root, pattern)
            .max_depth(max_depth.unwrap_or(self.config.search_depth_limit));
        if let Some(needle) = content {
            query = query.content(needle);
        }
        self.run_search(query).await
    }

    pub async fn run_search(&self, query: SearchQuery) -> Result<Vec<SearchResult>> {
        debug!(
            root = %query.root.display(),
            pattern = %query.pattern,
            max_depth = query.max_depth,
            "searching"
        );
        tokio::task::spawn_blocking(move || search::search(&query)).await?
    }

    pub async fn read_file(&self, path: &Path, encoding: Encoding) -> Result<FileContent> {
        ops::read_file(path, encoding, self.config.max_file_size).await
    }

    pub async fn write_file(
        &self,
        path: &Path,
        content: &str,
        encoding: Encoding,
        create_directories: bool,
    ) -> Result<WriteReceipt> {
        self.require_write("write-file")?;
        ops::write_file(path, content, encoding, create_directories).await
    }

    pub async fn create_directory(&self, path: &Path, recursive: bool) -> Result<()> {
        self.require_write("create-directory")?;
        ops::create_directory(path, recursive).await
    }

    pub async fn delete_file(&self, path: &Path) -> Result<()> {
        self.require_delete("delete-file")?;
        ops::delete_file(path).await
    }

    pub async fn delete_directory(&self, path: &Path, recursive: bool) -> Result<()> {
        self.require_delete("delete-directory")?;
        ops::delete_directory(path, recursive).await
    }

    pub async fn copy_file(
        &self,
        source: &Path,
        destination: &Path,
        overwrite: bool,
    ) -> Result<TransferReceipt> {
        self.require_write("copy-file")?;
        ops::copy_file(source, destination, overwrite).await
    }

    pub async fn move_file(
        &self,
        source: &Path,
        destination: &Path,
        overwrite: bool,
    ) -> Result<TransferReceipt> {
        self.require_write("move-file")?;
        ops::move_file(source, destination, overwrite).await
    }

    pub async fn stat(&self, path: &Path) -> Result<FileStat> {
        ops::stat(path).await
    }

    fn require_write(&self, operation: &'static str) -> Result<()> {
        if self.config.enable_write {
            Ok(())
        } else {
            Err(FsError::OperationDisabled { operation })
        }
    }

    fn require_delete(&self, operation: &'static str) -> Result<()> {
        if self.config.enable_delete {
            Ok(())
        } else {
            Err(FsError::OperationDisabled { operation })
        }
    }
}
