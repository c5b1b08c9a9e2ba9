use serde::{Deserialize, Serialize};

/// Default read limit for `read_file` and file resources (10 MiB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Default `max_depth` for searches that do not specify one.
pub const DEFAULT_SEARCH_DEPTH: usize = 10;

/// Runtime configuration for a [`FileSystem`](crate::FileSystem).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FsConfig {
    /// Largest file `read_file` will load, in bytes.
    pub max_file_size: u64,
    /// Gates write, create-directory, copy and move.
    pub enable_write: bool,
    /// Gates delete-file and delete-directory.
    pub enable_delete: bool,
    /// Depth used when a search query leaves `max_depth` unset.
    pub search_depth_limit: usize,
}

impl Default for FsConfig {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            enable_write: true,
            enable_delete: false,
            search_depth_limit: DEFAULT_SEARCH_DEPTH,
        }
    }
}

impl FsConfig {
    pub fn builder() -> FsConfigBuilder {
        FsConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`FsConfig`].
pub struct FsConfigBuilder {
    config: FsConfig,
}

impl FsConfigBuilder {
    pub fn max_file_size(mut self, bytes: u64) -> Self {
        self.config.max_file_size = bytes;
        self
    }

    pub fn enable_write(mut self, enabled: bool) -> Self {
        self.config.enable_write = enabled;
        self
    }

    pub fn enable_delete(mut self, enabled: bool) -> Self {
        self.config.enable_delete = enabled;
        self
    }

    /// Clamped to at least 1 so a defaulted search always sees the root.
    pub fn search_depth_limit(mut self, depth: usize) -> Self {
        self.config.search_depth_limit = depth.max(1);
        self
    }

    pub fn build(self) -> FsConfig {
        self.config
    }
}
