use std::time::Duration;

use clap::{ArgAction, Parser};
use fsplug_core::config::{FsConfig, DEFAULT_MAX_FILE_SIZE, DEFAULT_SEARCH_DEPTH};

/// Server options, from flags with `FSPLUG_*` environment fallbacks.
#[derive(Debug, Parser)]
#[command(name = "fsplug-mcp", version, about = "Filesystem tools over MCP (JSON-RPC on stdio)")]
pub struct ServerArgs {
    /// Largest file read-file will return, in bytes
    #[arg(long, env = "FSPLUG_MAX_FILE_SIZE", default_value_t = DEFAULT_MAX_FILE_SIZE)]
    pub max_file_size: u64,

    /// Allow write-file, create-directory, copy-file and move-file
    #[arg(long, env = "FSPLUG_ENABLE_WRITE", default_value_t = true, action = ArgAction::Set)]
    pub enable_write: bool,

    /// Allow delete-file and delete-directory
    #[arg(long, env = "FSPLUG_ENABLE_DELETE", default_value_t = false, action = ArgAction::Set)]
    pub enable_delete: bool,

    /// Depth used by search-files when maxDepth is omitted
    #[arg(long, env = "FSPLUG_SEARCH_DEPTH_LIMIT", default_value_t = DEFAULT_SEARCH_DEPTH)]
    pub search_depth_limit: usize,

    /// Abort any single tool call after this many seconds (0 disables)
    #[arg(long, env = "FSPLUG_CALL_TIMEOUT_SECS", default_value_t = 0)]
    pub call_timeout_secs: u64,
}

impl ServerArgs {
    pub fn fs_config(&self) -> FsConfig {
        FsConfig::builder()
            .max_file_size(self.max_file_size)
            .enable_write(self.enable_write)
            .enable_delete(self.enable_delete)
            .search_depth_limit(self.search_depth_limit)
            .build()
    }

    pub fn call_timeout(&self) -> Option<Duration> {
        (self.call_timeout_secs > 0).then(|| Duration::from_secs(self.call_timeout_secs))
    }
}
