use std::path::PathBuf;

/// All errors produced by fsplug-core.
///
/// Only the hard failures surface here. Per-entry failures inside a walk are
/// absorbed by the traversal itself and never reach the caller as an `Err`.
#[derive(Debug, thiserror::Error)]
pub enum FsError {
    #[error("cannot access {}: {source}", path.display())]
    RootUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("destination already exists: {}", path.display())]
    DestinationCollision { path: PathBuf },

    #[error("{op} failed for {}: {source}", path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("file too large: {} is {size} bytes, limit is {limit}", path.display())]
    FileTooLarge { path: PathBuf, size: u64, limit: u64 },

    #[error("unsupported encoding: {0}")]
    UnsupportedEncoding(String),

    #[error("invalid base64 content: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("{operation} is disabled by configuration")]
    OperationDisabled { operation: &'static str },

    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl FsError {
    pub(crate) fn root(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::RootUnreadable {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn io(op: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            op,
            path: path.into(),
            source,
        }
    }

    /// True for the "target exists and overwrite was not requested" case.
    pub fn is_collision(&self) -> bool {
        matches!(self, Self::DestinationCollision { .. })
    }
}

pub type Result<T> = std::result::Result<T, FsError>;
