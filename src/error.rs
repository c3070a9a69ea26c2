use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FileCryptError {
    #[error("failed to {action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("file does not exist: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("{name} file has wrong length: got {actual} bytes, want {expected}")]
    MaterialLength {
        name: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("random number generator failure")]
    Rng(#[source] rand::Error),

    #[error("invalid key length for AES-256-GCM")]
    InvalidKey,

    #[error("AEAD encrypt failed")]
    Seal,

    #[error("authentication failed: wrong key or corrupted data")]
    Authentication,

    #[error("ciphertext too short: {0} bytes")]
    Truncated(usize),

    #[error("invalid log filter: {0}")]
    LogFilter(String),
}

pub type Result<T> = std::result::Result<T, FileCryptError>;

impl FileCryptError {
    /// 为 I/O 错误附加操作与路径上下文
    pub(crate) fn io(
        action: &'static str,
        path: impl Into<PathBuf>,
    ) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io {
            action,
            path,
            source,
        }
    }
}
