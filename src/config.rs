//! filecrypt 运行配置
//!
//! 只有命令行参数，不读取环境变量或配置文件。
//! 所有持久化文件（key / nonce / log.json）都位于同一个状态目录下。

use std::path::{Path, PathBuf};

use crate::crypto::aead::NonceMode;
use crate::logging::LOG_FILE_NAME;
use crate::store::KeyStore;

/// 默认日志过滤级别
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// key、nonce 与 log.json 所在目录
    pub state_dir: PathBuf,
    pub nonce_mode: NonceMode,
    /// `EnvFilter` 指令字符串，例如 `info` 或 `filecrypt=debug`
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            state_dir: PathBuf::from("."),
            nonce_mode: NonceMode::default(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Settings {
    /// 以指定目录作为状态目录，其余取默认值
    pub fn in_dir(state_dir: impl AsRef<Path>) -> Self {
        Self {
            state_dir: state_dir.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    pub fn with_nonce_mode(mut self, mode: NonceMode) -> Self {
        self.nonce_mode = mode;
        self
    }

    pub fn key_store(&self) -> KeyStore {
        KeyStore::new(&self.state_dir)
    }

    pub fn log_path(&self) -> PathBuf {
        self.state_dir.join(LOG_FILE_NAME)
    }
}
