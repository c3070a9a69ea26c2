//! filecrypt 文件读写
//!
//! 整个文件一次性读入内存，结果一次性原子写出，不做分块。

pub mod atomic;
pub mod paths;

use std::io::{self, Write};
use std::path::Path;

use tracing::info;

use crate::error::{FileCryptError, Result};

pub use paths::{decrypted_path, encrypted_path};

/// 读取完整文件内容
///
/// 路径不存在时返回 InputNotFound，其余读取错误返回 Io。
pub fn read_whole(path: &Path) -> Result<Vec<u8>> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(FileCryptError::InputNotFound(path.to_path_buf()));
        }
        Err(e) => return Err(FileCryptError::io("read", path)(e)),
    };
    info!(path = %path.display(), bytes = bytes.len(), "read file");
    Ok(bytes)
}

/// 原子写出完整内容，目标文件权限为仅属主可读写
pub fn write_whole(path: &Path, bytes: &[u8]) -> Result<()> {
    atomic::write_atomic(path, |file| file.write_all(bytes))
        .map_err(FileCryptError::io("write", path))?;

    info!(path = %path.display(), bytes = bytes.len(), "wrote file");
    Ok(())
}
