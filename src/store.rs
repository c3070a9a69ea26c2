//! filecrypt 密钥材料存储
//!
//! 管理状态目录下的两个平面文件：
//! - `key`：32 字节原始密钥
//! - `nonce`：12 字节原始 nonce（仅 Persisted 模式使用）
//!
//! 流程（key 与 nonce 相同）：
//! 1. 文件不存在时，用 CSPRNG 生成，写入 0o600 临时文件后不覆盖地发布
//! 2. 读回文件内容
//! 3. 校验长度，不符即报错，不会进入任何密码学操作

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;
use zeroize::Zeroizing;

use crate::crypto::material::{KEY_LEN, Key, Nonce, fill_random};
use crate::error::{FileCryptError, Result};
use crate::fs::atomic;

pub const KEY_FILE_NAME: &str = "key";
pub const NONCE_FILE_NAME: &str = "nonce";

#[derive(Debug, Clone)]
pub struct KeyStore {
    dir: PathBuf,
}

impl KeyStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn key_path(&self) -> PathBuf {
        self.dir.join(KEY_FILE_NAME)
    }

    pub fn nonce_path(&self) -> PathBuf {
        self.dir.join(NONCE_FILE_NAME)
    }

    /// 读取密钥，不存在时先生成
    pub fn ensure_key(&self) -> Result<Key> {
        let bytes = self.ensure_material(KEY_FILE_NAME, &self.key_path(), KEY_LEN)?;
        Key::from_slice(&bytes)
    }

    /// 读取 nonce，不存在时先生成
    ///
    /// `size` 为 AEAD 要求的 nonce 长度。
    pub fn ensure_nonce(&self, size: usize) -> Result<Nonce> {
        let bytes = self.ensure_material(NONCE_FILE_NAME, &self.nonce_path(), size)?;
        Nonce::from_slice(&bytes)
    }

    fn ensure_material(
        &self,
        name: &'static str,
        path: &Path,
        len: usize,
    ) -> Result<Zeroizing<Vec<u8>>> {
        if !path.exists() {
            info!(file = name, "{name} does not exist, creating new one");
            create_material(name, path, len)?;
        }

        let bytes = Zeroizing::new(
            std::fs::read(path).map_err(FileCryptError::io("read", path))?,
        );

        if bytes.len() != len {
            return Err(FileCryptError::MaterialLength {
                name,
                expected: len,
                actual: bytes.len(),
            });
        }

        info!(file = name, bytes = bytes.len(), "read {name}");
        Ok(bytes)
    }
}

/// 生成并发布新材料
///
/// 内容先写入临时文件，再以不覆盖的方式发布：
/// 并发的首次运行中只有一个写入者生效，其余读取胜出者的文件。
fn create_material(name: &'static str, path: &Path, len: usize) -> Result<()> {
    let mut bytes = Zeroizing::new(vec![0u8; len]);
    fill_random(&mut bytes)?;

    let published = atomic::publish_new(path, |file| file.write_all(&bytes))
        .map_err(FileCryptError::io("create", path))?;

    if published {
        info!(file = name, bytes = len, "{name} saved");
    } else {
        info!(file = name, "{name} created concurrently, using existing file");
    }
    Ok(())
}
