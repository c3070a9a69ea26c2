//! filecrypt 密钥材料
//!
//! Key 与 Nonce 都是定长字节序列，从 key / nonce 文件读入后
//! 经过长度校验才会构造出来。
//!
//! 安全约束：
//! - Key 离开作用域后自动清零
//! - Debug 输出不包含任何密钥字节

use std::fmt;

use rand::{RngCore, rngs::OsRng};
use zeroize::Zeroizing;

use crate::error::{FileCryptError, Result};

/// AES-256 密钥长度（256 bit）
pub const KEY_LEN: usize = 32;

/// AES-GCM 使用的 nonce 长度（96 bit，标准推荐值）
pub const NONCE_LEN: usize = 12;

/// GCM 认证标签长度
pub const TAG_LEN: usize = 16;

/// 32 字节对称密钥
pub struct Key(Zeroizing<[u8; KEY_LEN]>);

impl Key {
    /// 从任意长度的字节构造，长度不符时返回 MaterialLength
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let array: [u8; KEY_LEN] = bytes.try_into().map_err(|_| FileCryptError::MaterialLength {
            name: "key",
            expected: KEY_LEN,
            actual: bytes.len(),
        })?;

        Ok(Self(Zeroizing::new(array)))
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Key").field(&"[REDACTED]").finish()
    }
}

/// 12 字节 GCM nonce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Nonce([u8; NONCE_LEN]);

impl Nonce {
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let array: [u8; NONCE_LEN] = bytes.try_into().map_err(|_| FileCryptError::MaterialLength {
            name: "nonce",
            expected: NONCE_LEN,
            actual: bytes.len(),
        })?;

        Ok(Self(array))
    }

    /// 生成全新的随机 nonce
    pub fn random() -> Result<Self> {
        let mut bytes = [0u8; NONCE_LEN];
        fill_random(&mut bytes)?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; NONCE_LEN] {
        &self.0
    }
}

/// 使用操作系统 CSPRNG 填充缓冲区
///
/// 失败时返回错误，而不是留下全零的缓冲区。
pub fn fill_random(buf: &mut [u8]) -> Result<()> {
    OsRng.try_fill_bytes(buf).map_err(FileCryptError::Rng)
}
