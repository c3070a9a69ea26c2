//! filecrypt AEAD 会话
//!
//! 本模块基于 AES-256-GCM 实现 AEAD（Authenticated Encryption
//! with Associated Data）。
//!
//! 功能说明：
//! - Session 由校验过的 Key 与 nonce 策略一次性构造，之后只读
//! - seal / open 均不使用关联数据（AAD）
//! - 解密失败即表示：密钥错误 或 数据被篡改
//!
//! 密文布局：
//! - Persisted：`ciphertext || tag`，nonce 来自 nonce 文件
//! - Random：`nonce(12) || ciphertext || tag`，每次 seal 生成新 nonce
//!
//! 安全约束：
//! - 不允许在未校验通过的情况下输出任何明文
//! - Persisted 模式下同一 (key, nonce) 会被多次使用，需要唯一 nonce 时使用 Random 模式

use std::fmt;

use aes_gcm::{
    Aes256Gcm,
    aead::{Aead, KeyInit},
};
use tracing::debug;
use zeroize::Zeroizing;

use crate::crypto::material::{Key, NONCE_LEN, Nonce, TAG_LEN};
use crate::error::{FileCryptError, Result};
use crate::store::KeyStore;

/// nonce 的来源
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NonceMode {
    /// 读取（必要时生成）持久化的 nonce 文件，所有加密共用
    #[default]
    Persisted,
    /// 每次加密生成新 nonce，并写在密文前面
    Random,
}

/// 会话实际持有的 nonce 策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonceStrategy {
    Fixed(Nonce),
    PerMessage,
}

/// AES-256-GCM 会话
pub struct Session {
    cipher: Aes256Gcm,
    strategy: NonceStrategy,
}

impl Session {
    /// GCM 要求的 nonce 长度
    pub const NONCE_SIZE: usize = NONCE_LEN;

    pub fn new(key: &Key, strategy: NonceStrategy) -> Result<Self> {
        let cipher =
            Aes256Gcm::new_from_slice(key.as_bytes()).map_err(|_| FileCryptError::InvalidKey)?;

        Ok(Self { cipher, strategy })
    }

    /// 从 KeyStore 读取材料并构造会话
    ///
    /// Random 模式不会读取或创建 nonce 文件。
    pub fn load(store: &KeyStore, mode: NonceMode) -> Result<Self> {
        let key = store.ensure_key()?;

        let strategy = match mode {
            NonceMode::Persisted => NonceStrategy::Fixed(store.ensure_nonce(Self::NONCE_SIZE)?),
            NonceMode::Random => NonceStrategy::PerMessage,
        };

        debug!(?mode, "session initialized");
        Self::new(&key, strategy)
    }

    /// 加密并认证
    ///
    /// 返回的字节布局取决于 nonce 策略，见模块文档。
    pub fn seal(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        match self.strategy {
            NonceStrategy::Fixed(nonce) => self.seal_with(&nonce, plaintext),
            NonceStrategy::PerMessage => {
                let nonce = Nonce::random()?;
                let sealed = self.seal_with(&nonce, plaintext)?;

                let mut out = Vec::with_capacity(NONCE_LEN + sealed.len());
                out.extend_from_slice(nonce.as_bytes());
                out.extend_from_slice(&sealed);
                Ok(out)
            }
        }
    }

    /// 校验并解密
    ///
    /// 认证失败时返回 Authentication，不会返回任何部分明文。
    pub fn open(&self, ciphertext: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
        match self.strategy {
            NonceStrategy::Fixed(nonce) => self.open_with(&nonce, ciphertext),
            NonceStrategy::PerMessage => {
                if ciphertext.len() < NONCE_LEN + TAG_LEN {
                    return Err(FileCryptError::Truncated(ciphertext.len()));
                }

                let (nonce_bytes, body) = ciphertext.split_at(NONCE_LEN);
                let nonce = Nonce::from_slice(nonce_bytes)?;
                self.open_with(&nonce, body)
            }
        }
    }

    fn seal_with(&self, nonce: &Nonce, plaintext: &[u8]) -> Result<Vec<u8>> {
        self.cipher
            .encrypt(aes_gcm::Nonce::from_slice(nonce.as_bytes()), plaintext)
            .map_err(|_| FileCryptError::Seal)
    }

    fn open_with(&self, nonce: &Nonce, ciphertext: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
        if ciphertext.len() < TAG_LEN {
            return Err(FileCryptError::Truncated(ciphertext.len()));
        }

        self.cipher
            .decrypt(aes_gcm::Nonce::from_slice(nonce.as_bytes()), ciphertext)
            .map(Zeroizing::new)
            .map_err(|_| FileCryptError::Authentication)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("cipher", &"Aes256Gcm")
            .field("strategy", &self.strategy)
            .finish()
    }
}
