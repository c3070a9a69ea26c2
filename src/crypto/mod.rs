//! filecrypt 密码学模块
//!
//! - `material`：Key / Nonce 定长类型与随机数来源
//! - `aead`：AES-256-GCM 会话（seal / open）

pub mod aead;
pub mod material;

pub use aead::{NonceMode, NonceStrategy, Session};
pub use material::{KEY_LEN, Key, NONCE_LEN, Nonce, TAG_LEN};
