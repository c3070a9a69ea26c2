mod decrypt;
mod encrypt;

pub mod config;
pub mod crypto;
pub mod error;
pub mod fs;
pub mod logging;
pub mod store;

pub use config::Settings;
pub use crypto::{NonceMode, Session};
pub use error::{FileCryptError, Result};
pub use store::KeyStore;

use std::path::{Path, PathBuf};

/// 按配置构造会话：先 key，再 nonce（仅 Persisted 模式）
pub fn load_session(settings: &Settings) -> Result<Session> {
    Session::load(&settings.key_store(), settings.nonce_mode)
}

/// 加密 `input`，写出 `<input>.enc`，返回输出路径
pub fn encrypt(input: &Path, settings: &Settings) -> Result<PathBuf> {
    let session = load_session(settings)?;
    encrypt::encrypt_file(input, &session)
}

/// 解密 `input`，返回输出路径
pub fn decrypt(input: &Path, settings: &Settings) -> Result<PathBuf> {
    let session = load_session(settings)?;
    decrypt::decrypt_file(input, &session)
}
