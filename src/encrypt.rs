//! filecrypt 加密流程实现
//!
//! 本模块负责将一个普通文件加密为 `<path>.enc`。
//!
//! 加密流程（严格顺序）：
//! 1. 由调用方提供已构造好的 Session
//! 2. 读取完整输入文件
//! 3. seal
//! 4. 原子写出到 `<path>.enc`

use std::path::{Path, PathBuf};

use tracing::info;
use zeroize::Zeroizing;

use crate::crypto::aead::Session;
use crate::error::Result;
use crate::fs;

/// 使用已有会话加密文件，返回输出路径
pub fn encrypt_file(input_path: &Path, session: &Session) -> Result<PathBuf> {
    let plaintext = Zeroizing::new(fs::read_whole(input_path)?);

    let ciphertext = session.seal(&plaintext)?;
    info!(
        plaintext_bytes = plaintext.len(),
        ciphertext_bytes = ciphertext.len(),
        "encrypted"
    );

    let output_path = fs::encrypted_path(input_path);
    fs::write_whole(&output_path, &ciphertext)?;

    Ok(output_path)
}
