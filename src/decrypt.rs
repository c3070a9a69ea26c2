//! filecrypt 解密流程实现
//!
//! 解密流程（严格顺序）：
//! 1. 由调用方提供已构造好的 Session
//! 2. 读取完整密文文件
//! 3. open（校验 tag）
//! 4. 写出到去掉 `.enc` 的路径，或 `<path>.dec`
//!
//! 注意：
//! - 认证失败必须立即报错，不写出任何文件

use std::path::{Path, PathBuf};

use tracing::info;

use crate::crypto::aead::Session;
use crate::error::Result;
use crate::fs;

/// 使用已有会话解密文件，返回输出路径
pub fn decrypt_file(input_path: &Path, session: &Session) -> Result<PathBuf> {
    let ciphertext = fs::read_whole(input_path)?;

    let plaintext = session.open(&ciphertext)?;
    info!(
        ciphertext_bytes = ciphertext.len(),
        plaintext_bytes = plaintext.len(),
        "decrypted"
    );

    let output_path = fs::decrypted_path(input_path);
    fs::write_whole(&output_path, &plaintext)?;

    Ok(output_path)
}
