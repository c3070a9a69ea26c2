//! 输出路径推导
//!
//! - 加密：`<path>` → `<path>.enc`
//! - 解密：`<name>.enc` → `<name>`，其他 → `<path>.dec`

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

pub const ENCRYPTED_EXT: &str = "enc";
pub const DECRYPTED_EXT: &str = "dec";

pub fn encrypted_path(input: &Path) -> PathBuf {
    append_suffix(input, ENCRYPTED_EXT)
}

pub fn decrypted_path(input: &Path) -> PathBuf {
    if input.extension() == Some(OsStr::new(ENCRYPTED_EXT)) {
        input.with_extension("")
    } else {
        append_suffix(input, DECRYPTED_EXT)
    }
}

/// 在完整路径后追加 `.ext`，不替换已有扩展名
fn append_suffix(input: &Path, ext: &str) -> PathBuf {
    let mut name = input.as_os_str().to_owned();
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encrypt_appends_enc() {
        assert_eq!(
            encrypted_path(Path::new("a/b.txt")),
            PathBuf::from("a/b.txt.enc")
        );
        assert_eq!(encrypted_path(Path::new("hello")), PathBuf::from("hello.enc"));
    }

    #[test]
    fn decrypt_strips_enc() {
        assert_eq!(
            decrypted_path(Path::new("a/b.txt.enc")),
            PathBuf::from("a/b.txt")
        );
        assert_eq!(decrypted_path(Path::new("hello.enc")), PathBuf::from("hello"));
    }

    #[test]
    fn decrypt_without_enc_appends_dec() {
        assert_eq!(
            decrypted_path(Path::new("a/b.txt")),
            PathBuf::from("a/b.txt.dec")
        );
        assert_eq!(decrypted_path(Path::new("a/b.ENC")), PathBuf::from("a/b.ENC.dec"));
    }

    #[test]
    fn bare_enc_dotfile_is_not_stripped() {
        assert_eq!(decrypted_path(Path::new("dir/.enc")), PathBuf::from("dir/.enc.dec"));
    }
}
