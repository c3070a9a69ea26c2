//! filecrypt 私有文件发布
//!
//! 所有落盘内容都先完整写进同目录下的 0o600 临时文件并 sync，
//! 再一次性出现在目标路径上，读者永远看不到半截文件：
//! - `write_atomic`：rename 覆盖目标（加解密输出）
//! - `publish_new`：hard link 发布，目标已存在时不覆盖（key / nonce）

use std::ffi::{OsStr, OsString};
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// 原子写文件，已存在的目标会被替换。
pub fn write_atomic<F>(target: &Path, write_fn: F) -> io::Result<()>
where
    F: FnOnce(&mut File) -> io::Result<()>,
{
    let staged = Staged::write(target, write_fn)?;

    if let Err(err) = fs::rename(&staged.path, target) {
        staged.discard();
        return Err(err);
    }

    Ok(())
}

/// 仅在目标不存在时发布新文件。
///
/// 返回 `false` 表示目标已被其他写入者抢先创建，此时以已有文件为准。
pub fn publish_new<F>(target: &Path, write_fn: F) -> io::Result<bool>
where
    F: FnOnce(&mut File) -> io::Result<()>,
{
    let staged = Staged::write(target, write_fn)?;

    let linked = fs::hard_link(&staged.path, target);
    staged.discard();

    match linked {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(e),
    }
}

/// 已写完并 sync 的临时文件
struct Staged {
    path: PathBuf,
}

impl Staged {
    fn write<F>(target: &Path, write_fn: F) -> io::Result<Self>
    where
        F: FnOnce(&mut File) -> io::Result<()>,
    {
        let staged = Self {
            path: tmp_path_for(target),
        };
        let mut file = create_private(&staged.path)?;

        let written = write_fn(&mut file).and_then(|()| file.sync_all());
        drop(file);

        match written {
            Ok(()) => Ok(staged),
            Err(err) => {
                staged.discard();
                Err(err)
            }
        }
    }

    fn discard(self) {
        let _ = fs::remove_file(&self.path);
    }
}

fn create_private(path: &Path) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    options.open(path)
}

/// `dir/name` → `dir/.name.<pid>-<n>.tmp`
fn tmp_path_for(target: &Path) -> PathBuf {
    let dir = match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut name = OsString::from(".");
    name.push(target.file_name().unwrap_or(OsStr::new("filecrypt")));
    name.push(format!(
        ".{}-{}.tmp",
        std::process::id(),
        TMP_COUNTER.fetch_add(1, Ordering::Relaxed)
    ));

    dir.join(name)
}
