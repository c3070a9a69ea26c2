//! filecrypt 结构化日志
//!
//! 每条记录是一行 JSON，同时写入追加模式的 `log.json` 与控制台。
//!
//! 这里只负责构造 `tracing::Dispatch`，不会注册全局 subscriber：
//! - 命令行入口用 `tracing::dispatcher::set_default` 安装
//! - 测试用 `tracing::dispatcher::with_default` 配合 MemorySink 捕获输出

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::Dispatch;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::fmt::writer::MakeWriterExt;

use crate::error::{FileCryptError, Result};

pub const LOG_FILE_NAME: &str = "log.json";

/// 基于任意 writer 构造 JSON 日志 Dispatch
pub fn dispatch<W>(level: &str, writer: W) -> Result<Dispatch>
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let filter = EnvFilter::try_new(level).map_err(|e| FileCryptError::LogFilter(e.to_string()))?;

    let subscriber = tracing_subscriber::fmt()
        .json()
        .flatten_event(true)
        .with_current_span(false)
        .with_target(false)
        .with_ansi(false)
        .with_env_filter(filter)
        .with_writer(writer)
        .finish();

    Ok(Dispatch::new(subscriber))
}

/// 同时写入 `log.json`（追加）与标准输出
pub fn file_and_console(path: &Path, level: &str) -> Result<Dispatch> {
    let file = open_log_file(path).map_err(FileCryptError::io("open log file", path))?;
    dispatch(level, Mutex::new(file).and(io::stdout))
}

fn open_log_file(path: &Path) -> io::Result<File> {
    OpenOptions::new().append(true).create(true).open(path)
}

/// 内存日志缓冲，供测试检查输出
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.lock()).into_owned()
    }

    /// 按行返回记录
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_owned).collect()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<u8>> {
        self.buf.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

pub struct MemoryWriter {
    sink: MemorySink,
}

impl io::Write for MemoryWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.sink.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for MemorySink {
    type Writer = MemoryWriter;

    fn make_writer(&'a self) -> Self::Writer {
        MemoryWriter { sink: self.clone() }
    }
}
