//! filecrypt 命令行入口
//!
//! 用法：
//!   filecrypt encrypt <path>   写出 <path>.enc
//!   filecrypt decrypt <path>   写出去掉 .enc 的路径，或 <path>.dec
//!   filecrypt stdin            占位命令，不做任何加密
//!
//! 设计原则：
//! - 参数数量不对时打印帮助并正常退出
//! - 库代码只返回错误，是否终止进程只在这里决定
//! - 所有诊断信息都走日志（log.json + 控制台）

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use tracing::{error, info};

use filecrypt::{NonceMode, Settings, config::DEFAULT_LOG_LEVEL, logging};

#[derive(Parser, Debug)]
#[command(name = "filecrypt", version, about = "Encrypt and decrypt files with AES-256-GCM")]
struct Cli {
    /// Directory holding the key, nonce and log.json files
    #[arg(long, global = true, default_value = ".")]
    dir: PathBuf,

    /// Where the GCM nonce comes from
    #[arg(long, global = true, value_enum, default_value_t = NonceArg::Persisted)]
    nonce: NonceArg,

    /// Log filter (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = DEFAULT_LOG_LEVEL)]
    log_level: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// AES-256-GCM encrypt a file into <path>.enc
    Encrypt {
        #[arg(value_name = "PATH")]
        paths: Vec<PathBuf>,
    },
    /// Decrypt a file produced by `encrypt`
    Decrypt {
        #[arg(value_name = "PATH")]
        paths: Vec<PathBuf>,
    },
    /// Encrypt input from stdin (not implemented)
    Stdin,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum NonceArg {
    /// Reuse the nonce stored in the `nonce` file
    Persisted,
    /// Fresh nonce per file, stored in front of the ciphertext
    Random,
}

impl From<NonceArg> for NonceMode {
    fn from(arg: NonceArg) -> Self {
        match arg {
            NonceArg::Persisted => NonceMode::Persisted,
            NonceArg::Random => NonceMode::Random,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        print_help(None);
        return ExitCode::SUCCESS;
    };

    let settings = Settings {
        state_dir: cli.dir,
        nonce_mode: cli.nonce.into(),
        log_level: cli.log_level,
    };

    let dispatch = match logging::file_and_console(&settings.log_path(), &settings.log_level) {
        Ok(dispatch) => dispatch,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };
    let _guard = tracing::dispatcher::set_default(&dispatch);

    match run(command, &settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %format!("{e:#}"), "fatal");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command, settings: &Settings) -> anyhow::Result<()> {
    match command {
        Command::Encrypt { paths } => {
            let Some(path) = single_path(&paths, "encrypt") else {
                return Ok(());
            };
            let output = filecrypt::encrypt(path, settings)
                .with_context(|| format!("encrypting {}", path.display()))?;
            info!(input = %path.display(), output = %output.display(), "encrypt done");
        }
        Command::Decrypt { paths } => {
            let Some(path) = single_path(&paths, "decrypt") else {
                return Ok(());
            };
            let output = filecrypt::decrypt(path, settings)
                .with_context(|| format!("decrypting {}", path.display()))?;
            info!(input = %path.display(), output = %output.display(), "decrypt done");
        }
        Command::Stdin => {
            info!("stdin encryption is not implemented, nothing to do");
        }
    }

    Ok(())
}

/// 恰好一个路径参数时返回它，否则打印子命令帮助
fn single_path<'a>(paths: &'a [PathBuf], subcommand: &str) -> Option<&'a Path> {
    match paths {
        [path] => Some(path.as_path()),
        _ => {
            print_help(Some(subcommand));
            None
        }
    }
}

fn print_help(subcommand: Option<&str>) {
    let mut command = Cli::command();
    command.build();

    let printed = match subcommand.and_then(|name| command.find_subcommand_mut(name)) {
        Some(sub) => sub.print_help(),
        None => command.print_help(),
    };

    if let Err(e) = printed {
        eprintln!("Error: {e}");
    }
}
