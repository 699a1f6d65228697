//! Logging bootstrap for the engine.
//!
//! # Responsibility
//! - Start file-backed rolling logs once per process and keep the handle
//!   alive for the process lifetime.
//! - Keep log lines metadata-only; note content never reaches the files.
//!
//! # Invariants
//! - Re-initialization with the configuration already active is a no-op;
//!   any other configuration is rejected with an error, never a panic.

use std::path::{Path, PathBuf};

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::info;
use once_cell::sync::OnceCell;

const LOG_BASENAME: &str = "bytepad";
const ROTATE_AT_BYTES: u64 = 8 * 1024 * 1024;
const KEEP_ROTATED_FILES: usize = 4;

static ACTIVE: OnceCell<ActiveLogging> = OnceCell::new();

struct ActiveLogging {
    level: &'static str,
    dir: PathBuf,
    _handle: LoggerHandle,
}

/// Starts logging at `level` into `log_dir`, or verifies it already runs
/// with exactly that configuration.
///
/// # Errors
/// - Unsupported level, or a log directory that is empty, relative, or
///   cannot be created.
/// - Logging already active with a different level or directory.
/// - Logger backend failed to start.
pub fn init_logging(level: &str, log_dir: &str) -> Result<(), String> {
    let level = canonical_level(level)?;
    let dir = resolve_log_dir(log_dir)?;

    let active = ACTIVE.get_or_try_init(|| start_backend(level, dir.clone()))?;

    if active.dir != dir {
        return Err(format!(
            "logging is already writing to `{}`; refusing to move to `{}`",
            active.dir.display(),
            dir.display()
        ));
    }
    if active.level != level {
        return Err(format!(
            "logging is already active at level `{}`; refusing to change to `{level}`",
            active.level
        ));
    }
    Ok(())
}

fn start_backend(level: &'static str, dir: PathBuf) -> Result<ActiveLogging, String> {
    std::fs::create_dir_all(&dir)
        .map_err(|err| format!("cannot create log directory `{}`: {err}", dir.display()))?;

    let spec = FileSpec::default().directory(&dir).basename(LOG_BASENAME);
    let handle = Logger::try_with_str(level)
        .map_err(|err| format!("invalid log level `{level}`: {err}"))?
        .log_to_file(spec)
        .rotate(
            Criterion::Size(ROTATE_AT_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(KEEP_ROTATED_FILES),
        )
        .append()
        .write_mode(WriteMode::BufferAndFlush)
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| format!("logger startup failed: {err}"))?;

    info!(
        "event=logging_init module=logging status=ok level={level} log_dir={} platform={} build_mode={} version={}",
        dir.display(),
        std::env::consts::OS,
        if cfg!(debug_assertions) { "debug" } else { "release" },
        env!("CARGO_PKG_VERSION")
    );

    Ok(ActiveLogging {
        level,
        dir,
        _handle: handle,
    })
}

/// The `(level, directory)` pair logging runs with; `None` before init.
pub fn logging_status() -> Option<(&'static str, PathBuf)> {
    ACTIVE.get().map(|active| (active.level, active.dir.clone()))
}

/// `debug` in debug builds, `info` in release builds.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn canonical_level(raw: &str) -> Result<&'static str, String> {
    Ok(match raw.trim().to_ascii_lowercase().as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "info" => "info",
        "warn" | "warning" => "warn",
        "error" => "error",
        other => {
            return Err(format!(
                "unknown log level `{other}` (expected trace, debug, info, warn or error)"
            ))
        }
    })
}

fn resolve_log_dir(raw: &str) -> Result<PathBuf, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err("log directory cannot be empty".to_owned());
    }
    let dir = Path::new(raw);
    if dir.is_relative() {
        return Err(format!("log directory must be absolute, got `{raw}`"));
    }
    Ok(dir.to_path_buf())
}
