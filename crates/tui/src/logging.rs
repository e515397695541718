//! File logging. The prompt box owns the terminal, so nothing goes to stderr.
//!
//! Level comes from `RUST_LOG` (default `info`); files rotate daily under
//! `<data_dir>/kk/logs`.

use std::{env, fs, path::PathBuf};

use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn log_dir() -> PathBuf {
    kk_core::config::data_dir()
        .map(|d| d.join("logs"))
        .unwrap_or_else(|| env::temp_dir().join("kk-logs"))
}

/// Keep the returned guard alive until exit or buffered lines are lost.
pub fn init() -> Option<WorkerGuard> {
    let dir = log_dir();
    if let Err(e) = fs::create_dir_all(&dir) {
        eprintln!("warning: cannot create log dir {}: {}", dir.display(), e);
        return None;
    }
    let appender = match RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("kk")
        .filename_suffix("log")
        .build(&dir)
    {
        Ok(a) => a,
        Err(e) => {
            eprintln!("warning: cannot open log file in {}: {}", dir.display(), e);
            return None;
        }
    };
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true);
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .try_init()
        .is_err()
    {
        return None;
    }
    tracing::info!(target: "tui", "logging to {}", dir.display());
    Some(guard)
}
