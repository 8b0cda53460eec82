//! Console and log-file tracing setup.
//!
//! The console shows warnings unless `-v` is given. `operations.log` receives
//! every INFO-or-above event, `errors.log` only errors. Both are appended to
//! and never parsed back.

use crate::config::AppConfig;
use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

pub const LOG_ENV_VAR: &str = "UFWM_LOG";

pub fn console_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

// Log file trouble is reported once and then ignored.
fn open_append(path: &Path) -> Option<File> {
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    match OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => Some(file),
        Err(e) => {
            eprintln!("Cannot open log file {}: {}", path.display(), e);
            None
        }
    }
}

pub fn init(config: &AppConfig, verbose: u8) {
    let env_filter = EnvFilter::builder()
        .with_default_directive(console_level(verbose).into())
        .with_env_var(LOG_ENV_VAR)
        .from_env_lossy();

    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(env_filter);

    let operations = open_append(&config.operations_log()).map(|file| {
        fmt::layer()
            .with_ansi(false)
            .with_target(false)
            .with_writer(Mutex::new(file))
            .with_filter(LevelFilter::INFO)
    });

    let errors = open_append(&config.error_log()).map(|file| {
        fmt::layer()
            .with_ansi(false)
            .with_target(false)
            .with_writer(Mutex::new(file))
            .with_filter(LevelFilter::ERROR)
    });

    tracing_subscriber::registry()
        .with(console)
        .with(operations)
        .with(errors)
        .init();
}
