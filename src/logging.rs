use std::{
    fs::{self, File, OpenOptions},
    path::{Path, PathBuf},
    sync::Mutex,
};

use chrono::NaiveDate;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "info";

/// Name of the log file written on `date`
pub fn log_file_name(date: NaiveDate) -> String {
    format!("log_{}.log", date.format("%Y-%m-%d"))
}

/// Opens (creating if needed) today's log file under `log_dir`
pub fn open_log_file(log_dir: &Path, date: NaiveDate) -> std::io::Result<(PathBuf, File)> {
    fs::create_dir_all(log_dir)?;
    let path = log_dir.join(log_file_name(date));
    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    Ok((path, file))
}

/// Installs the global tracing subscriber.
///
/// Events go to stdout and to `{log_dir}/log_{YYYY-MM-DD}.log`. The level
/// filter defaults to `info` and can be overridden with `RUST_LOG`.
pub fn init_tracing(log_dir: &Path) -> anyhow::Result<PathBuf> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let (path, file) = open_log_file(log_dir, chrono::Local::now().date_naive())?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;

    Ok(path)
}
