use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use color_eyre::eyre::{Result, eyre};
use tracing::Level;

use crate::config::LoggingConfig;

pub fn default_log_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|p| p.join("procpulse").join("procpulse.log"))
}

pub fn parse_level(level: &str) -> Result<Level> {
    Level::from_str(level.trim()).map_err(|_| eyre!("unknown log level `{level}`"))
}

/// Installs a file-backed tracing subscriber. The terminal belongs to the
/// UI, so nothing is ever written to stdout or stderr.
///
/// Returns the log file path, or `None` when no log location exists.
pub fn init(config: &LoggingConfig) -> Result<Option<PathBuf>> {
    let level = parse_level(&config.level)?;
    let Some(path) = config.file.clone().or_else(default_log_path) else {
        return Ok(None);
    };
    let file = open_log_file(&path)?;
    let make_writer = move || {
        file.try_clone()
            .expect("failed to clone log file handle")
    };

    let builder = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_max_level(level)
        .with_target(true)
        .with_writer(make_writer);

    let installed = match config.format.to_lowercase().as_str() {
        "json" => tracing::subscriber::set_global_default(builder.json().finish()),
        _ => tracing::subscriber::set_global_default(builder.finish()),
    };
    installed.map_err(|e| eyre!("failed to set tracing subscriber: {e}"))?;
    Ok(Some(path))
}

fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}
