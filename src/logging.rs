//! File logger for the terminal binary.
//!
//! The game owns the alternate screen, so records go to a file instead of
//! stderr. The level comes from `MAHJONG_LOG` (default `warn`).

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::{Mutex, OnceLock};
use std::time::Instant;

use anyhow::{Context, Result};
use log::{LevelFilter, Metadata, Record};

struct FileLogger {
    file: Mutex<File>,
    started: Instant,
}

impl log::Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if let Ok(mut file) = self.file.lock() {
            let _ = writeln!(
                file,
                "{:>8}ms {:<5} {} - {}",
                self.started.elapsed().as_millis(),
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}

static LOGGER: OnceLock<FileLogger> = OnceLock::new();

/// Parse a level name, falling back to `warn`.
pub fn parse_level(s: Option<&str>) -> LevelFilter {
    s.and_then(|lvl| lvl.trim().parse().ok())
        .unwrap_or(LevelFilter::Warn)
}

/// Install the file logger. `Off` installs nothing and creates no file.
pub fn init_logging(level: LevelFilter, path: &Path) -> Result<()> {
    if level == LevelFilter::Off {
        return Ok(());
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    let logger = LOGGER.get_or_init(|| FileLogger {
        file: Mutex::new(file),
        started: Instant::now(),
    });
    // A logger may already be installed (tests); that is not an error here.
    let _ = log::set_logger(logger).map(|()| log::set_max_level(level));
    Ok(())
}
