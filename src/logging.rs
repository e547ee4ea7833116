//! Logging
//!
//! `log` backend for the binary. Lines go to stderr, a file, or both, each
//! with its own level, in text or JSON form:
//!
//! ```text
//! 2025-07-27 10:15:02 [WARN] plmanagement::plugin::manager: Component 'hosts_cleanup' failed to configure
//! {"timestamp":"2025-07-27 10:15:02","level":"WARN","target":"plmanagement::plugin::manager","message":"..."}
//! ```

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::str::FromStr;
use anyhow::{Context, Result};
use chrono::Local;
use log::{Level, LevelFilter};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Log line format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Invalid log format: {}. Valid options: text, json", s)),
        }
    }
}

/// Where log lines are written
#[derive(Debug, Clone, PartialEq)]
pub enum LogDestination {
    Console,
    File(PathBuf),
    Both(PathBuf),
}

impl LogDestination {
    fn file_path(&self) -> Option<&PathBuf> {
        match self {
            LogDestination::Console => None,
            LogDestination::File(path) | LogDestination::Both(path) => Some(path),
        }
    }

    fn has_console(&self) -> bool {
        !matches!(self, LogDestination::File(_))
    }
}

/// One JSON log line
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonLogEntry {
    pub timestamp: String,
    pub level: String,
    pub target: String,
    pub message: String,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub console_level: LevelFilter,
    pub file_level: Option<LevelFilter>,
    pub format: LogFormat,
    pub destination: LogDestination,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            console_level: LevelFilter::Info,
            file_level: None,
            format: LogFormat::Text,
            destination: LogDestination::Console,
        }
    }
}

impl LogConfig {
    /// Most verbose level any destination accepts
    pub fn max_level(&self) -> LevelFilter {
        match self.file_level {
            Some(file_level) if file_level > self.console_level => file_level,
            _ => self.console_level,
        }
    }
}

pub struct ArtLogger {
    config: LogConfig,
    file: Mutex<Option<File>>,
}

impl ArtLogger {
    /// Create a logger, opening the log file up front when one is configured
    pub fn new(config: LogConfig) -> Result<Self> {
        let file = match config.destination.file_path() {
            Some(path) => Some(
                OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .with_context(|| format!("Failed to open log file: {}", path.display()))?,
            ),
            None => None,
        };
        Ok(Self { config, file: Mutex::new(file) })
    }

    fn timestamp() -> String {
        Local::now().format(TIMESTAMP_FORMAT).to_string()
    }

    fn format_line(&self, level: Level, target: &str, message: &str) -> String {
        let timestamp = Self::timestamp();
        let level = level.to_string().to_uppercase();
        match self.config.format {
            LogFormat::Text => format!("{} [{}] {}: {}", timestamp, level, target, message),
            LogFormat::Json => {
                let entry = JsonLogEntry {
                    timestamp: timestamp.clone(),
                    level: level.clone(),
                    target: target.to_string(),
                    message: message.to_string(),
                };
                serde_json::to_string(&entry)
                    .unwrap_or_else(|_| format!("{} [{}] {}: {}", timestamp, level, target, message))
            }
        }
    }

    fn console_accepts(&self, level: Level) -> bool {
        self.config.destination.has_console() && level <= self.config.console_level
    }

    fn file_accepts(&self, level: Level) -> bool {
        match self.config.file_level {
            Some(file_level) => self.config.destination.file_path().is_some() && level <= file_level,
            None => false,
        }
    }
}

impl log::Log for ArtLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.console_accepts(metadata.level()) || self.file_accepts(metadata.level())
    }

    fn log(&self, record: &log::Record) {
        let level = record.level();
        if !self.enabled(record.metadata()) {
            return;
        }

        let line = self.format_line(level, record.target(), &record.args().to_string());

        if self.file_accepts(level) {
            let mut file = self.file.lock();
            let written = file.as_mut().map(|f| writeln!(f, "{}", line));
            if let Some(Err(e)) = written {
                eprintln!("File logging error: {}", e);
            }
        }

        if self.console_accepts(level) {
            let _ = writeln!(io::stderr(), "{}", line);
        }
    }

    fn flush(&self) {
        if let Some(file) = self.file.lock().as_mut() {
            let _ = file.flush();
        }
        let _ = io::stderr().flush();
    }
}

/// Install the logger as the global `log` backend
pub fn init_logger(config: LogConfig) -> Result<()> {
    let max_level = config.max_level();
    let logger = ArtLogger::new(config)?;

    log::set_boxed_logger(Box::new(logger)).context("Failed to set global logger")?;
    log::set_max_level(max_level);
    Ok(())
}

/// Convert string to LevelFilter
pub fn parse_log_level(level_str: &str) -> Result<LevelFilter> {
    match level_str.trim().to_lowercase().as_str() {
        "error" => Ok(LevelFilter::Error),
        "warn" | "warning" => Ok(LevelFilter::Warn),
        "info" => Ok(LevelFilter::Info),
        "debug" => Ok(LevelFilter::Debug),
        "trace" => Ok(LevelFilter::Trace),
        "off" => Ok(LevelFilter::Off),
        _ => Err(anyhow::anyhow!(
            "Invalid log level: {}. Valid levels: error, warn, info, debug, trace, off",
            level_str
        )),
    }
}
