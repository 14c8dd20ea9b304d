//! Logger module
//!
//! Provides the logging capability used by the server and the dispatcher:
//! - `Logger` trait with level-tagged messages and access log lines
//! - `ConsoleLogger` writing to stdout/stderr or log files
//! - `NoopLogger` for disabled logging
//! - Lifecycle helpers for startup, connections and shutdown

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use crate::config::{Config, LoggingConfig};
use crate::routing::RouteTable;
use writer::LogWriter;

/// Log severity, ordered from most to least verbose
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    const fn tag(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Configured level threshold; `None` means logging is off
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelFilter(Option<Level>);

impl FromStr for LevelFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let level = match s.to_ascii_lowercase().as_str() {
            "debug" | "trace" => Some(Level::Debug),
            "info" => Some(Level::Info),
            "warn" | "warning" => Some(Level::Warn),
            "error" => Some(Level::Error),
            "off" | "none" => None,
            other => return Err(format!("Unknown log level: '{other}'")),
        };
        Ok(Self(level))
    }
}

/// Logging capability shared by all request tasks
pub trait Logger: Send + Sync {
    /// Record a message at the given level
    fn log(&self, level: Level, message: &str);

    /// Record a formatted access log line
    fn access(&self, line: &str);

    fn debug(&self, message: &str) {
        self.log(Level::Debug, message);
    }

    fn info(&self, message: &str) {
        self.log(Level::Info, message);
    }

    fn warn(&self, message: &str) {
        self.log(Level::Warn, message);
    }

    fn error(&self, message: &str) {
        self.log(Level::Error, message);
    }
}

/// Logger writing to the console or configured log files
pub struct ConsoleLogger {
    min_level: Level,
    writer: LogWriter,
}

impl ConsoleLogger {
    pub fn new(min_level: Level, writer: LogWriter) -> Self {
        Self { min_level, writer }
    }
}

impl Logger for ConsoleLogger {
    fn log(&self, level: Level, message: &str) {
        if level < self.min_level {
            return;
        }
        let line = format!(
            "{} [{level}] {message}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f")
        );
        if level >= Level::Warn {
            self.writer.write_error(&line);
        } else {
            self.writer.write_access(&line);
        }
    }

    fn access(&self, line: &str) {
        self.writer.write_access(line);
    }
}

/// Logger that discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn log(&self, _level: Level, _message: &str) {}

    fn access(&self, _line: &str) {}
}

/// Build the logger described by the logging configuration
///
/// Should be called once at application startup.
pub fn init(config: &LoggingConfig) -> std::io::Result<Box<dyn Logger>> {
    let filter: LevelFilter = config
        .level
        .parse()
        .map_err(|e: String| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

    let Some(min_level) = filter.0 else {
        return Ok(Box::new(NoopLogger));
    };

    let writer = LogWriter::new(
        config.access_log_file.as_deref(),
        config.error_log_file.as_deref(),
    )?;
    Ok(Box::new(ConsoleLogger::new(min_level, writer)))
}

pub fn log_server_start(
    logger: &dyn Logger,
    addr: &SocketAddr,
    config: &Config,
    routes: &RouteTable,
) {
    logger.info("======================================");
    logger.info(&format!("{} started successfully", config.service.name));
    logger.info(&format!("Listening on: http://{addr}"));
    logger.info(&format!("Log level: {}", config.logging.level));
    match config.server.workers {
        Some(workers) => logger.info(&format!("Worker threads: {workers}")),
        None => logger.info("Worker threads: default (CPU cores)"),
    }
    if let Some(ref path) = config.logging.access_log_file {
        logger.info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        logger.info(&format!("Error log: {path}"));
    }
    for route in routes.iter() {
        logger.info(&format!("Route: {}", route.describe()));
    }
    logger.info("======================================");
}

pub fn log_connection_accepted(logger: &dyn Logger, peer_addr: &SocketAddr) {
    logger.debug(&format!("[Connection] Accepted from: {peer_addr}"));
}

pub fn log_connection_error(logger: &dyn Logger, err: &impl fmt::Debug) {
    logger.error(&format!("[Connection] Failed to serve connection: {err:?}"));
}

pub fn log_shutdown(logger: &dyn Logger, active: usize) {
    logger.info(&format!(
        "Shutdown requested, no longer accepting connections ({active} still active)"
    ));
}

/// Logger that records every entry in memory for assertions
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryLogger {
    entries: std::sync::Mutex<Vec<(Level, String)>>,
    access_lines: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl MemoryLogger {
    pub fn entries(&self) -> Vec<(Level, String)> {
        self.entries.lock().unwrap().clone()
    }

    pub fn access_lines(&self) -> Vec<String> {
        self.access_lines.lock().unwrap().clone()
    }

    /// Messages recorded at exactly `level`
    pub fn messages_at(&self, level: Level) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m)
            .collect()
    }
}

#[cfg(test)]
impl Logger for MemoryLogger {
    fn log(&self, level: Level, message: &str) {
        self.entries.lock().unwrap().push((level, message.to_string()));
    }

    fn access(&self, line: &str) {
        self.access_lines.lock().unwrap().push(line.to_string());
    }
}
