// Configuration types module
// Defines all configuration-related data structures

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    pub service: ServiceInfo,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// Minimum level: debug, info, warn, error or off
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

impl PerformanceConfig {
    /// Whole-connection time limit, `max(read_timeout, write_timeout)`
    ///
    /// `None` when both timeouts are 0, which disables the limit.
    pub fn connection_timeout(&self) -> Option<Duration> {
        match self.read_timeout.max(self.write_timeout) {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

/// HTTP configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HttpConfig {
    /// Largest request body read for JSON parsing; bigger bodies count as absent
    pub max_body_size: u64,
}

/// Identity tags stamped into every envelope
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ServiceInfo {
    pub name: String,
    pub processed_by: String,
    pub language: String,
    pub framework: String,
    pub runtime_version: String,
    pub health_service: String,
}

impl Default for ServiceInfo {
    fn default() -> Self {
        Self {
            name: "API2".to_string(),
            processed_by: "API2-Rust".to_string(),
            language: "Rust".to_string(),
            framework: "hyper".to_string(),
            runtime_version: env!("CARGO_PKG_RUST_VERSION").to_string(),
            health_service: "api2".to_string(),
        }
    }
}
