//! Configuration types for the logger

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::Level;

use super::error::LoggerError;

/// Main logger configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggerConfig {
    pub console: ConsoleConfig,
    pub file: FileConfig,
    pub level: String, // Converted to tracing::Level at init
}

impl LoggerConfig {
    /// Create a new logger configuration with validation
    pub fn new(
        console: ConsoleConfig,
        file: FileConfig,
        level: String,
    ) -> Result<Self, LoggerError> {
        let config = Self {
            console,
            file,
            level,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), LoggerError> {
        self.parse_level()?;
        self.file.validate()?;

        // Ensure at least one output is enabled
        if !self.console.enabled && !self.file.enabled {
            return Err(LoggerError::config(
                "At least one output (console or file) must be enabled",
            ));
        }

        Ok(())
    }

    /// Parse the log level string into a tracing::Level
    pub fn parse_level(&self) -> Result<Level, LoggerError> {
        match self.level.to_lowercase().as_str() {
            "trace" => Ok(Level::TRACE),
            "debug" => Ok(Level::DEBUG),
            "info" => Ok(Level::INFO),
            "warn" => Ok(Level::WARN),
            "error" => Ok(Level::ERROR),
            _ => Err(LoggerError::config(format!(
                "Invalid log level '{}'. Valid levels are: trace, debug, info, warn, error",
                self.level
            ))),
        }
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            console: ConsoleConfig::default(),
            file: FileConfig::default(),
            level: "info".to_string(),
        }
    }
}

/// Console output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleConfig {
    pub enabled: bool,
    pub colored: bool,
}

impl ConsoleConfig {
    /// Create a new console configuration
    pub fn new(enabled: bool, colored: bool) -> Self {
        Self { enabled, colored }
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            colored: true,
        }
    }
}

/// File output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    pub enabled: bool,
    pub path: PathBuf,
    pub append: bool,
    pub format: LogFormat,
}

impl FileConfig {
    /// Create a new file configuration with validation
    pub fn new(
        enabled: bool,
        path: PathBuf,
        append: bool,
        format: LogFormat,
    ) -> Result<Self, LoggerError> {
        let config = Self {
            enabled,
            path,
            append,
            format,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate file configuration
    ///
    /// Note: This is a pure validation function that does not create
    /// directories. Directory creation is handled during initialization.
    pub fn validate(&self) -> Result<(), LoggerError> {
        if self.enabled && self.path.as_os_str().is_empty() {
            return Err(LoggerError::config(
                "File path cannot be empty when file output is enabled",
            ));
        }
        Ok(())
    }
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path: PathBuf::from("logs/recron.log"),
            append: true,
            format: LogFormat::Json,
        }
    }
}

/// Log format options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LogFormat {
    Full,
    Compact,
    Json,
}

impl Default for LogFormat {
    fn default() -> Self {
        LogFormat::Full
    }
}

impl std::str::FromStr for LogFormat {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full" => Ok(LogFormat::Full),
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            _ => Err(LoggerError::config(format!(
                "Invalid log format '{}'. Valid formats are: full, compact, json",
                s
            ))),
        }
    }
}

impl LogFormat {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Full => "full",
            LogFormat::Compact => "compact",
            LogFormat::Json => "json",
        }
    }
}
