// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the viewfinder
//!
//! Most failure modes in the viewfinder are policy decisions rather than
//! errors: a tap before the preview exists is ignored, an unknown flash label
//! resolves to automatic. What remains are configuration, argument and
//! runtime problems surfaced by the command-line front end.

use std::fmt;
use std::path::PathBuf;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Main error type
#[derive(Debug, Clone)]
pub enum AppError {
    /// Configuration errors
    Config(ConfigError),
    /// A command-line value could not be interpreted
    InvalidArgument(String),
    /// The viewfinder task or its runtime failed
    Runtime(String),
    /// JSON encoding errors
    Json(String),
    /// Storage/filesystem errors
    Io(String),
}

/// Configuration loading and saving errors
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// The platform has no configuration directory
    NoConfigDir,
    /// The configuration file could not be read
    Read { path: PathBuf, reason: String },
    /// The configuration file is not valid JSON for [`crate::Config`]
    Parse { path: PathBuf, reason: String },
    /// The configuration file could not be written
    Write { path: PathBuf, reason: String },
    /// A color string is not `#RRGGBB` or `#RRGGBBAA`
    InvalidColor(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(e) => write!(f, "Configuration error: {}", e),
            AppError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            AppError::Runtime(msg) => write!(f, "Runtime error: {}", msg),
            AppError::Json(msg) => write!(f, "JSON error: {}", msg),
            AppError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NoConfigDir => write!(f, "No configuration directory available"),
            ConfigError::Read { path, reason } => {
                write!(f, "Cannot read {}: {}", path.display(), reason)
            }
            ConfigError::Parse { path, reason } => {
                write!(f, "Cannot parse {}: {}", path.display(), reason)
            }
            ConfigError::Write { path, reason } => {
                write!(f, "Cannot write {}: {}", path.display(), reason)
            }
            ConfigError::InvalidColor(value) => write!(f, "Invalid color: {:?}", value),
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for ConfigError {}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::Config(err)
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Json(err.to_string())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Runtime(err.to_string())
    }
}
