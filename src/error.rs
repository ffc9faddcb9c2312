//! Error types for `dml-config`
//!
//! Out-of-range settings are never errors: they are repaired by the
//! post-load validators. The errors here cover everything around them:
//! reading, parsing and writing configuration files.

use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for `dml-config` CLI operations.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution
    pub const SUCCESS: i32 = 0;

    /// Configuration error (unparseable file, strict validation failure)
    pub const CONFIG_ERROR: i32 = 2;

    /// I/O error (file not found, permission denied)
    pub const IO_ERROR: i32 = 3;

    /// Usage error (invalid arguments, missing required options)
    pub const USAGE_ERROR: i32 = 64;
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for `dml-config` operations.
#[derive(Debug, Error)]
pub enum DmlError {
    /// Configuration loading or saving error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl DmlError {
    /// Returns the appropriate exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(
                ConfigError::MissingFile { .. }
                | ConfigError::ReadError { .. }
                | ConfigError::WriteError { .. },
            )
            | Self::Io(_) => ExitCode::IO_ERROR,
            Self::Config(_) | Self::Json(_) | Self::Yaml(_) => ExitCode::CONFIG_ERROR,
        }
    }
}

// ============================================================================
// Configuration Errors
// ============================================================================

/// Configuration loading and saving errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be parsed or deserialized
    #[error("parse error in {path}{}: {message}", line.map_or_else(String::new, |l| format!(" (line {l})")))]
    ParseError {
        /// Path to the configuration file
        path: PathBuf,
        /// Line number where the error occurred (if available)
        line: Option<usize>,
        /// Error message from the parser
        message: String,
    },

    /// Referenced configuration file not found or unreadable
    #[error("file not found: {path}")]
    MissingFile {
        /// Path to the missing file
        path: PathBuf,
    },

    /// The file exists but could not be read
    #[error("failed to read {path}: {source}")]
    ReadError {
        /// Path to the configuration file
        path: PathBuf,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// Configuration file exceeds the size limit
    #[error("{path} is {size} bytes, limit is {limit} bytes")]
    TooLarge {
        /// Path to the configuration file
        path: PathBuf,
        /// Actual size in bytes
        size: u64,
        /// Configured limit in bytes
        limit: u64,
    },

    /// Writing the configuration back to disk failed
    #[error("failed to write {path}: {source}")]
    WriteError {
        /// Destination path
        path: PathBuf,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// Serializing the configuration failed
    #[error("failed to serialize configuration: {0}")]
    SerializeError(String),

    /// One or more configuration files failed validation.
    #[error("{count} file(s) failed validation")]
    ValidationFailed {
        /// Number of files that failed validation.
        count: usize,
    },
}

// ============================================================================
// Result Type Alias
// ============================================================================

/// Result type alias for `dml-config` operations.
pub type Result<T> = std::result::Result<T, DmlError>;

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(ExitCode::SUCCESS, 0);
        assert_eq!(ExitCode::CONFIG_ERROR, 2);
        assert_eq!(ExitCode::IO_ERROR, 3);
        assert_eq!(ExitCode::USAGE_ERROR, 64);
    }

    #[test]
    fn test_missing_file_exit_code() {
        let err: DmlError = ConfigError::MissingFile {
            path: PathBuf::from("/test"),
        }
        .into();
        assert_eq!(err.exit_code(), ExitCode::IO_ERROR);
    }

    #[test]
    fn test_read_error_exit_code() {
        let err: DmlError = ConfigError::ReadError {
            path: PathBuf::from("config"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        }
        .into();
        assert_eq!(err.exit_code(), ExitCode::IO_ERROR);
        assert_eq!(err.to_string(), "failed to read config: denied");
    }

    #[test]
    fn test_parse_error_exit_code() {
        let err: DmlError = ConfigError::ParseError {
            path: PathBuf::from("dml-refabricated.json"),
            line: None,
            message: "expected value".to_string(),
        }
        .into();
        assert_eq!(err.exit_code(), ExitCode::CONFIG_ERROR);
    }

    #[test]
    fn test_validation_failed_exit_code() {
        let err: DmlError = ConfigError::ValidationFailed { count: 2 }.into();
        assert_eq!(err.exit_code(), ExitCode::CONFIG_ERROR);
        assert_eq!(err.to_string(), "2 file(s) failed validation");
    }

    #[test]
    fn test_io_error_exit_code() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "not found");
        let err: DmlError = io_err.into();
        assert_eq!(err.exit_code(), ExitCode::IO_ERROR);
    }

    #[test]
    fn test_parse_error_display_with_line() {
        let err = ConfigError::ParseError {
            path: PathBuf::from("config.yaml"),
            line: Some(42),
            message: "unexpected token".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "parse error in config.yaml (line 42): unexpected token"
        );
    }

    #[test]
    fn test_too_large_display() {
        let err = ConfigError::TooLarge {
            path: PathBuf::from("big.json"),
            size: 2048,
            limit: 1024,
        };
        assert!(err.to_string().contains("2048"));
        assert!(err.to_string().contains("1024"));
    }
}
