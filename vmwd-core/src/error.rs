//! Error types for vmwd.
//!
//! All errors use `thiserror` for ergonomic error handling and proper error chains.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for vmwd operations.
pub type Result<T> = std::result::Result<T, VmwdError>;

/// Main error type for vmwd.
#[derive(Error, Debug)]
pub enum VmwdError {
    // Version banner errors
    #[error("Cannot find version pattern {pattern:?}")]
    PatternNotFound { pattern: String },

    #[error("Failed to parse version after {pattern:?}: {reason}")]
    VersionParse { pattern: String, reason: String },

    // Log file errors
    #[error("Cannot open VMware log file {path:?}: {source}")]
    LogNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed VMware log file {path:?}: {reason}")]
    MalformedLog { path: PathBuf, reason: String },

    // VMX path deduction errors
    #[error("Domain {domain} doesn't contain any file-based harddisks, cannot deduce path for VMX file")]
    MissingDisk { domain: String },

    #[error("First file-based harddisk of domain {domain} has no source, cannot deduce path for VMX file")]
    MissingSource { domain: String },

    #[error("Unexpected format of {path:?}: {reason}")]
    UnexpectedFormat { path: String, reason: String },

    // Registry errors
    #[error("Domain {name} from {path:?} is already defined by {existing:?}")]
    DomainExists { name: String, existing: PathBuf, path: PathBuf },

    // External tool errors
    #[error("Command {command} failed: {reason}")]
    ExternalTool { command: String, reason: String },

    // File system errors
    #[error("File not found: {path:?}")]
    FileNotFound { path: PathBuf },

    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File {path:?} exceeds maximum size of {limit} bytes")]
    SizeExceeded { path: PathBuf, limit: u64 },

    // Configuration errors
    #[error("Unsupported driver flavor: {flavor}")]
    UnsupportedFlavor { flavor: String },

    #[error("Failed to parse VMX file {path:?}: {reason}")]
    ConfigParse { path: PathBuf, reason: String },

    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    // Generic errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl VmwdError {
    /// Create an Internal error from any error type.
    pub fn internal(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Internal(err.to_string())
    }

    /// Short, stable label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::PatternNotFound { .. } => "pattern_not_found",
            Self::VersionParse { .. } => "version_parse",
            Self::LogNotFound { .. } => "log_not_found",
            Self::MalformedLog { .. } => "malformed_log",
            Self::MissingDisk { .. } => "missing_disk",
            Self::MissingSource { .. } => "missing_source",
            Self::UnexpectedFormat { .. } => "unexpected_format",
            Self::DomainExists { .. } => "domain_exists",
            Self::ExternalTool { .. } => "external_tool",
            Self::FileNotFound { .. } => "file_not_found",
            Self::Io { .. } => "io",
            Self::SizeExceeded { .. } => "size_exceeded",
            Self::UnsupportedFlavor { .. } => "unsupported_flavor",
            Self::ConfigParse { .. } => "config_parse",
            Self::InvalidConfig { .. } => "invalid_config",
            Self::Internal(_) | Self::Other(_) => "internal",
        }
    }
}
