//! Configuration errors.

use std::path::PathBuf;

use serde_json::Value;
use thiserror::Error;

use super::kind::Kind;

/// Everything that can go wrong while validating or loading a config.
///
/// Validation variants carry the offending key and the value that was
/// received so the message alone is enough to fix the file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Value has the wrong JSON kind.
    #[error("type error at key \"{key}\": value is a {actual}, but must be {required}\nvalue: {value}")]
    TypeMismatch {
        key: String,
        actual: Kind,
        required: Kind,
        value: Value,
    },

    /// Value is outside the key's allowed literal set.
    #[error("value {value} at key \"{key}\" is not allowed, you can use: {}", .allowed.join(", "))]
    NotAllowed {
        key: String,
        value: Value,
        allowed: Vec<String>,
    },

    /// A color tuple without exactly two entries.
    #[error("value at key \"{key}\" must have exactly two colors, got {len}")]
    ColorArity { key: String, len: usize },

    /// A color tuple entry that is not a known color.
    #[error("{color} at key \"{key}\" is not a known color")]
    UnknownColor { key: String, color: Value },

    /// A logger registry entry with a malformed color tuple.
    #[error("logger \"{logger}\" at key \"{key}\" is invalid: {reason}")]
    LoggerColor {
        key: String,
        logger: String,
        reason: String,
    },

    /// Level weight table missing canonical levels or holding bad weights.
    #[error("value at key \"{key}\" is invalid: {reason}")]
    LevelTable { key: String, reason: String },

    /// Number outside the declared bounds.
    #[error("value at key \"{key}\" must be between {min} and {max} (yours: {actual})")]
    Range {
        key: String,
        min: i64,
        max: i64,
        actual: Value,
    },

    /// Fractional number where a whole number is required.
    #[error("value at key \"{key}\" must be a whole number (yours: {value})")]
    NotInteger { key: String, value: Value },

    /// Override names a key that is neither a setting nor a process flag.
    #[error("unknown configuration key \"{key}\", expected one of: {}", .known.join(", "))]
    UnknownKey { key: String, known: Vec<String> },

    /// Overrides were given as something other than an object.
    #[error("configuration overrides must be an object, got {actual}")]
    InvalidOverrides { actual: Kind },

    /// Failed to read config file.
    #[error("failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse JSON.
    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Config file holds valid JSON that is not an object.
    #[error("config file '{path}' must contain a JSON object")]
    NotAnObject { path: PathBuf },

    /// Failed to write config file.
    #[error("failed to write config file '{path}': {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to delete config file.
    #[error("failed to remove config file '{path}': {source}")]
    RemoveFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to create the root directory.
    #[error("failed to create directory '{path}': {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to convert between JSON and the typed config.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ConfigError {
    /// Creates a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Creates a parse error.
    pub fn parse(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }

    /// Creates a write file error.
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::WriteFile {
            path: path.into(),
            source,
        }
    }

    /// Creates a remove file error.
    pub fn remove_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::RemoveFile {
            path: path.into(),
            source,
        }
    }

    /// Creates a create dir error.
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::CreateDir {
            path: path.into(),
            source,
        }
    }

    /// Whether a highlighted excerpt of the offending file helps fix this error
    pub fn wants_remediation(&self) -> bool {
        matches!(
            self,
            ConfigError::NotAllowed { .. }
                | ConfigError::ColorArity { .. }
                | ConfigError::UnknownColor { .. }
                | ConfigError::LoggerColor { .. }
                | ConfigError::LevelTable { .. }
        )
    }

    /// Setting key the error is about, if any
    pub fn key(&self) -> Option<&str> {
        match self {
            ConfigError::TypeMismatch { key, .. }
            | ConfigError::NotAllowed { key, .. }
            | ConfigError::ColorArity { key, .. }
            | ConfigError::UnknownColor { key, .. }
            | ConfigError::LoggerColor { key, .. }
            | ConfigError::LevelTable { key, .. }
            | ConfigError::Range { key, .. }
            | ConfigError::NotInteger { key, .. }
            | ConfigError::UnknownKey { key, .. } => Some(key),
            _ => None,
        }
    }
}
