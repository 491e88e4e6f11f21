//! Error types for noticebot.

use std::path::PathBuf;

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Edit error: {0}")]
    Edit(#[from] EditError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Malformed reminder input. User-correctable, never fatal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("reminder text is empty")]
    EmptyText,

    #[error("invalid date/time '{input}', expected YYYY-MM-DD HH:MM")]
    BadTimeFormat { input: String },

    #[error("missing comma between date/time and text")]
    MissingSeparator,

    #[error("unknown recurrence '{input}', expected daily, weekly or monthly")]
    UnknownRecurrence { input: String },
}

/// A rejected position token in a batch command such as `/done 1 5 x`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PositionError {
    #[error("'{token}' is not a number")]
    NotANumber { token: String },

    #[error("no active reminder at position {position} (have {len})")]
    OutOfRange {
        token: String,
        position: usize,
        len: usize,
    },
}

impl PositionError {
    /// The raw token the user typed.
    pub fn token(&self) -> &str {
        match self {
            Self::NotANumber { token } | Self::OutOfRange { token, .. } => token,
        }
    }
}

/// Discriminant of [`EditError`], for callers that only need to branch on the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditErrorKind {
    BadPosition,
    BadTimeFormat,
    BadSyntax,
}

/// Why an edit was rejected. The reminder is left untouched in every case.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("invalid reminder number '{token}'")]
    BadPosition { token: String },

    #[error("invalid date/time '{input}', expected YYYY-MM-DD HH:MM")]
    BadTimeFormat { input: String },

    #[error("bad edit syntax: {reason}")]
    BadSyntax { reason: String },
}

impl EditError {
    pub fn kind(&self) -> EditErrorKind {
        match self {
            Self::BadPosition { .. } => EditErrorKind::BadPosition,
            Self::BadTimeFormat { .. } => EditErrorKind::BadTimeFormat,
            Self::BadSyntax { .. } => EditErrorKind::BadSyntax,
        }
    }
}

impl From<PositionError> for EditError {
    fn from(err: PositionError) -> Self {
        Self::BadPosition {
            token: err.token().to_string(),
        }
    }
}

/// Durable storage failures.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Corrupt reminder file {path}: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    #[error("Refusing to overwrite {path}: it could not be read or moved aside at startup")]
    Unread { path: PathBuf },
}

/// Channel-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("Channel {name} failed to start: {reason}")]
    StartupFailed { name: String, reason: String },

    #[error("Failed to send on channel {name}: {reason}")]
    SendFailed { name: String, reason: String },

    #[error("Delivery to {owner} timed out after {timeout:?}")]
    Timeout {
        owner: String,
        timeout: std::time::Duration,
    },

    #[error("HTTP error: {0}")]
    Http(String),
}
