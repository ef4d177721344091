//! Error types for AVWatch Core

use thiserror::Error;

/// Result type alias for tracker operations
pub type Result<T> = std::result::Result<T, Error>;

/// Tracker error types
#[derive(Error, Debug)]
pub enum Error {
    // Capability errors
    #[error("player does not support {method}")]
    Unsupported { method: &'static str },

    // State monitoring errors
    #[error("failed to read player state: {0}")]
    StateRead(String),

    #[error("unrecognized playback state: {0:?}")]
    UnknownState(String),

    // Metadata errors
    #[error("malformed stream info for {kind} track")]
    StreamInfoParse {
        kind: String,
        source: serde_json::Error,
    },

    #[error("malformed streaming property {name}: {value:?}")]
    PropertyParse { name: String, value: String },

    // Control errors
    #[error("seek rejected: {0}")]
    SeekRejected(String),

    #[error("listener registration failed: {0}")]
    ListenerSetup(String),

    // Player-reported errors
    #[error("playback error {code}")]
    Playback {
        code: String,
        message: Option<String>,
    },

    // Configuration errors
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // Internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Returns true if the monitoring loop should survive this error and
    /// retry on the next scheduled sample.
    pub fn is_transient(&self) -> bool {
        !matches!(self, Error::Unsupported { .. } | Error::InvalidConfig(_))
    }

    /// Returns the error code for analytics payloads
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::Unsupported { .. } => "UNSUPPORTED",
            Error::StateRead(_) => "STATE_READ",
            Error::UnknownState(_) => "UNKNOWN_STATE",
            Error::StreamInfoParse { .. } => "STREAM_INFO_PARSE",
            Error::PropertyParse { .. } => "PROPERTY_PARSE",
            Error::SeekRejected(_) => "SEEK_REJECTED",
            Error::ListenerSetup(_) => "LISTENER_SETUP",
            Error::Playback { .. } => "PLAYBACK",
            Error::InvalidConfig(_) => "INVALID_CONFIG",
            Error::Internal(_) => "INTERNAL",
        }
    }
}
