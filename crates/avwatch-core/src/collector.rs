//! The analytics surface produced by the tracker
//!
//! [`VideoCollector`] is the capability interface the tracker drives. It is
//! constructor-injected rather than inherited from, so any collector (the
//! built-in [`crate::beacon::BeaconCollector`], a test recorder, or a binding
//! to a third-party SDK) can receive the event stream.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Structured payload for [`VideoCollector::send_error`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub error_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl ErrorPayload {
    pub fn new(error_code: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            error_message: None,
        }
    }

    pub fn with_message(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            error_message: Some(message.into()),
        }
    }
}

impl From<&Error> for ErrorPayload {
    fn from(err: &Error) -> Self {
        ErrorPayload::with_message(err.error_code(), err.to_string())
    }
}

/// Fixed vocabulary of analytics actions.
///
/// Zero-argument actions mark lifecycle boundaries; `send_error` and
/// `send_download` carry structured payloads. Implementations must not
/// panic: these are invoked from the monitoring loop and from native player
/// callbacks.
pub trait VideoCollector: Send + Sync {
    /// Content has been requested (session opens).
    fn send_request(&self);
    /// Playback began.
    fn send_start(&self);
    /// Playback paused.
    fn send_pause(&self);
    /// Playback resumed from pause.
    fn send_resume(&self);
    /// Rebuffering began.
    fn send_buffer_start(&self);
    /// Rebuffering ended.
    fn send_buffer_end(&self);
    /// A seek/jump operation was issued.
    fn send_seek_start(&self);
    /// A seek/jump operation completed.
    fn send_seek_end(&self);
    /// Playback ended.
    fn send_end(&self);
    /// The player reported an error.
    fn send_error(&self, payload: ErrorPayload);
    /// Auxiliary download/progress report.
    fn send_download(&self, payload: Option<Value>);
}
