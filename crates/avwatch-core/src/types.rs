//! Core types for AVWatch

use crate::error::Error;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;
use uuid::Uuid;

/// Unique identifier for a tracking session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Playback lifecycle states as reported by the player's own accessor.
///
/// The underlying player may only ever report a subset of these; no ordering
/// is implied between values and transitions are defined pairwise in
/// [`crate::transitions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlaybackState {
    /// Player is stopped or has been reset
    None,
    /// Player is idle, ready to prepare content
    Idle,
    /// Content is prepared, playback has not begun
    Ready,
    /// Content is playing
    Playing,
    /// Playback paused
    Paused,
    /// Player is rebuffering
    Buffering,
}

impl FromStr for PlaybackState {
    type Err = Error;

    /// Parses the raw state string the AVPlay API reports. Unrecognized
    /// strings are rejected here, at the boundary, so the transition mapper
    /// stays total over the typed enum.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NONE" => Ok(PlaybackState::None),
            "IDLE" => Ok(PlaybackState::Idle),
            "READY" => Ok(PlaybackState::Ready),
            "PLAYING" => Ok(PlaybackState::Playing),
            "PAUSED" => Ok(PlaybackState::Paused),
            "BUFFERING" => Ok(PlaybackState::Buffering),
            other => Err(Error::UnknownState(other.to_string())),
        }
    }
}

impl std::fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlaybackState::None => write!(f, "none"),
            PlaybackState::Idle => write!(f, "idle"),
            PlaybackState::Ready => write!(f, "ready"),
            PlaybackState::Playing => write!(f, "playing"),
            PlaybackState::Paused => write!(f, "paused"),
            PlaybackState::Buffering => write!(f, "buffering"),
        }
    }
}

/// Tracker configuration
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Interval between state samples
    pub monitor_interval: Duration,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            monitor_interval: Duration::from_millis(500),
        }
    }
}

/// Track categories reported by `getCurrentStreamInfo`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrackKind {
    Video,
    Audio,
    Text,
}

impl std::fmt::Display for TrackKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackKind::Video => write!(f, "VIDEO"),
            TrackKind::Audio => write!(f, "AUDIO"),
            TrackKind::Text => write!(f, "TEXT"),
        }
    }
}

/// One entry of the player's current stream info. `extra_info` is a
/// JSON-encoded string carrying `Width`/`Height` for video tracks and
/// `language` for audio tracks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamInfoEntry {
    pub kind: TrackKind,
    pub extra_info: String,
}

impl StreamInfoEntry {
    pub fn new(kind: TrackKind, extra_info: impl Into<String>) -> Self {
        Self {
            kind,
            extra_info: extra_info.into(),
        }
    }
}

/// Snapshot of the current rendition and audio language, computed on demand
/// from the player's track metadata and never cached between calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StreamInfo {
    pub rendition_width: Option<u32>,
    pub rendition_height: Option<u32>,
    pub language: Option<String>,
}

impl StreamInfo {
    /// Derive a snapshot from raw stream-info entries.
    ///
    /// A malformed `extra_info` payload skips that entry only; the remaining
    /// entries are still processed and the corresponding fields stay unset.
    pub fn from_entries(entries: &[StreamInfoEntry]) -> Self {
        let mut info = StreamInfo::default();

        for entry in entries {
            let value: Value = match serde_json::from_str(&entry.extra_info) {
                Ok(value) => value,
                Err(source) => {
                    let err = Error::StreamInfoParse {
                        kind: entry.kind.to_string(),
                        source,
                    };
                    warn!(error = %err, "skipping malformed stream info entry");
                    continue;
                }
            };

            match entry.kind {
                TrackKind::Video => {
                    info.rendition_width = dimension(&value, "Width").or(info.rendition_width);
                    info.rendition_height = dimension(&value, "Height").or(info.rendition_height);
                }
                TrackKind::Audio => {
                    if let Some(language) = value.get("language").and_then(Value::as_str) {
                        info.language = Some(language.to_string());
                    }
                }
                TrackKind::Text => {}
            }
        }

        info
    }
}

// AVPlay reports Width/Height as a JSON number on some firmware versions and
// as a quoted string on others.
fn dimension(value: &Value, key: &str) -> Option<u32> {
    match value.get(key)? {
        Value::Number(n) => n.as_u64().map(|n| n as u32),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
