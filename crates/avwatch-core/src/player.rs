//! The player-facing surface consumed by the tracker
//!
//! [`AvPlayer`] is the narrow contract an AVPlay-style playback engine must
//! satisfy. The engine itself (buffering, decoding, network fetch) is an
//! external collaborator; the tracker only reads its reported state and
//! brackets a handful of control calls.

use crate::error::{Error, Result};
use crate::types::{PlaybackState, StreamInfoEntry};
use url::Url;

/// Completion callback for an asynchronous seek/jump operation.
///
/// `FnOnce` by construction: a completion can fire at most once, which is
/// what makes the seek bracket's one-end-per-start guarantee hold.
pub type SeekCallback = Box<dyn FnOnce() + Send + 'static>;

/// Error callback for an asynchronous seek/jump operation.
pub type PlayerErrorCallback = Box<dyn FnOnce(Error) + Send + 'static>;

/// Native callback handlers installed via [`AvPlayer::set_listener`].
///
/// Every handler is optional; players that do not emit a given callback
/// simply never invoke it. The buffering/error/completion handlers are
/// independent of the polling path and may race with it for the same
/// logical event.
#[derive(Default)]
pub struct PlayerListeners {
    pub on_buffering_start: Option<Box<dyn Fn() + Send + Sync>>,
    pub on_buffering_progress: Option<Box<dyn Fn(u32) + Send + Sync>>,
    pub on_buffering_complete: Option<Box<dyn Fn() + Send + Sync>>,
    pub on_current_playtime: Option<Box<dyn Fn(f64) + Send + Sync>>,
    pub on_stream_completed: Option<Box<dyn Fn() + Send + Sync>>,
    pub on_error: Option<Box<dyn Fn(&str) + Send + Sync>>,
    pub on_error_msg: Option<Box<dyn Fn(&str, &str) + Send + Sync>>,
}

/// Contract for an AVPlay-style media player.
///
/// `state()` must be idempotent and side-effect-free; the monitor calls it
/// at up to twice per second by default. Operations a given player build
/// does not implement return [`Error::Unsupported`] rather than panicking.
pub trait AvPlayer: Send + Sync {
    /// Current lifecycle state as reported by the player.
    fn state(&self) -> Result<PlaybackState>;

    /// Playback position in seconds.
    fn current_time(&self) -> Result<f64>;

    /// Content duration in seconds.
    fn duration(&self) -> Result<f64>;

    /// Player firmware/library version string, e.g. `"6.0.1"`.
    fn version(&self) -> Result<String>;

    /// Install the named native callbacks. Replaces any previous set.
    fn set_listener(&self, listeners: PlayerListeners) -> Result<()>;

    /// Prepare the given content URL for playback.
    fn open(&self, url: &Url) -> Result<()>;

    /// Seek to an absolute position in milliseconds.
    ///
    /// `on_done` fires when the operation completes; `on_error` when it
    /// fails. Implementations must preserve the caller's arity: a `None`
    /// error callback is passed through as absent, never substituted.
    fn seek_to(
        &self,
        position_ms: u64,
        on_done: Option<SeekCallback>,
        on_error: Option<PlayerErrorCallback>,
    ) -> Result<()>;

    /// Jump forward by a relative offset in milliseconds.
    fn jump_forward(
        &self,
        offset_ms: u64,
        on_done: Option<SeekCallback>,
        on_error: Option<PlayerErrorCallback>,
    ) -> Result<()>;

    /// Jump backward by a relative offset in milliseconds.
    fn jump_backward(
        &self,
        offset_ms: u64,
        on_done: Option<SeekCallback>,
        on_error: Option<PlayerErrorCallback>,
    ) -> Result<()>;

    /// Read a named streaming property, e.g. `CURRENT_BANDWITH`.
    fn streaming_property(&self, name: &str) -> Result<String>;

    /// Track metadata for the currently prepared stream.
    fn current_stream_info(&self) -> Result<Vec<StreamInfoEntry>>;
}
