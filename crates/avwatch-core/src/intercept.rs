//! Control-method interception
//!
//! Seek duration and content source cannot be inferred from polled state
//! alone, so the tracker decorates the player's control surface:
//! seek/jump calls are bracketed with seek-start/seek-end events, and the
//! URL passed to `open` is captured for later reporting. This is explicit
//! decoration: the interceptor is a new player-facing handle implementing
//! [`AvPlayer`]; no shared object's method table is ever mutated.

use crate::collector::VideoCollector;
use crate::error::Result;
use crate::player::{AvPlayer, PlayerErrorCallback, PlayerListeners, SeekCallback};
use crate::types::{PlaybackState, StreamInfoEntry};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, trace, warn};
use url::Url;

/// Decorated player handle routing seek/jump/open through bracketing logic.
///
/// Hosts should issue control calls through this handle; every other
/// operation delegates to the wrapped player untouched.
pub struct InterceptedPlayer {
    inner: Arc<dyn AvPlayer>,
    collector: Arc<dyn VideoCollector>,
    content_src: Mutex<Option<Url>>,
    pending: Arc<AtomicUsize>,
}

impl InterceptedPlayer {
    pub fn new(inner: Arc<dyn AvPlayer>, collector: Arc<dyn VideoCollector>) -> Self {
        Self {
            inner,
            collector,
            content_src: Mutex::new(None),
            pending: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Last URL passed to `open`, if any.
    pub fn content_src(&self) -> Option<Url> {
        self.content_src.lock().unwrap().clone()
    }

    /// Number of seek brackets whose completion callback has not fired.
    ///
    /// An operation that errors without invoking its success callback leaves
    /// its bracket unresolved indefinitely; no timeout is imposed. This
    /// counter makes such leaks observable.
    pub fn pending_seeks(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    /// Open a seek bracket: emit seek-start now and return the substituted
    /// completion callback that closes it.
    ///
    /// The substitution invokes the caller's original callback first, then
    /// emits seek-end. `FnOnce` guarantees exactly one seek-end per
    /// seek-start under successful completion.
    fn bracket(&self, method: &'static str, on_done: Option<SeekCallback>) -> SeekCallback {
        self.pending.fetch_add(1, Ordering::SeqCst);
        self.collector.send_seek_start();

        let collector = Arc::clone(&self.collector);
        let pending = Arc::clone(&self.pending);
        Box::new(move || {
            if let Some(done) = on_done {
                done();
            }
            collector.send_seek_end();
            pending.fetch_sub(1, Ordering::SeqCst);
            trace!(method, "seek bracket closed");
        })
    }
}

impl AvPlayer for InterceptedPlayer {
    fn state(&self) -> Result<PlaybackState> {
        self.inner.state()
    }

    fn current_time(&self) -> Result<f64> {
        self.inner.current_time()
    }

    fn duration(&self) -> Result<f64> {
        self.inner.duration()
    }

    fn version(&self) -> Result<String> {
        self.inner.version()
    }

    fn set_listener(&self, listeners: PlayerListeners) -> Result<()> {
        self.inner.set_listener(listeners)
    }

    /// Captures the URL as the content source, then delegates with no other
    /// side effects.
    fn open(&self, url: &Url) -> Result<()> {
        *self.content_src.lock().unwrap() = Some(url.clone());
        debug!(url = %url, "content source captured");
        self.inner.open(url)
    }

    fn seek_to(
        &self,
        position_ms: u64,
        on_done: Option<SeekCallback>,
        on_error: Option<PlayerErrorCallback>,
    ) -> Result<()> {
        let done = self.bracket("seek_to", on_done);
        self.inner
            .seek_to(position_ms, Some(done), on_error)
            .inspect_err(|err| {
                warn!(code = err.error_code(), error = %err, "seek_to failed, bracket left open");
            })
    }

    fn jump_forward(
        &self,
        offset_ms: u64,
        on_done: Option<SeekCallback>,
        on_error: Option<PlayerErrorCallback>,
    ) -> Result<()> {
        let done = self.bracket("jump_forward", on_done);
        self.inner
            .jump_forward(offset_ms, Some(done), on_error)
            .inspect_err(|err| {
                warn!(code = err.error_code(), error = %err, "jump_forward failed, bracket left open");
            })
    }

    fn jump_backward(
        &self,
        offset_ms: u64,
        on_done: Option<SeekCallback>,
        on_error: Option<PlayerErrorCallback>,
    ) -> Result<()> {
        let done = self.bracket("jump_backward", on_done);
        self.inner
            .jump_backward(offset_ms, Some(done), on_error)
            .inspect_err(|err| {
                warn!(code = err.error_code(), error = %err, "jump_backward failed, bracket left open");
            })
    }

    fn streaming_property(&self, name: &str) -> Result<String> {
        self.inner.streaming_property(name)
    }

    fn current_stream_info(&self) -> Result<Vec<StreamInfoEntry>> {
        self.inner.current_stream_info()
    }
}
