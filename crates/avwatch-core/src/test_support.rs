//! Shared fixtures for unit tests: a scriptable in-memory player and a
//! collector that records the order of calls it receives.

use crate::collector::{ErrorPayload, VideoCollector};
use crate::error::{Error, Result};
use crate::player::{AvPlayer, PlayerErrorCallback, PlayerListeners, SeekCallback};
use crate::types::{PlaybackState, StreamInfoEntry};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use url::Url;

/// Scriptable player whose reported state, failures, and callback timing are
/// controlled by the test.
pub(crate) struct MockPlayer {
    state: Mutex<Option<PlaybackState>>,
    fail_reads: AtomicBool,
    fail_seeks: AtomicBool,
    defer_seeks: AtomicBool,
    deferred: Mutex<Vec<SeekCallback>>,
    seek_calls: Mutex<Vec<u64>>,
    last_seek_error_arity: Mutex<Option<bool>>,
    opened: Mutex<Vec<Url>>,
    listeners: Mutex<Option<PlayerListeners>>,
    current_time: Mutex<f64>,
    duration: Mutex<f64>,
    version: Mutex<Option<String>>,
    properties: Mutex<HashMap<String, String>>,
    stream_entries: Mutex<Vec<StreamInfoEntry>>,
}

impl MockPlayer {
    pub fn with_state(state: PlaybackState) -> Self {
        Self {
            state: Mutex::new(Some(state)),
            fail_reads: AtomicBool::new(false),
            fail_seeks: AtomicBool::new(false),
            defer_seeks: AtomicBool::new(false),
            deferred: Mutex::new(Vec::new()),
            seek_calls: Mutex::new(Vec::new()),
            last_seek_error_arity: Mutex::new(None),
            opened: Mutex::new(Vec::new()),
            listeners: Mutex::new(None),
            current_time: Mutex::new(0.0),
            duration: Mutex::new(0.0),
            version: Mutex::new(Some("6.0.1".to_string())),
            properties: Mutex::new(HashMap::new()),
            stream_entries: Mutex::new(Vec::new()),
        }
    }

    /// A player build without a state accessor.
    pub fn unsupported() -> Self {
        let player = Self::with_state(PlaybackState::None);
        *player.state.lock().unwrap() = None;
        player
    }

    pub fn set_state(&self, state: PlaybackState) {
        *self.state.lock().unwrap() = Some(state);
    }

    pub fn fail_state_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_seeks(&self, fail: bool) {
        self.fail_seeks.store(fail, Ordering::SeqCst);
    }

    pub fn defer_seek_completion(&self, defer: bool) {
        self.defer_seeks.store(defer, Ordering::SeqCst);
    }

    pub fn complete_deferred_seeks(&self) {
        let deferred: Vec<SeekCallback> = self.deferred.lock().unwrap().drain(..).collect();
        for done in deferred {
            done();
        }
    }

    pub fn seek_calls(&self) -> Vec<u64> {
        self.seek_calls.lock().unwrap().clone()
    }

    pub fn last_seek_had_error_callback(&self) -> Option<bool> {
        *self.last_seek_error_arity.lock().unwrap()
    }

    pub fn opened(&self) -> Vec<Url> {
        self.opened.lock().unwrap().clone()
    }

    pub fn set_current_time(&self, seconds: f64) {
        *self.current_time.lock().unwrap() = seconds;
    }

    pub fn set_version(&self, version: Option<&str>) {
        *self.version.lock().unwrap() = version.map(str::to_string);
    }

    pub fn set_property(&self, name: &str, value: &str) {
        self.properties
            .lock()
            .unwrap()
            .insert(name.to_string(), value.to_string());
    }

    pub fn set_stream_info(&self, entries: Vec<StreamInfoEntry>) {
        *self.stream_entries.lock().unwrap() = entries;
    }

    fn run_seek(
        &self,
        target_ms: u64,
        on_done: Option<SeekCallback>,
        on_error: Option<PlayerErrorCallback>,
    ) -> Result<()> {
        self.seek_calls.lock().unwrap().push(target_ms);
        *self.last_seek_error_arity.lock().unwrap() = Some(on_error.is_some());

        if self.fail_seeks.load(Ordering::SeqCst) {
            if let Some(err_cb) = on_error {
                err_cb(Error::SeekRejected("injected failure".to_string()));
            }
            return Err(Error::SeekRejected("injected failure".to_string()));
        }

        if self.defer_seeks.load(Ordering::SeqCst) {
            if let Some(done) = on_done {
                self.deferred.lock().unwrap().push(done);
            }
        } else if let Some(done) = on_done {
            done();
        }
        Ok(())
    }

    fn with_listeners(&self, f: impl FnOnce(&PlayerListeners)) {
        let listeners = self.listeners.lock().unwrap();
        let listeners = listeners
            .as_ref()
            .expect("no listeners installed on MockPlayer");
        f(listeners);
    }

    pub fn fire_buffering_start(&self) {
        self.with_listeners(|l| {
            if let Some(handler) = &l.on_buffering_start {
                handler();
            }
        });
    }

    pub fn fire_buffering_progress(&self, percent: u32) {
        self.with_listeners(|l| {
            if let Some(handler) = &l.on_buffering_progress {
                handler(percent);
            }
        });
    }

    pub fn fire_buffering_complete(&self) {
        self.with_listeners(|l| {
            if let Some(handler) = &l.on_buffering_complete {
                handler();
            }
        });
    }

    pub fn fire_stream_completed(&self) {
        self.with_listeners(|l| {
            if let Some(handler) = &l.on_stream_completed {
                handler();
            }
        });
    }

    pub fn fire_error(&self, code: &str) {
        self.with_listeners(|l| {
            if let Some(handler) = &l.on_error {
                handler(code);
            }
        });
    }

    pub fn fire_error_msg(&self, code: &str, message: &str) {
        self.with_listeners(|l| {
            if let Some(handler) = &l.on_error_msg {
                handler(code, message);
            }
        });
    }
}

impl AvPlayer for MockPlayer {
    fn state(&self) -> Result<PlaybackState> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Error::StateRead("injected failure".to_string()));
        }
        self.state
            .lock()
            .unwrap()
            .ok_or(Error::Unsupported { method: "state" })
    }

    fn current_time(&self) -> Result<f64> {
        Ok(*self.current_time.lock().unwrap())
    }

    fn duration(&self) -> Result<f64> {
        Ok(*self.duration.lock().unwrap())
    }

    fn version(&self) -> Result<String> {
        self.version
            .lock()
            .unwrap()
            .clone()
            .ok_or(Error::Unsupported { method: "version" })
    }

    fn set_listener(&self, listeners: PlayerListeners) -> Result<()> {
        *self.listeners.lock().unwrap() = Some(listeners);
        Ok(())
    }

    fn open(&self, url: &Url) -> Result<()> {
        self.opened.lock().unwrap().push(url.clone());
        Ok(())
    }

    fn seek_to(
        &self,
        position_ms: u64,
        on_done: Option<SeekCallback>,
        on_error: Option<PlayerErrorCallback>,
    ) -> Result<()> {
        self.run_seek(position_ms, on_done, on_error)
    }

    fn jump_forward(
        &self,
        offset_ms: u64,
        on_done: Option<SeekCallback>,
        on_error: Option<PlayerErrorCallback>,
    ) -> Result<()> {
        self.run_seek(offset_ms, on_done, on_error)
    }

    fn jump_backward(
        &self,
        offset_ms: u64,
        on_done: Option<SeekCallback>,
        on_error: Option<PlayerErrorCallback>,
    ) -> Result<()> {
        self.run_seek(offset_ms, on_done, on_error)
    }

    fn streaming_property(&self, name: &str) -> Result<String> {
        self.properties
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or(Error::Unsupported {
                method: "streaming_property",
            })
    }

    fn current_stream_info(&self) -> Result<Vec<StreamInfoEntry>> {
        Ok(self.stream_entries.lock().unwrap().clone())
    }
}

/// Collector recording the order of calls it receives.
#[derive(Default)]
pub(crate) struct RecordingCollector {
    calls: Mutex<Vec<String>>,
}

impl RecordingCollector {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }
}

impl VideoCollector for RecordingCollector {
    fn send_request(&self) {
        self.record("send_request");
    }

    fn send_start(&self) {
        self.record("send_start");
    }

    fn send_pause(&self) {
        self.record("send_pause");
    }

    fn send_resume(&self) {
        self.record("send_resume");
    }

    fn send_buffer_start(&self) {
        self.record("send_buffer_start");
    }

    fn send_buffer_end(&self) {
        self.record("send_buffer_end");
    }

    fn send_seek_start(&self) {
        self.record("send_seek_start");
    }

    fn send_seek_end(&self) {
        self.record("send_seek_end");
    }

    fn send_end(&self) {
        self.record("send_end");
    }

    fn send_error(&self, payload: ErrorPayload) {
        match payload.error_message {
            Some(message) => self.record(format!("send_error:{}:{message}", payload.error_code)),
            None => self.record(format!("send_error:{}", payload.error_code)),
        }
    }

    fn send_download(&self, _payload: Option<serde_json::Value>) {
        self.record("send_download");
    }
}
