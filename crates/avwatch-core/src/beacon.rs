//! Default analytics collector
//!
//! Stamps every lifecycle action into a sequenced, timestamped event record
//! and ships it two ways:
//! - a background processor task fed through an mpsc channel (debug trail)
//! - batched JSON POSTs to an optional beacon endpoint
//!
//! Emission is synchronous because collector calls originate inside the
//! monitoring loop and native player callbacks, which cannot await.

use crate::collector::{ErrorPayload, VideoCollector};
use crate::types::SessionId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Lifecycle event vocabulary, one variant per collector action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TrackerEvent {
    /// Content requested
    Request,
    /// Playback started
    Start,
    /// Playback paused
    Pause,
    /// Playback resumed
    Resume,
    /// Rebuffering started
    BufferStart,
    /// Rebuffering ended
    BufferEnd,
    /// Seek issued
    SeekStart,
    /// Seek completed
    SeekEnd,
    /// Playback ended
    End,
    /// Player-reported error
    Error {
        #[serde(flatten)]
        payload: ErrorPayload,
    },
    /// Auxiliary download/progress report
    Download {
        #[serde(skip_serializing_if = "Option::is_none")]
        payload: Option<Value>,
    },
}

/// Event with delivery metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerEventRecord {
    /// Unique event ID
    pub id: Uuid,
    /// Tracking session ID
    pub session_id: SessionId,
    /// Timestamp
    pub timestamp: DateTime<Utc>,
    /// Sequence number, 1-based and strictly increasing per session
    pub sequence: u64,
    /// The event
    #[serde(flatten)]
    pub event: TrackerEvent,
}

/// Default [`VideoCollector`] implementation
pub struct BeaconCollector {
    /// Session ID
    session_id: SessionId,
    /// Event sequence counter
    sequence: AtomicU64,
    /// Event buffer
    buffer: Mutex<Vec<TrackerEventRecord>>,
    /// Maximum buffer size before flush
    max_buffer_size: usize,
    /// Event channel for async processing
    event_tx: mpsc::Sender<TrackerEventRecord>,
    /// Beacon endpoint (if configured)
    beacon_url: Option<String>,
}

impl BeaconCollector {
    /// Create a new collector. Must be called within a tokio runtime.
    pub fn new() -> Self {
        let (event_tx, mut event_rx) = mpsc::channel::<TrackerEventRecord>(1000);

        // Spawn background processor
        tokio::spawn(async move {
            while let Some(record) = event_rx.recv().await {
                debug!(
                    event_id = %record.id,
                    sequence = record.sequence,
                    event = ?record.event,
                    "analytics event"
                );
            }
        });

        Self {
            session_id: SessionId::new(),
            sequence: AtomicU64::new(0),
            buffer: Mutex::new(Vec::new()),
            max_buffer_size: 50,
            event_tx,
            beacon_url: None,
        }
    }

    /// Create with beacon endpoint
    pub fn with_beacon(beacon_url: impl Into<String>) -> Self {
        let mut collector = Self::new();
        collector.beacon_url = Some(beacon_url.into());
        collector
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// Emit an event record
    pub fn emit(&self, event: TrackerEvent) {
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;

        let record = TrackerEventRecord {
            id: Uuid::new_v4(),
            session_id: self.session_id,
            timestamp: Utc::now(),
            sequence,
            event,
        };

        // Buffer, flushing a full batch to the beacon
        let full_batch = {
            let mut buffer = self.buffer.lock().unwrap();
            buffer.push(record.clone());
            if buffer.len() >= self.max_buffer_size {
                Some(buffer.drain(..).collect::<Vec<_>>())
            } else {
                None
            }
        };
        if let Some(batch) = full_batch {
            self.post_batch(batch);
        }

        // Hand to the background processor; dropping here only loses the
        // debug trail, never the buffered record
        if let Err(err) = self.event_tx.try_send(record) {
            warn!(error = %err, "analytics channel full, record not traced");
        }
    }

    /// Drain and deliver everything currently buffered.
    pub fn flush(&self) {
        let batch: Vec<_> = self.buffer.lock().unwrap().drain(..).collect();
        self.post_batch(batch);
    }

    fn post_batch(&self, events: Vec<TrackerEventRecord>) {
        if events.is_empty() {
            return;
        }

        info!(count = events.len(), "flushing analytics events");

        // Fire-and-forget beacon delivery
        if let Some(url) = self.beacon_url.clone() {
            tokio::spawn(async move {
                let client = reqwest::Client::new();
                if let Err(err) = client.post(&url).json(&events).send().await {
                    warn!(error = %err, "beacon delivery failed");
                }
            });
        }
    }

    /// Get all buffered events
    pub fn events(&self) -> Vec<TrackerEventRecord> {
        self.buffer.lock().unwrap().clone()
    }

    /// Clear buffer
    pub fn clear(&self) {
        self.buffer.lock().unwrap().clear();
    }
}

impl Default for BeaconCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl VideoCollector for BeaconCollector {
    fn send_request(&self) {
        self.emit(TrackerEvent::Request);
    }

    fn send_start(&self) {
        self.emit(TrackerEvent::Start);
    }

    fn send_pause(&self) {
        self.emit(TrackerEvent::Pause);
    }

    fn send_resume(&self) {
        self.emit(TrackerEvent::Resume);
    }

    fn send_buffer_start(&self) {
        self.emit(TrackerEvent::BufferStart);
    }

    fn send_buffer_end(&self) {
        self.emit(TrackerEvent::BufferEnd);
    }

    fn send_seek_start(&self) {
        self.emit(TrackerEvent::SeekStart);
    }

    fn send_seek_end(&self) {
        self.emit(TrackerEvent::SeekEnd);
    }

    fn send_end(&self) {
        self.emit(TrackerEvent::End);
    }

    fn send_error(&self, payload: ErrorPayload) {
        self.emit(TrackerEvent::Error { payload });
    }

    fn send_download(&self, payload: Option<Value>) {
        self.emit(TrackerEvent::Download { payload });
    }
}
