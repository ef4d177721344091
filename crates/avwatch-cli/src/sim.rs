//! Scripted playback simulation
//!
//! Drives a real tracker against an in-memory player that walks through a
//! canned state timeline, then prints the captured analytics event stream.

use avwatch_core::{
    AvPlayTracker, AvPlayer, BeaconCollector, PlaybackState, PlayerErrorCallback, PlayerListeners,
    Result, SeekCallback, StreamInfoEntry, TrackKind, TrackerConfig, VideoCollector,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::info;
use url::Url;

/// Player stub for the simulation: state is whatever the timeline last set.
struct SimPlayer {
    state: Mutex<PlaybackState>,
    position: Mutex<f64>,
}

impl SimPlayer {
    fn new() -> Self {
        Self {
            state: Mutex::new(PlaybackState::None),
            position: Mutex::new(0.0),
        }
    }

    fn set_state(&self, state: PlaybackState) {
        *self.state.lock().unwrap() = state;
    }
}

impl AvPlayer for SimPlayer {
    fn state(&self) -> Result<PlaybackState> {
        Ok(*self.state.lock().unwrap())
    }

    fn current_time(&self) -> Result<f64> {
        Ok(*self.position.lock().unwrap())
    }

    fn duration(&self) -> Result<f64> {
        Ok(600.0)
    }

    fn version(&self) -> Result<String> {
        Ok("6.0.0-sim".to_string())
    }

    fn set_listener(&self, _listeners: PlayerListeners) -> Result<()> {
        Ok(())
    }

    fn open(&self, _url: &Url) -> Result<()> {
        Ok(())
    }

    fn seek_to(
        &self,
        position_ms: u64,
        on_done: Option<SeekCallback>,
        _on_error: Option<PlayerErrorCallback>,
    ) -> Result<()> {
        *self.position.lock().unwrap() = position_ms as f64 / 1000.0;
        if let Some(done) = on_done {
            done();
        }
        Ok(())
    }

    fn jump_forward(
        &self,
        offset_ms: u64,
        on_done: Option<SeekCallback>,
        _on_error: Option<PlayerErrorCallback>,
    ) -> Result<()> {
        *self.position.lock().unwrap() += offset_ms as f64 / 1000.0;
        if let Some(done) = on_done {
            done();
        }
        Ok(())
    }

    fn jump_backward(
        &self,
        offset_ms: u64,
        on_done: Option<SeekCallback>,
        _on_error: Option<PlayerErrorCallback>,
    ) -> Result<()> {
        *self.position.lock().unwrap() -= offset_ms as f64 / 1000.0;
        if let Some(done) = on_done {
            done();
        }
        Ok(())
    }

    fn streaming_property(&self, name: &str) -> Result<String> {
        match name {
            "CURRENT_BANDWITH" => Ok("2500000".to_string()),
            _ => Err(avwatch_core::Error::Unsupported {
                method: "streaming_property",
            }),
        }
    }

    fn current_stream_info(&self) -> Result<Vec<StreamInfoEntry>> {
        Ok(vec![
            StreamInfoEntry::new(TrackKind::Video, r#"{"Width":1280,"Height":720}"#),
            StreamInfoEntry::new(TrackKind::Audio, r#"{"language":"en"}"#),
        ])
    }
}

pub async fn run(format: &str, interval_ms: u64, rebuffer: bool, seek: bool) -> anyhow::Result<()> {
    let player = Arc::new(SimPlayer::new());
    let collector = Arc::new(BeaconCollector::new());
    let tracker = AvPlayTracker::new(
        Arc::clone(&player) as Arc<dyn AvPlayer>,
        Arc::clone(&collector) as Arc<dyn VideoCollector>,
        TrackerConfig {
            monitor_interval: Duration::from_millis(interval_ms),
        },
    );

    let url = Url::parse("https://cdn.example.com/sim/master.m3u8")?;
    tracker.handle().open(&url)?;
    tracker.register_listeners();

    // One settle period per phase: at least one poll fires between states
    let settle = Duration::from_millis(interval_ms * 3);

    let mut timeline = vec![
        PlaybackState::Idle,
        PlaybackState::Ready,
        PlaybackState::Playing,
        PlaybackState::Paused,
        PlaybackState::Playing,
    ];
    if rebuffer {
        timeline.push(PlaybackState::Buffering);
        timeline.push(PlaybackState::Playing);
    }
    timeline.push(PlaybackState::None);

    for state in timeline {
        player.set_state(state);
        info!(state = %state, "timeline phase");
        tokio::time::sleep(settle).await;

        if seek && state == PlaybackState::Playing {
            tracker.handle().seek_to(5000, None, None)?;
        }
    }

    tracker.unregister_listeners();

    info!(
        src = %tracker.src().map_or_else(|| "-".to_string(), |u| u.to_string()),
        bit_rate = tracker.bit_rate().unwrap_or(0),
        width = tracker.rendition_width().unwrap_or(0),
        height = tracker.rendition_height().unwrap_or(0),
        "session summary"
    );

    let events = collector.events();
    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&events)?);
    } else {
        for record in &events {
            println!(
                "{:>4}  {}  {:?}",
                record.sequence,
                record.timestamp.format("%H:%M:%S%.3f"),
                record.event
            );
        }
        println!("\n{} events captured", events.len());
    }

    Ok(())
}
