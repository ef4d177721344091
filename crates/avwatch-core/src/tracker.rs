//! Tracker - main orchestrator for playback instrumentation
//!
//! Owns:
//! - the state monitor (polling path)
//! - the event listener bridge (native callback path)
//! - the intercepted player handle (control path)
//! - the reporting accessors the collector consumes on demand

use crate::bridge::EventListenerBridge;
use crate::collector::VideoCollector;
use crate::error::{Error, Result};
use crate::intercept::InterceptedPlayer;
use crate::monitor::StateMonitor;
use crate::player::AvPlayer;
use crate::types::{StreamInfo, TrackerConfig};
use std::sync::Arc;
use tracing::{info, warn};
use url::Url;

/// Reported tracker name
pub const TRACKER_NAME: &str = "avplay";

/// Reported player name
pub const PLAYER_NAME: &str = "Tizen AVPlay";

// The AVPlay API spells this property without the D.
const BANDWIDTH_PROPERTY: &str = "CURRENT_BANDWITH";

/// Playback analytics tracker for one player instance.
///
/// The collector is a constructor-injected collaborator; all mutable
/// tracking state (observed playback state, content source, seek brackets)
/// is scoped to this instance.
pub struct AvPlayTracker {
    player: Arc<InterceptedPlayer>,
    monitor: StateMonitor,
    bridge: EventListenerBridge,
}

impl AvPlayTracker {
    pub fn new(
        player: Arc<dyn AvPlayer>,
        collector: Arc<dyn VideoCollector>,
        config: TrackerConfig,
    ) -> Self {
        if player.version().is_err() {
            // Matches the reference behavior: version support is reported
            // once at construction, not treated as fatal.
            warn!("player does not report a version");
        }

        let intercepted = Arc::new(InterceptedPlayer::new(
            Arc::clone(&player),
            Arc::clone(&collector),
        ));
        let monitor = StateMonitor::new(player, Arc::clone(&collector), config.monitor_interval);
        let bridge = EventListenerBridge::new(collector);

        info!(
            interval_ms = config.monitor_interval.as_millis() as u64,
            "tracker created"
        );

        Self {
            player: intercepted,
            monitor,
            bridge,
        }
    }

    /// Install native callbacks and start state monitoring.
    ///
    /// A player without listener support only loses the callback path; the
    /// polling path still runs.
    pub fn register_listeners(&self) {
        if let Err(err) = self.bridge.install(self.player.as_ref()) {
            warn!(code = err.error_code(), error = %err, "listener registration failed, relying on state polling only");
        }
        self.monitor.start();
    }

    /// Stop state monitoring.
    pub fn unregister_listeners(&self) {
        self.monitor.stop();
    }

    /// The decorated player handle hosts should issue control calls through.
    pub fn handle(&self) -> Arc<InterceptedPlayer> {
        Arc::clone(&self.player)
    }

    /// Direct access to the state monitor, e.g. for host-scheduled sampling.
    pub fn monitor(&self) -> &StateMonitor {
        &self.monitor
    }

    pub fn is_monitoring(&self) -> bool {
        self.monitor.is_active()
    }

    /// Number of seek brackets still awaiting completion.
    pub fn pending_seeks(&self) -> usize {
        self.player.pending_seeks()
    }

    // ------------------------------------------------------------------
    // Reporting accessors
    // ------------------------------------------------------------------

    /// Playback position in milliseconds.
    pub fn playhead(&self) -> Result<u64> {
        let seconds = self.player.current_time()?;
        Ok((seconds * 1000.0).round() as u64)
    }

    /// Content duration in seconds.
    pub fn duration(&self) -> Result<f64> {
        self.player.duration()
    }

    /// Last opened content URL, if `open` went through the tracked handle.
    pub fn src(&self) -> Option<Url> {
        self.player.content_src()
    }

    /// Current bandwidth in bits per second.
    pub fn bit_rate(&self) -> Result<u64> {
        let raw = self.player.streaming_property(BANDWIDTH_PROPERTY)?;
        raw.trim().parse().map_err(|_| Error::PropertyParse {
            name: BANDWIDTH_PROPERTY.to_string(),
            value: raw,
        })
    }

    /// Fresh rendition/language snapshot from the player's track metadata.
    pub fn stream_info(&self) -> Result<StreamInfo> {
        let entries = self.player.current_stream_info()?;
        Ok(StreamInfo::from_entries(&entries))
    }

    pub fn rendition_width(&self) -> Option<u32> {
        self.stream_info().ok().and_then(|info| info.rendition_width)
    }

    pub fn rendition_height(&self) -> Option<u32> {
        self.stream_info().ok().and_then(|info| info.rendition_height)
    }

    pub fn language(&self) -> Option<String> {
        self.stream_info().ok().and_then(|info| info.language)
    }

    pub fn tracker_name(&self) -> &'static str {
        TRACKER_NAME
    }

    pub fn tracker_version(&self) -> &'static str {
        crate::VERSION
    }

    pub fn player_name(&self) -> &'static str {
        PLAYER_NAME
    }

    pub fn player_version(&self) -> Result<String> {
        self.player.version()
    }

    /// Leading component of the player version, e.g. `6` for `"6.0.1"`.
    pub fn player_major_version(&self) -> Option<u32> {
        let version = self.player.version().ok()?;
        version.split('.').next()?.trim().parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MockPlayer, RecordingCollector};
    use crate::types::{PlaybackState, StreamInfoEntry, TrackKind};

    fn tracker_with(player: Arc<MockPlayer>) -> (AvPlayTracker, Arc<RecordingCollector>) {
        let collector = Arc::new(RecordingCollector::default());
        let tracker = AvPlayTracker::new(
            player as Arc<dyn AvPlayer>,
            Arc::clone(&collector) as Arc<dyn VideoCollector>,
            TrackerConfig::default(),
        );
        (tracker, collector)
    }

    #[test]
    fn test_playhead_is_milliseconds() {
        let player = Arc::new(MockPlayer::with_state(PlaybackState::Playing));
        player.set_current_time(12.5);
        let (tracker, _) = tracker_with(player);

        assert_eq!(tracker.playhead().unwrap(), 12500);
    }

    #[test]
    fn test_bit_rate_parses_property() {
        let player = Arc::new(MockPlayer::with_state(PlaybackState::Playing));
        player.set_property("CURRENT_BANDWITH", "1500000");
        let (tracker, _) = tracker_with(player);

        assert_eq!(tracker.bit_rate().unwrap(), 1_500_000);
    }

    #[test]
    fn test_bit_rate_malformed_property() {
        let player = Arc::new(MockPlayer::with_state(PlaybackState::Playing));
        player.set_property("CURRENT_BANDWITH", "n/a");
        let (tracker, _) = tracker_with(player);

        let err = tracker.bit_rate().unwrap_err();
        assert_eq!(err.error_code(), "PROPERTY_PARSE");
    }

    #[test]
    fn test_identity_accessors() {
        let player = Arc::new(MockPlayer::with_state(PlaybackState::Idle));
        let (tracker, _) = tracker_with(player);

        assert_eq!(tracker.tracker_name(), "avplay");
        assert_eq!(tracker.tracker_version(), crate::VERSION);
        assert_eq!(tracker.player_name(), "Tizen AVPlay");
        assert_eq!(tracker.player_version().unwrap(), "6.0.1");
        assert_eq!(tracker.player_major_version(), Some(6));
    }

    #[test]
    fn test_major_version_absent_when_unsupported() {
        let player = Arc::new(MockPlayer::with_state(PlaybackState::Idle));
        player.set_version(None);
        let (tracker, _) = tracker_with(player);

        assert!(tracker.player_version().is_err());
        assert_eq!(tracker.player_major_version(), None);
    }

    #[test]
    fn test_stream_info_accessors() {
        let player = Arc::new(MockPlayer::with_state(PlaybackState::Playing));
        player.set_stream_info(vec![
            StreamInfoEntry::new(TrackKind::Video, r#"{"Width":1920,"Height":1080}"#),
            StreamInfoEntry::new(TrackKind::Audio, r#"{"language":"en"}"#),
        ]);
        let (tracker, _) = tracker_with(player);

        assert_eq!(tracker.rendition_width(), Some(1920));
        assert_eq!(tracker.rendition_height(), Some(1080));
        assert_eq!(tracker.language().as_deref(), Some("en"));
    }

    #[tokio::test]
    async fn test_register_unregister_listeners() {
        let player = Arc::new(MockPlayer::with_state(PlaybackState::Idle));
        let (tracker, _) = tracker_with(Arc::clone(&player));

        assert!(!tracker.is_monitoring());
        tracker.register_listeners();
        assert!(tracker.is_monitoring());

        // Native callbacks are live once registered
        player.fire_stream_completed();

        tracker.unregister_listeners();
        assert!(!tracker.is_monitoring());
    }

    #[test]
    fn test_src_reflects_opened_url() {
        let player = Arc::new(MockPlayer::with_state(PlaybackState::Idle));
        let (tracker, _) = tracker_with(player);

        assert!(tracker.src().is_none());

        let url = Url::parse("https://cdn.example.com/live/channel.mpd").unwrap();
        tracker.handle().open(&url).unwrap();
        assert_eq!(tracker.src(), Some(url));
    }
}
