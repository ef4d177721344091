//! AVWatch Core - Playback Analytics Tracker
//!
//! This crate instruments AVPlay-style media players so an analytics
//! collector receives a consistent sequence of lifecycle events (request,
//! start, pause, resume, rebuffer, seek, error, end) even though the
//! underlying player exposes an incomplete and sometimes unreliable event
//! model:
//! - Periodic state sampling with diff-based transition detection
//! - Precedence-ordered, de-duplicated analytics action mapping
//! - Seek bracketing and content-source capture via player decoration
//! - Native callback forwarding where the player does emit events
//! - Sequenced, timestamped event records with optional beacon delivery
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        AVWatch Core                          │
//! ├──────────────────────────────────────────────────────────────┤
//! │                                                              │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐        │
//! │  │    State     │  │  Transition  │  │ Intercepted  │        │
//! │  │   Monitor    │──│    Mapper    │  │    Player    │        │
//! │  └──────┬───────┘  └──────┬───────┘  └──────┬───────┘        │
//! │         │                 │                 │                │
//! │         └─────────────────┼─────────────────┘                │
//! │                           │                                  │
//! │                    ┌──────┴──────┐                           │
//! │                    │   Tracker   │                           │
//! │                    └──────┬──────┘                           │
//! │                           │                                  │
//! │  ┌──────────────┐  ┌──────┴──────┐  ┌──────────────┐         │
//! │  │   Listener   │  │    Video    │  │    Beacon    │         │
//! │  │    Bridge    │  │  Collector  │  │   Delivery   │         │
//! │  └──────────────┘  └─────────────┘  └──────────────┘         │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod beacon;
pub mod bridge;
pub mod collector;
pub mod error;
pub mod intercept;
pub mod monitor;
pub mod player;
pub mod tracker;
pub mod transitions;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use beacon::{BeaconCollector, TrackerEvent, TrackerEventRecord};
pub use bridge::EventListenerBridge;
pub use collector::{ErrorPayload, VideoCollector};
pub use error::{Error, Result};
pub use intercept::InterceptedPlayer;
pub use monitor::StateMonitor;
pub use player::{AvPlayer, PlayerErrorCallback, PlayerListeners, SeekCallback};
pub use tracker::{AvPlayTracker, PLAYER_NAME, TRACKER_NAME};
pub use transitions::Action;
pub use types::*;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the tracker library with default configuration
pub fn init() {
    tracing::info!(version = VERSION, "AVWatch Core initialized");
}
