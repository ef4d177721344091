//! Native event listener bridge
//!
//! Forwards the buffering/error/completion callbacks the player does expose
//! straight to the collector, independently of the polling path. The two
//! paths may race for the same logical event (buffering-start from a
//! callback and `BUFFERING` from a poll); the duplication is accepted rather
//! than attempting cross-source reconciliation.

use crate::collector::{ErrorPayload, VideoCollector};
use crate::error::Result;
use crate::player::{AvPlayer, PlayerListeners};
use serde_json::json;
use std::sync::Arc;
use tracing::trace;

pub struct EventListenerBridge {
    collector: Arc<dyn VideoCollector>,
}

impl EventListenerBridge {
    pub fn new(collector: Arc<dyn VideoCollector>) -> Self {
        Self { collector }
    }

    /// Build the handler map forwarding native callbacks to the collector.
    pub fn listeners(&self) -> PlayerListeners {
        PlayerListeners {
            on_buffering_start: Some(Box::new({
                let collector = Arc::clone(&self.collector);
                move || collector.send_buffer_start()
            })),
            on_buffering_progress: Some(Box::new({
                let collector = Arc::clone(&self.collector);
                move |percent| {
                    collector.send_download(Some(json!({
                        "state": "buffering",
                        "percent": percent,
                    })));
                }
            })),
            on_buffering_complete: Some(Box::new({
                let collector = Arc::clone(&self.collector);
                move || {
                    collector.send_download(Some(json!({ "state": "buffering complete" })));
                    collector.send_request();
                }
            })),
            on_current_playtime: Some(Box::new(|seconds| {
                trace!(seconds, "current playtime callback");
            })),
            on_stream_completed: Some(Box::new({
                let collector = Arc::clone(&self.collector);
                move || collector.send_end()
            })),
            on_error: Some(Box::new({
                let collector = Arc::clone(&self.collector);
                move |code| collector.send_error(ErrorPayload::new(code))
            })),
            on_error_msg: Some(Box::new({
                let collector = Arc::clone(&self.collector);
                move |code, message| {
                    collector.send_error(ErrorPayload::with_message(code, message))
                }
            })),
        }
    }

    /// Install the handler map on the given player.
    pub fn install(&self, player: &dyn AvPlayer) -> Result<()> {
        player.set_listener(self.listeners())
    }
}
