//! Playback state monitor
//!
//! AVPlay-style players do not deliver reliable lifecycle callbacks, so the
//! tracker derives them itself: sample the player's reported state on a
//! fixed interval, diff against the last observed state, and dispatch the
//! mapped analytics actions on change. Sampling converts a level-triggered
//! signal into edge-triggered events; the de-duplication in the sample pass
//! is what makes that conversion correct.

use crate::collector::VideoCollector;
use crate::error::Error;
use crate::player::AvPlayer;
use crate::transitions;
use crate::types::PlaybackState;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Mutable monitoring state shared between the tracker and the polling task.
#[derive(Debug, Default)]
struct MonitorSession {
    previous: Option<PlaybackState>,
    active: bool,
}

/// Cancellable periodic sampler of the player's reported state.
///
/// Exactly one session exists per tracker instance; `start`/`stop` are
/// idempotent and safe to call at any time.
pub struct StateMonitor {
    player: Arc<dyn AvPlayer>,
    collector: Arc<dyn VideoCollector>,
    poll_interval: Duration,
    session: Arc<Mutex<MonitorSession>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl StateMonitor {
    pub fn new(
        player: Arc<dyn AvPlayer>,
        collector: Arc<dyn VideoCollector>,
        poll_interval: Duration,
    ) -> Self {
        let poll_interval = if poll_interval.is_zero() {
            warn!("zero poll interval requested, falling back to 500ms");
            Duration::from_millis(500)
        } else {
            poll_interval
        };

        Self {
            player,
            collector,
            poll_interval,
            session: Arc::new(Mutex::new(MonitorSession::default())),
            task: Mutex::new(None),
        }
    }

    /// Start periodic sampling.
    ///
    /// No-ops when a session is already active, and when the player reports
    /// its state accessor as unsupported; in that case monitoring never
    /// starts but every other tracker function keeps working. The first
    /// sample fires immediately, so a state already present at start time is
    /// reported against the unset previous state rather than waiting a full
    /// interval.
    pub fn start(&self) {
        {
            let session = self.session.lock().unwrap();
            if session.active {
                debug!("state monitor already active, ignoring start");
                return;
            }
        }

        match self.player.state() {
            Err(Error::Unsupported { method }) => {
                warn!(method, "player does not expose a state accessor, monitoring disabled");
                return;
            }
            Err(err) if !err.is_transient() => {
                warn!(error = %err, "state accessor unusable, monitoring disabled");
                return;
            }
            Err(err) => {
                warn!(error = %err, "initial state read failed, starting monitor anyway");
            }
            Ok(state) => debug!(state = %state, "initial player state"),
        }

        {
            let mut session = self.session.lock().unwrap();
            session.active = true;
            session.previous = None;
        }

        let player = Arc::clone(&self.player);
        let collector = Arc::clone(&self.collector);
        let session = Arc::clone(&self.session);
        let poll_interval = self.poll_interval;

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if !session.lock().unwrap().active {
                    break;
                }
                sample_once(player.as_ref(), collector.as_ref(), &session);
            }
        });

        *self.task.lock().unwrap() = Some(task);
        info!(
            interval_ms = self.poll_interval.as_millis() as u64,
            "state monitor started"
        );
    }

    /// Cancel sampling and clear the observed state.
    ///
    /// Aborting the task guarantees no further scheduled fire does work; the
    /// active flag additionally guards redundant `start`/`stop` calls.
    pub fn stop(&self) {
        let was_active = {
            let mut session = self.session.lock().unwrap();
            let was_active = session.active;
            session.active = false;
            session.previous = None;
            was_active
        };

        if let Some(task) = self.task.lock().unwrap().take() {
            task.abort();
        }

        if was_active {
            info!("state monitor stopped");
        }
    }

    pub fn is_active(&self) -> bool {
        self.session.lock().unwrap().active
    }

    /// Perform one sample-and-diff pass.
    ///
    /// Normally driven by the periodic task; exposed so hosts that schedule
    /// their own ticks can reuse the reconciliation logic directly.
    pub fn sample(&self) {
        sample_once(self.player.as_ref(), self.collector.as_ref(), &self.session);
    }
}

impl Drop for StateMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}

fn sample_once(
    player: &dyn AvPlayer,
    collector: &dyn VideoCollector,
    session: &Mutex<MonitorSession>,
) {
    let current = match player.state() {
        Ok(state) => state,
        Err(err) => {
            // A torn-down player mid-playback must not kill the schedule;
            // the next tick retries.
            warn!(code = err.error_code(), error = %err, "state read failed, retrying on next tick");
            return;
        }
    };

    let previous = session.lock().unwrap().previous;
    if previous == Some(current) {
        return;
    }

    let actions = transitions::map(previous, current);
    debug!(?previous, current = %current, count = actions.len(), "state transition");

    for action in &actions {
        action.apply(collector);
    }

    session.lock().unwrap().previous = Some(current);
}
