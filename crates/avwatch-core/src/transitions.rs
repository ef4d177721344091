//! State-transition mapping
//!
//! The pure half of the state-reconciliation engine: given the previous and
//! current sampled states, produce the ordered list of analytics actions the
//! transition implies. The monitor performs the sampling and de-duplication;
//! this module only encodes the precedence rules.

use crate::collector::VideoCollector;
use crate::types::PlaybackState;
use serde::{Deserialize, Serialize};

/// One analytics action the mapper can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Request,
    Start,
    Pause,
    Resume,
    BufferStart,
    BufferEnd,
    End,
}

impl Action {
    /// Dispatch this action to the collector.
    pub fn apply(&self, collector: &dyn VideoCollector) {
        match self {
            Action::Request => collector.send_request(),
            Action::Start => collector.send_start(),
            Action::Pause => collector.send_pause(),
            Action::Resume => collector.send_resume(),
            Action::BufferStart => collector.send_buffer_start(),
            Action::BufferEnd => collector.send_buffer_end(),
            Action::End => collector.send_end(),
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Request => write!(f, "send_request"),
            Action::Start => write!(f, "send_start"),
            Action::Pause => write!(f, "send_pause"),
            Action::Resume => write!(f, "send_resume"),
            Action::BufferStart => write!(f, "send_buffer_start"),
            Action::BufferEnd => write!(f, "send_buffer_end"),
            Action::End => write!(f, "send_end"),
        }
    }
}

/// Map a state transition to its ordered analytics actions.
///
/// Total over the full product of `(previous, current)`: combinations with
/// no defined meaning return an empty list, never an error. Buffer-boundary
/// actions always precede playback-boundary actions because downstream
/// consumers treat buffering as strictly nested inside a play session.
///
/// `End` is emitted at most once per transition.
pub fn map(previous: Option<PlaybackState>, current: PlaybackState) -> Vec<Action> {
    use crate::types::PlaybackState as S;

    if previous == Some(current) {
        return Vec::new();
    }

    match current {
        // Idle from a fresh session is the content request; idle after any
        // active state closes the session.
        S::Idle => match previous {
            None => vec![Action::Request],
            Some(S::Idle | S::None) => Vec::new(),
            Some(_) => vec![Action::End],
        },

        S::Playing => match previous {
            Some(S::Paused) => vec![Action::BufferEnd, Action::Resume],
            Some(S::Buffering) => vec![Action::BufferEnd, Action::Start],
            None | Some(S::Ready | S::Idle | S::None) => vec![Action::Start],
            Some(S::Playing) => Vec::new(),
        },

        S::Paused => match previous {
            Some(S::Playing) => vec![Action::Pause],
            _ => Vec::new(),
        },

        S::Buffering => match previous {
            Some(S::Playing) => vec![Action::BufferStart],
            _ => Vec::new(),
        },

        // Stopped/reset after any active state closes the session.
        S::None => match previous {
            None | Some(S::None | S::Idle) => Vec::new(),
            Some(_) => vec![Action::End],
        },

        S::Ready => Vec::new(),
    }
}
