//! Events module for the presentation surface
//!
//! The session publishes these on a broadcast channel; the console front
//! end renders them. The session task is the only writer.

use serde::{Deserialize, Serialize};

/// Events emitted by the session state machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// Switched to the active (listening) view
    SessionStarted,

    /// A response became the most recent result on screen
    ResponsePresented {
        /// Text shown and spoken
        text: String,
    },

    /// Returned to the idle view
    SessionStopped {
        /// Duration in milliseconds that the session was active
        duration_ms: u64,
    },
}

impl std::fmt::Display for SessionEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionEvent::SessionStarted => write!(f, "SESSION_STARTED"),
            SessionEvent::ResponsePresented { text } => write!(f, "RESPONSE_PRESENTED ({})", text),
            SessionEvent::SessionStopped { duration_ms } => {
                write!(f, "SESSION_STOPPED ({}ms)", duration_ms)
            }
        }
    }
}
