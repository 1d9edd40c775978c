//! Presentation surface: renders session events to stdout

use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::events::SessionEvent;

const ACTIVE_VIEW: &str = "=== listening (type ':stop' to stop) ===";
const IDLE_VIEW: &str = "=== idle (type 'start' to begin, 'quit' to leave) ===";

/// Turns session events into console lines
#[derive(Debug, Clone, Copy, Default)]
pub struct Renderer {
    /// Emit one JSON object per event instead of human text
    json: bool,
}

impl Renderer {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    /// Line shown before any session has started
    pub fn initial_view(&self) -> Option<&'static str> {
        (!self.json).then_some(IDLE_VIEW)
    }

    pub fn render(&self, event: &SessionEvent) -> String {
        if self.json {
            return serde_json::to_string(event).unwrap_or_else(|_| event.to_string());
        }

        match event {
            SessionEvent::SessionStarted => ACTIVE_VIEW.to_string(),
            SessionEvent::ResponsePresented { text } => format!("[assistant] {text}"),
            SessionEvent::SessionStopped { .. } => IDLE_VIEW.to_string(),
        }
    }
}

/// Print events until the channel closes
pub async fn run_renderer(mut event_rx: broadcast::Receiver<SessionEvent>, renderer: Renderer) {
    loop {
        match event_rx.recv().await {
            Ok(event) => println!("{}", renderer.render(&event)),
            Err(broadcast::error::RecvError::Lagged(n)) => {
                warn!(skipped = n, "renderer lagged behind session events");
            }
            Err(broadcast::error::RecvError::Closed) => {
                debug!("session event channel closed");
                break;
            }
        }
    }
}
