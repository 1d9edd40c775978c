//! Startup face scan
//!
//! Polls the camera until a face shows up, the time bound runs out, or the
//! user cancels. A capture or detection that stalls is abandoned at the
//! deadline.

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::vision::{FaceDetector, FrameSource};

/// Timing for the face scan
#[derive(Debug, Clone, Copy)]
pub struct GateSettings {
    /// Give up after this long
    pub max_duration: Duration,
    /// Pause between polls
    pub poll_interval: Duration,
}

/// Wait for a face. Returns `true` on the first detection, `false` on
/// timeout or cancellation.
///
/// A failed capture or detection counts as "no face" for that poll. Each
/// poll only gets the time left before the deadline.
pub async fn await_presence(
    settings: GateSettings,
    frames: &mut dyn FrameSource,
    detector: &dyn FaceDetector,
    cancel: &CancellationToken,
) -> bool {
    let started = Instant::now();
    let deadline = started + settings.max_duration;
    let mut polls = 0u64;

    info!(max_duration = ?settings.max_duration, "face scan started");

    loop {
        if cancel.is_cancelled() {
            info!(polls, "face scan cancelled");
            return false;
        }

        polls += 1;
        let poll = async {
            let frame = frames.capture_frame().await?;
            detector.detect_faces(&frame).await
        };

        let faces = tokio::select! {
            _ = cancel.cancelled() => {
                info!(polls, "face scan cancelled");
                return false;
            }
            faces = tokio::time::timeout_at(deadline, poll) => faces,
        };

        match faces {
            Ok(Ok(faces)) if !faces.is_empty() => {
                info!(
                    polls,
                    faces = faces.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "face detected"
                );
                return true;
            }
            Ok(Ok(_)) => debug!(polls, "no face in frame"),
            Ok(Err(e)) => warn!(?e, polls, "face scan poll failed"),
            Err(_) => {
                info!(polls, "face scan timed out during poll");
                return false;
            }
        }

        if Instant::now() >= deadline {
            info!(polls, "face scan timed out");
            return false;
        }

        tokio::select! {
            _ = cancel.cancelled() => {}
            _ = tokio::time::sleep(settings.poll_interval) => {}
        }
    }
}
