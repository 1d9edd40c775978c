//! Typed lines as speech

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, Mutex};
use tracing::debug;

use crate::command::Transcript;
use crate::platform::Transcriber;

/// [`Transcriber`] fed by the console input router. Each line typed while
/// the session is active counts as one utterance.
pub struct ConsoleTranscriber {
    lines: Mutex<mpsc::Receiver<String>>,
}

impl ConsoleTranscriber {
    pub fn new(lines: mpsc::Receiver<String>) -> Self {
        Self {
            lines: Mutex::new(lines),
        }
    }
}

#[async_trait]
impl Transcriber for ConsoleTranscriber {
    async fn transcribe(&self, timeout: Duration) -> Transcript {
        let mut lines = self.lines.lock().await;
        let transcript = match tokio::time::timeout(timeout, lines.recv()).await {
            Err(_) => Transcript::Timeout,
            Ok(None) => Transcript::ServiceUnavailable,
            Ok(Some(line)) if line.trim().is_empty() => Transcript::Unintelligible,
            Ok(Some(line)) => Transcript::heard(line.trim()),
        };
        debug!(?transcript, "console transcript");
        transcript
    }

    async fn discard_pending(&self) {
        let mut lines = self.lines.lock().await;
        let mut dropped = 0usize;
        while lines.try_recv().is_ok() {
            dropped += 1;
        }
        if dropped > 0 {
            debug!(dropped, "discarded stale console lines");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_millis(20);

    #[tokio::test]
    async fn test_line_is_lowercased() {
        let (tx, rx) = mpsc::channel(4);
        let transcriber = ConsoleTranscriber::new(rx);
        tx.send("  Open Notepad ".to_string()).await.unwrap();
        assert_eq!(
            transcriber.transcribe(TIMEOUT).await,
            Transcript::Heard("open notepad".to_string())
        );
    }

    #[tokio::test]
    async fn test_blank_line_is_unintelligible() {
        let (tx, rx) = mpsc::channel(4);
        let transcriber = ConsoleTranscriber::new(rx);
        tx.send("   ".to_string()).await.unwrap();
        assert_eq!(transcriber.transcribe(TIMEOUT).await, Transcript::Unintelligible);
    }

    #[tokio::test]
    async fn test_silence_times_out() {
        let (_tx, rx) = mpsc::channel(4);
        let transcriber = ConsoleTranscriber::new(rx);
        assert_eq!(transcriber.transcribe(TIMEOUT).await, Transcript::Timeout);
    }

    #[tokio::test]
    async fn test_closed_input_is_service_unavailable() {
        let (tx, rx) = mpsc::channel::<String>(4);
        drop(tx);
        let transcriber = ConsoleTranscriber::new(rx);
        assert_eq!(
            transcriber.transcribe(TIMEOUT).await,
            Transcript::ServiceUnavailable
        );
    }

    #[tokio::test]
    async fn test_discard_pending_drops_queued_lines() {
        let (tx, rx) = mpsc::channel(4);
        let transcriber = ConsoleTranscriber::new(rx);
        tx.send("exit".to_string()).await.unwrap();
        tx.send("hello from session one".to_string()).await.unwrap();

        transcriber.discard_pending().await;
        assert_eq!(transcriber.transcribe(TIMEOUT).await, Transcript::Timeout);

        tx.send("hello again".to_string()).await.unwrap();
        assert_eq!(
            transcriber.transcribe(TIMEOUT).await,
            Transcript::Heard("hello again".to_string())
        );
    }
}
