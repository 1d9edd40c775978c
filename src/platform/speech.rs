//! Speech capture and synthesis seams

use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::command::Transcript;

/// Captures one utterance and converts it to text
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Wait at most `timeout` for speech. Expiry yields [`Transcript::Timeout`].
    async fn transcribe(&self, timeout: Duration) -> Transcript;

    /// Drop any speech buffered before a new session starts listening
    async fn discard_pending(&self) {}
}

/// Speaks text aloud
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Speak `text`, returning once playback has finished
    async fn speak(&self, text: &str);
}

/// [`SpeechSynthesizer`] that runs an external TTS program with the text as
/// its last argument. Without a program it only logs.
#[derive(Debug, Clone, Default)]
pub struct CommandVoice {
    command: Option<Vec<String>>,
}

impl CommandVoice {
    pub fn new(command: Option<Vec<String>>) -> Self {
        Self {
            command: command.filter(|c| !c.is_empty()),
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for CommandVoice {
    async fn speak(&self, text: &str) {
        let Some((program, args)) = self.command.as_ref().and_then(|c| c.split_first()) else {
            info!(text, "speak");
            return;
        };

        debug!(program = %program, "running tts command");
        match Command::new(program).args(args).arg(text).status().await {
            Ok(status) if status.success() => {}
            Ok(status) => warn!(%status, program = %program, "tts command failed"),
            Err(e) => warn!(?e, program = %program, "failed to run tts command"),
        }
    }
}
