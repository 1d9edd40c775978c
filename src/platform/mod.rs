//! OS-facing collaborators
//!
//! Traits the assistant core depends on, plus implementations backed by
//! host programs (process spawn/kill, an audio player, a TTS command).

mod media;
mod process;
mod speech;

pub use media::{MediaPlayer, SystemMedia};
pub use process::{ProcessControl, SystemProcesses};
pub use speech::{CommandVoice, SpeechSynthesizer, Transcriber};
