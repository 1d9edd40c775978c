//! Configuration loading and management

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};

/// Application opened and closed by voice command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetApp {
    /// Program name used to spawn and kill it
    pub program: String,
    /// Name used in spoken responses
    pub label: String,
}

/// Assistant configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory searched for music files
    pub music_dir: PathBuf,

    /// Application controlled by "open/close notepad"
    pub app: TargetApp,

    /// Bounded wait for a single utterance
    pub listen_timeout: Duration,

    /// How long the startup face scan may run
    pub presence_timeout: Duration,

    /// Delay between face scan polls
    pub presence_poll_interval: Duration,

    /// TTS program and leading arguments
    pub tts_command: Option<Vec<String>>,

    /// Audio player program and leading arguments
    pub player_command: Vec<String>,

    /// Program printing one camera frame to stdout
    pub camera_command: Option<Vec<String>>,

    /// Program reading a frame on stdin and printing face boxes as JSON
    pub face_detect_command: Option<Vec<String>>,

    /// Print session events as JSON lines instead of text
    pub json_output: bool,
}

impl Config {
    /// Load configuration from environment and defaults
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let music_dir = match lookup("ASSISTANT_MUSIC_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => {
                let home = lookup("HOME")
                    .or_else(|| lookup("USERPROFILE"))
                    .context("HOME is not set and ASSISTANT_MUSIC_DIR was not given")?;
                PathBuf::from(home).join("Music")
            }
        };

        let default_program = if cfg!(windows) { "notepad.exe" } else { "gedit" };
        let app = TargetApp {
            program: lookup("ASSISTANT_APP").unwrap_or_else(|| default_program.to_string()),
            label: lookup("ASSISTANT_APP_LABEL").unwrap_or_else(|| "Notepad".to_string()),
        };

        let listen_timeout =
            Duration::from_secs(parse_number(&lookup, "ASSISTANT_LISTEN_TIMEOUT_SECS", 5)?);
        let presence_timeout =
            Duration::from_secs(parse_number(&lookup, "ASSISTANT_PRESENCE_TIMEOUT_SECS", 5)?);
        let presence_poll_interval =
            Duration::from_millis(parse_number(&lookup, "ASSISTANT_PRESENCE_POLL_MS", 50)?);

        let player_command = lookup("ASSISTANT_PLAYER_CMD")
            .map(|cmd| split_command(&cmd))
            .unwrap_or_else(|| split_command("ffplay -nodisp -autoexit -loglevel quiet"));

        let json_output = match lookup("ASSISTANT_OUTPUT").as_deref().map(str::trim) {
            None | Some("") | Some("text") => false,
            Some("json") => true,
            Some(other) => bail!("ASSISTANT_OUTPUT must be 'text' or 'json', got {other:?}"),
        };

        Ok(Self {
            music_dir,
            app,
            listen_timeout,
            presence_timeout,
            presence_poll_interval,
            tts_command: command_var(&lookup, "ASSISTANT_TTS_CMD"),
            player_command,
            camera_command: command_var(&lookup, "ASSISTANT_CAMERA_CMD"),
            face_detect_command: command_var(&lookup, "ASSISTANT_FACE_DETECT_CMD"),
            json_output,
        })
    }
}

fn parse_number(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: u64) -> Result<u64> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .with_context(|| format!("{key} must be a whole number, got {raw:?}")),
        None => Ok(default),
    }
}

fn command_var(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<Vec<String>> {
    lookup(key)
        .map(|cmd| split_command(&cmd))
        .filter(|parts| !parts.is_empty())
}

/// Split a command line on whitespace
fn split_command(cmd: &str) -> Vec<String> {
    cmd.split_whitespace().map(str::to_string).collect()
}
