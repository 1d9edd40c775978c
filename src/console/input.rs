//! Console input routing
//!
//! While idle, lines are start/quit controls. While active, every line is
//! an utterance for the transcriber except the `:stop` and `:quit`
//! controls.

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::session::{SessionMachine, SessionState};

/// What a console line asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Start,
    Stop,
    Quit,
    /// Utterance for the active session
    Speech(String),
    /// Idle-mode line that is not a control
    Unknown(String),
    /// Blank idle-mode line
    Empty,
}

/// Interpret a line given the current session state
pub fn route(line: &str, state: SessionState) -> ConsoleCommand {
    let trimmed = line.trim();
    match state {
        SessionState::Idle => match trimmed.to_lowercase().as_str() {
            "" => ConsoleCommand::Empty,
            "start" => ConsoleCommand::Start,
            "quit" | "exit" => ConsoleCommand::Quit,
            _ => ConsoleCommand::Unknown(trimmed.to_string()),
        },
        SessionState::Active => match trimmed {
            ":stop" => ConsoleCommand::Stop,
            ":quit" => ConsoleCommand::Quit,
            _ => ConsoleCommand::Speech(line.to_string()),
        },
    }
}

/// Read lines until `quit` or end of input, driving the session
pub async fn run_input<R>(
    reader: R,
    session: SessionMachine,
    speech_tx: mpsc::Sender<String>,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        match route(&line, session.state()) {
            ConsoleCommand::Start => {
                session.start().await;
            }
            ConsoleCommand::Stop => {
                session.stop();
            }
            ConsoleCommand::Quit => {
                info!("quit requested");
                return Ok(());
            }
            ConsoleCommand::Speech(text) => {
                if speech_tx.send(text).await.is_err() {
                    warn!("transcriber is gone, dropping input");
                }
            }
            ConsoleCommand::Unknown(text) => {
                info!(input = %text, "not a command, type 'start' or 'quit'");
            }
            ConsoleCommand::Empty => {}
        }
    }

    info!("console input closed");
    Ok(())
}
