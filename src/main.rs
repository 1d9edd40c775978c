//! desk-assistant: voice-command assistant for the desktop
//!
//! Startup runs a face scan; if nobody is in front of the camera the
//! process exits. Otherwise a console front end drives the session:
//! - Idle: waiting for `start`
//! - Active: listening, classifying and answering until `exit`/`stop` is
//!   spoken or `:stop` is typed
//!
//! Supported commands: time-of-day greetings, open/close the configured
//! application, play the first local music file, and echo anything else.

mod command;
mod config;
mod console;
mod events;
mod lifecycle;
mod platform;
mod presence;
mod session;

use std::sync::Arc;

use anyhow::Result;
use tokio::io::BufReader;
use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::command::ActionExecutor;
use crate::config::Config;
use crate::console::{ConsoleTranscriber, Renderer};
use crate::events::SessionEvent;
use crate::lifecycle::ShutdownSignal;
use crate::platform::{CommandVoice, SystemMedia, SystemProcesses};
use crate::presence::{await_presence, CommandCamera, CommandFaceDetector, GateSettings};
use crate::session::{Collaborators, SessionMachine};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging; stdout belongs to the console front end
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .with_writer(std::io::stderr)
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "desk-assistant starting"
    );

    // Load configuration
    let config = Config::load()?;
    info!(?config.music_dir, app = %config.app.program, "configuration loaded");

    if !scan_for_face(&config).await? {
        println!("Face not detected. Application closed.");
        std::process::exit(1);
    }

    // Console input -> transcriber
    let (speech_tx, speech_rx) = mpsc::channel(16);
    // Session -> renderer
    let (event_tx, event_rx) = broadcast::channel::<SessionEvent>(64);

    let executor = ActionExecutor::new(
        Arc::new(SystemProcesses::new()),
        Arc::new(SystemMedia::new(config.player_command.clone())),
        config.app.clone(),
        config.music_dir.clone(),
    );
    let session = SessionMachine::new(
        Collaborators {
            transcriber: Arc::new(ConsoleTranscriber::new(speech_rx)),
            voice: Arc::new(CommandVoice::new(config.tts_command.clone())),
            executor,
        },
        config.listen_timeout,
        event_tx,
    );

    let renderer = Renderer::new(config.json_output);
    if let Some(view) = renderer.initial_view() {
        println!("{view}");
    }

    let shutdown = ShutdownSignal::new();

    info!("assistant ready, entering main loop");

    tokio::select! {
        result = console::run_input(BufReader::new(tokio::io::stdin()), session.clone(), speech_tx) => {
            if let Err(e) = result {
                error!(?e, "console input error");
            }
        }

        _ = console::run_renderer(event_rx, renderer) => {
            info!("renderer exited");
        }

        _ = shutdown.wait() => {
            info!("shutdown signal received");
        }
    }

    // Cleanup
    info!("shutting down...");
    session.stop();
    info!("desk-assistant stopped");

    // The blocking stdin read cannot be cancelled, so don't wait for it
    std::process::exit(0);
}

/// Run the startup face scan. `Ok(true)` lets the assistant start.
///
/// Without a camera and detector presence cannot be verified, so the scan
/// fails.
async fn scan_for_face(config: &Config) -> Result<bool> {
    let camera = config.camera_command.clone().and_then(CommandCamera::new);
    let detector = config
        .face_detect_command
        .clone()
        .and_then(CommandFaceDetector::new);

    let (Some(mut camera), Some(detector)) = (camera, detector) else {
        error!("no camera or face detector configured, cannot verify presence");
        return Ok(false);
    };

    let settings = GateSettings {
        max_duration: config.presence_timeout,
        poll_interval: config.presence_poll_interval,
    };

    // Ctrl-C during the scan cancels it
    let cancel = CancellationToken::new();
    let watcher = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            ShutdownSignal::new().wait().await;
            cancel.cancel();
        })
    };

    let detected = await_presence(settings, &mut camera, &detector, &cancel).await;

    watcher.abort();
    Ok(detected)
}
