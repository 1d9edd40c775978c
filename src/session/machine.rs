//! Core session state machine
//!
//! Two states, Idle and Active. While Active a single background task
//! listens for a transcript, classifies it, executes the intent and
//! presents the result, strictly one request at a time.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::command::{classify, ActionExecutor, Period, SessionControl};
use crate::events::SessionEvent;
use crate::platform::{SpeechSynthesizer, Transcriber};

/// The two presentation states of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Greeting screen, not listening
    #[default]
    Idle,
    /// Listening screen, background task running
    Active,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::Idle => write!(f, "Idle"),
            SessionState::Active => write!(f, "Active"),
        }
    }
}

/// External capabilities the session drives
pub struct Collaborators {
    pub transcriber: Arc<dyn Transcriber>,
    pub voice: Arc<dyn SpeechSynthesizer>,
    pub executor: ActionExecutor,
}

/// Handle to the session. Cheap to clone; all clones share one session.
#[derive(Clone)]
pub struct SessionMachine {
    inner: Arc<Inner>,
}

struct Inner {
    control: Mutex<Control>,
    /// Handle of the most recent listening task. Also serializes `start`.
    worker: tokio::sync::Mutex<Option<JoinHandle<()>>>,
    collaborators: Collaborators,
    listen_timeout: Duration,
    event_tx: broadcast::Sender<SessionEvent>,
}

#[derive(Default)]
struct Control {
    state: SessionState,
    /// Cancels the current listening task
    cancel: Option<CancellationToken>,
    /// Bumped on every start so a stale task cannot stop a newer session
    generation: u64,
    /// Time the current Active state was entered
    entered_at: Option<Instant>,
}

impl SessionMachine {
    /// Create an idle session
    pub fn new(
        collaborators: Collaborators,
        listen_timeout: Duration,
        event_tx: broadcast::Sender<SessionEvent>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                control: Mutex::new(Control::default()),
                worker: tokio::sync::Mutex::new(None),
                collaborators,
                listen_timeout,
                event_tx,
            }),
        }
    }

    /// Get the current state
    pub fn state(&self) -> SessionState {
        self.control().state
    }

    /// Idle -> Active. Returns `false` without side effects if already
    /// Active.
    ///
    /// If a previously stopped task is still finishing its capture, this
    /// waits for it so that two listening tasks never coexist. Speech left
    /// over from the previous session is dropped before the new task runs.
    pub async fn start(&self) -> bool {
        let mut worker = self.inner.worker.lock().await;

        let (cancel, generation) = {
            let mut control = self.control();
            if control.state == SessionState::Active {
                debug!("start ignored, session already active");
                return false;
            }
            let cancel = CancellationToken::new();
            control.state = SessionState::Active;
            control.cancel = Some(cancel.clone());
            control.generation += 1;
            control.entered_at = Some(Instant::now());
            (cancel, control.generation)
        };

        info!(
            from = %SessionState::Idle,
            to = %SessionState::Active,
            generation,
            "state transition"
        );
        self.emit(SessionEvent::SessionStarted);

        if let Some(previous) = worker.take() {
            if !previous.is_finished() {
                debug!("waiting for previous listening task to drain");
            }
            if let Err(e) = previous.await {
                warn!(?e, "previous listening task failed");
            }
        }
        self.inner.collaborators.transcriber.discard_pending().await;

        let session = self.clone();
        *worker = Some(tokio::spawn(session.listen_loop(cancel, generation)));
        true
    }

    /// Active -> Idle. Returns `false` if already Idle.
    ///
    /// Never waits for the listening task; it notices the cancellation at
    /// its next checkpoint.
    pub fn stop(&self) -> bool {
        self.stop_generation(None)
    }

    fn stop_generation(&self, only: Option<u64>) -> bool {
        let (cancel, duration_ms) = {
            let mut control = self.control();
            if control.state == SessionState::Idle {
                debug!("stop ignored, session already idle");
                return false;
            }
            if only.is_some_and(|generation| generation != control.generation) {
                debug!(?only, current = control.generation, "stale stop request ignored");
                return false;
            }
            control.state = SessionState::Idle;
            let duration_ms = control
                .entered_at
                .take()
                .map(|t| t.elapsed().as_millis() as u64)
                .unwrap_or(0);
            (control.cancel.take(), duration_ms)
        };

        if let Some(cancel) = cancel {
            cancel.cancel();
        }

        info!(
            from = %SessionState::Active,
            to = %SessionState::Idle,
            duration_ms,
            "state transition"
        );
        self.emit(SessionEvent::SessionStopped { duration_ms });
        true
    }

    /// Body of the background listening task
    async fn listen_loop(self, cancel: CancellationToken, generation: u64) {
        info!(generation, "listening task started");

        if !cancel.is_cancelled() {
            self.present(Period::now().greeting()).await;
        }

        let collaborators = &self.inner.collaborators;
        while !cancel.is_cancelled() {
            let transcript = collaborators
                .transcriber
                .transcribe(self.inner.listen_timeout)
                .await;

            if cancel.is_cancelled() {
                debug!(?transcript, "session stopped during capture, discarding");
                break;
            }

            let intent = classify(&transcript);
            let exit = ExitRequest::default();
            let result = collaborators.executor.execute(intent, &exit).await;
            self.present(result.as_str()).await;

            if exit.requested.load(Ordering::SeqCst) {
                self.stop_generation(Some(generation));
            }
        }

        info!(generation, "listening task stopped");
    }

    /// Show then speak a response
    async fn present(&self, text: &str) {
        self.emit(SessionEvent::ResponsePresented {
            text: text.to_string(),
        });
        self.inner.collaborators.voice.speak(text).await;
    }

    fn emit(&self, event: SessionEvent) {
        debug!(%event, "emitting session event");
        let _ = self.inner.event_tx.send(event);
    }

    fn control(&self) -> MutexGuard<'_, Control> {
        self.inner
            .control
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Records an Exit intent so the session stops once the farewell has been
/// presented
#[derive(Default)]
struct ExitRequest {
    requested: AtomicBool,
}

impl SessionControl for ExitRequest {
    fn request_stop(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }
}
