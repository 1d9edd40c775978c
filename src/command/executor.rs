//! Intent execution
//!
//! Every handler converts collaborator failures into a sentence that can
//! be spoken and displayed. Nothing raised by a collaborator leaves this
//! module.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::TargetApp;
use crate::platform::{MediaPlayer, ProcessControl};

use super::classifier::Intent;

/// Errors raised by OS-facing collaborators while carrying out an intent
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to stop {program}: {reason}")]
    Terminate { program: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("playback failed: {0}")]
    Playback(String),
}

/// Lets the executor end the session that invoked it
pub trait SessionControl: Sync {
    /// Request a transition back to idle. Idempotent.
    fn request_stop(&self);
}

/// User-presentable outcome of an intent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResult(String);

impl ActionResult {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ActionResult {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl From<&str> for ActionResult {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}

impl std::fmt::Display for ActionResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Performs the side effect for each intent
pub struct ActionExecutor {
    processes: Arc<dyn ProcessControl>,
    media: Arc<dyn MediaPlayer>,
    app: TargetApp,
    music_dir: PathBuf,
}

impl ActionExecutor {
    pub fn new(
        processes: Arc<dyn ProcessControl>,
        media: Arc<dyn MediaPlayer>,
        app: TargetApp,
        music_dir: PathBuf,
    ) -> Self {
        Self {
            processes,
            media,
            app,
            music_dir,
        }
    }

    /// Execute an intent and describe the outcome
    pub async fn execute(&self, intent: Intent, session: &dyn SessionControl) -> ActionResult {
        debug!(?intent, "executing intent");

        match intent {
            Intent::Greeting(period) => period.greeting().into(),
            Intent::OpenApp => self.open_app().await,
            Intent::CloseApp => self.close_app().await,
            Intent::PlayMusic => self.play_music().await,
            Intent::Exit => {
                session.request_stop();
                "Goodbye!".into()
            }
            Intent::Echo(text) => format!("You said: {text}").into(),
        }
    }

    async fn open_app(&self) -> ActionResult {
        match self.processes.launch(&self.app.program).await {
            Ok(()) => {
                info!(program = %self.app.program, "application launched");
                format!("{} opened successfully!", self.app.label).into()
            }
            Err(e) => {
                warn!(?e, program = %self.app.program, "launch failed");
                format!("Could not open {}. Error: {e}", self.app.label).into()
            }
        }
    }

    async fn close_app(&self) -> ActionResult {
        match self.processes.terminate(&self.app.program).await {
            Ok(()) => {
                info!(program = %self.app.program, "application terminated");
                format!("{} closed successfully!", self.app.label).into()
            }
            Err(e) => {
                warn!(?e, program = %self.app.program, "terminate failed");
                format!("Could not close {}. Error: {e}", self.app.label).into()
            }
        }
    }

    async fn play_music(&self) -> ActionResult {
        match self.try_play_music().await {
            Ok(Some(file)) => format!("Playing {file}").into(),
            Ok(None) => "No music files found.".into(),
            Err(e) => {
                warn!(?e, dir = ?self.music_dir, "music playback failed");
                format!("Error playing music: {e}").into()
            }
        }
    }

    /// Play the first audio file in listing order, if any
    async fn try_play_music(&self) -> Result<Option<String>, ActionError> {
        let files = self.media.list_audio_files(&self.music_dir).await?;
        let Some(first) = files.into_iter().next() else {
            return Ok(None);
        };

        self.media.play(&self.music_dir.join(&first)).await?;
        info!(file = %first, "playing music");
        Ok(Some(first))
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::command::greeting::Period;

    #[derive(Default)]
    struct FakeProcesses {
        fail: bool,
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ProcessControl for FakeProcesses {
        async fn launch(&self, program: &str) -> Result<(), ActionError> {
            self.calls.lock().unwrap().push(format!("launch {program}"));
            if self.fail {
                return Err(ActionError::Spawn {
                    program: program.to_string(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
                });
            }
            Ok(())
        }

        async fn terminate(&self, program: &str) -> Result<(), ActionError> {
            self.calls.lock().unwrap().push(format!("terminate {program}"));
            if self.fail {
                return Err(ActionError::Terminate {
                    program: program.to_string(),
                    reason: "no such process".to_string(),
                });
            }
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeMedia {
        files: Vec<String>,
        missing_dir: bool,
        played: Mutex<Vec<PathBuf>>,
    }

    #[async_trait]
    impl MediaPlayer for FakeMedia {
        async fn list_audio_files(&self, _dir: &Path) -> Result<Vec<String>, ActionError> {
            if self.missing_dir {
                return Err(std::io::Error::new(std::io::ErrorKind::NotFound, "missing").into());
            }
            Ok(self.files.clone())
        }

        async fn play(&self, path: &Path) -> Result<(), ActionError> {
            self.played.lock().unwrap().push(path.to_path_buf());
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeSession {
        stops: AtomicUsize,
    }

    impl SessionControl for FakeSession {
        fn request_stop(&self) {
            self.stops.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn app() -> TargetApp {
        TargetApp {
            program: "notepad.exe".to_string(),
            label: "Notepad".to_string(),
        }
    }

    fn executor(processes: Arc<FakeProcesses>, media: Arc<FakeMedia>) -> ActionExecutor {
        ActionExecutor::new(processes, media, app(), PathBuf::from("/music"))
    }

    #[tokio::test]
    async fn test_greeting_reuses_period_label() {
        let exec = executor(Arc::default(), Arc::default());
        let session = FakeSession::default();
        let result = exec.execute(Intent::Greeting(Period::Evening), &session).await;
        assert_eq!(result.as_str(), "Good Evening");
    }

    #[tokio::test]
    async fn test_open_app_success() {
        let processes = Arc::new(FakeProcesses::default());
        let exec = executor(processes.clone(), Arc::default());
        let result = exec.execute(Intent::OpenApp, &FakeSession::default()).await;
        assert_eq!(result.as_str(), "Notepad opened successfully!");
        assert_eq!(*processes.calls.lock().unwrap(), vec!["launch notepad.exe"]);
    }

    #[tokio::test]
    async fn test_open_app_failure_is_described() {
        let processes = Arc::new(FakeProcesses {
            fail: true,
            ..Default::default()
        });
        let exec = executor(processes, Arc::default());
        let result = exec.execute(Intent::OpenApp, &FakeSession::default()).await;
        assert!(result.as_str().starts_with("Could not open Notepad."));
        assert!(result.as_str().contains("Error"));
    }

    #[tokio::test]
    async fn test_close_app() {
        let exec = executor(Arc::default(), Arc::default());
        let result = exec.execute(Intent::CloseApp, &FakeSession::default()).await;
        assert_eq!(result.as_str(), "Notepad closed successfully!");

        let failing = executor(
            Arc::new(FakeProcesses {
                fail: true,
                ..Default::default()
            }),
            Arc::default(),
        );
        let result = failing.execute(Intent::CloseApp, &FakeSession::default()).await;
        assert!(result.as_str().contains("Error"));
    }

    #[tokio::test]
    async fn test_play_music_empty_dir() {
        let media = Arc::new(FakeMedia::default());
        let exec = executor(Arc::default(), media.clone());
        let result = exec.execute(Intent::PlayMusic, &FakeSession::default()).await;
        assert_eq!(result.as_str(), "No music files found.");
        assert!(media.played.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_play_music_picks_first_file() {
        let media = Arc::new(FakeMedia {
            files: vec!["b.mp3".to_string(), "a.wav".to_string()],
            ..Default::default()
        });
        let exec = executor(Arc::default(), media.clone());
        let result = exec.execute(Intent::PlayMusic, &FakeSession::default()).await;
        assert_eq!(result.as_str(), "Playing b.mp3");
        assert_eq!(*media.played.lock().unwrap(), vec![PathBuf::from("/music/b.mp3")]);
    }

    #[tokio::test]
    async fn test_play_music_listing_error() {
        let media = Arc::new(FakeMedia {
            missing_dir: true,
            ..Default::default()
        });
        let exec = executor(Arc::default(), media);
        let result = exec.execute(Intent::PlayMusic, &FakeSession::default()).await;
        assert!(result.as_str().starts_with("Error playing music:"));
    }

    #[tokio::test]
    async fn test_exit_requests_stop() {
        let exec = executor(Arc::default(), Arc::default());
        let session = FakeSession::default();
        let result = exec.execute(Intent::Exit, &session).await;
        assert_eq!(result.as_str(), "Goodbye!");
        assert_eq!(session.stops.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_echo() {
        let exec = executor(Arc::default(), Arc::default());
        let result = exec
            .execute(
                Intent::Echo("what time is it".to_string()),
                &FakeSession::default(),
            )
            .await;
        assert_eq!(result.as_str(), "You said: what time is it");
    }
}
