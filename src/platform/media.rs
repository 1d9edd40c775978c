//! Local audio file discovery and playback

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use super::process::reap;
use crate::command::ActionError;

/// File extensions treated as playable audio
const AUDIO_EXTENSIONS: &[&str] = &[".mp3", ".wav"];

/// Lists and plays audio files
#[async_trait]
pub trait MediaPlayer: Send + Sync {
    /// Audio file names in `dir`, in directory listing order
    async fn list_audio_files(&self, dir: &Path) -> Result<Vec<String>, ActionError>;

    /// Start playing `path` in the background
    async fn play(&self, path: &Path) -> Result<(), ActionError>;
}

/// Whether a file name carries a playable extension (case-sensitive)
pub fn is_audio_file(name: &str) -> bool {
    AUDIO_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}

/// [`MediaPlayer`] that reads the filesystem and hands files to an
/// external player program
#[derive(Debug, Clone)]
pub struct SystemMedia {
    /// Player program followed by its leading arguments
    player: Vec<String>,
}

impl SystemMedia {
    pub fn new(player: Vec<String>) -> Self {
        Self { player }
    }
}

#[async_trait]
impl MediaPlayer for SystemMedia {
    async fn list_audio_files(&self, dir: &Path) -> Result<Vec<String>, ActionError> {
        let mut entries = tokio::fs::read_dir(dir).await?;
        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if is_audio_file(&name) {
                files.push(name);
            }
        }
        debug!(?dir, count = files.len(), "listed audio files");
        Ok(files)
    }

    async fn play(&self, path: &Path) -> Result<(), ActionError> {
        let (program, args) = self
            .player
            .split_first()
            .ok_or_else(|| ActionError::Playback("no player command configured".to_string()))?;

        let child = Command::new(program)
            .args(args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| ActionError::Playback(format!("{program}: {e}")))?;

        reap(child, program.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_audio_file() {
        assert!(is_audio_file("song.mp3"));
        assert!(is_audio_file("clip.wav"));
        assert!(!is_audio_file("notes.txt"));
        assert!(!is_audio_file("SONG.MP3"));
        assert!(!is_audio_file("mp3"));
    }

    #[tokio::test]
    async fn test_list_filters_non_audio() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("track.mp3"), b"").unwrap();
        std::fs::write(dir.path().join("cover.jpg"), b"").unwrap();
        std::fs::write(dir.path().join("memo.wav"), b"").unwrap();

        let media = SystemMedia::new(vec!["true".to_string()]);
        let mut files = media.list_audio_files(dir.path()).await.unwrap();
        files.sort();
        assert_eq!(files, vec!["memo.wav", "track.mp3"]);
    }

    #[tokio::test]
    async fn test_list_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        let media = SystemMedia::new(vec!["true".to_string()]);
        assert!(media.list_audio_files(dir.path()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_missing_dir_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let media = SystemMedia::new(vec!["true".to_string()]);
        let err = media
            .list_audio_files(&dir.path().join("missing"))
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::Io(_)));
    }

    #[tokio::test]
    async fn test_play_without_player_fails() {
        let media = SystemMedia::new(Vec::new());
        let err = media.play(Path::new("track.mp3")).await.unwrap_err();
        assert!(matches!(err, ActionError::Playback(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_play_spawns_player_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let track = dir.path().join("track.mp3");
        std::fs::write(&track, b"").unwrap();

        // `test -f <path>` succeeds only if the path argument was passed
        let media = SystemMedia::new(vec!["test".to_string(), "-f".to_string()]);
        media.play(&track).await.unwrap();
    }

    #[tokio::test]
    async fn test_play_missing_player_fails() {
        let media = SystemMedia::new(vec!["desk-assistant-no-such-player".to_string()]);
        let err = media.play(Path::new("track.mp3")).await.unwrap_err();
        assert!(err.to_string().contains("desk-assistant-no-such-player"));
    }
}
