//! Camera and face detector collaborators

use std::process::Stdio;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Errors from frame capture or face detection
#[derive(Debug, thiserror::Error)]
pub enum VisionError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}")]
    Exited { program: String, status: String },

    #[error("camera returned an empty frame")]
    EmptyFrame,

    #[error("invalid detector output: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Raw encoded image bytes from the camera
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame(pub Vec<u8>);

/// Face location within a frame, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Produces camera frames
#[async_trait]
pub trait FrameSource: Send {
    async fn capture_frame(&mut self) -> Result<Frame, VisionError>;
}

/// Finds faces in a frame
#[async_trait]
pub trait FaceDetector: Send + Sync {
    async fn detect_faces(&self, frame: &Frame) -> Result<Vec<BoundingBox>, VisionError>;
}

/// [`FrameSource`] that runs a capture program and reads the frame from
/// its stdout
#[derive(Debug, Clone)]
pub struct CommandCamera {
    program: String,
    args: Vec<String>,
}

impl CommandCamera {
    /// `command` is the program followed by its arguments; `None` if empty
    pub fn new(command: Vec<String>) -> Option<Self> {
        let (program, args) = command.split_first()?;
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }
}

#[async_trait]
impl FrameSource for CommandCamera {
    async fn capture_frame(&mut self) -> Result<Frame, VisionError> {
        // Dropping the future mid-capture kills the program
        let output = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| VisionError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(VisionError::Exited {
                program: self.program.clone(),
                status: output.status.to_string(),
            });
        }
        if output.stdout.is_empty() {
            return Err(VisionError::EmptyFrame);
        }
        Ok(Frame(output.stdout))
    }
}

/// [`FaceDetector`] that pipes the frame into a detector program which
/// prints a JSON array of [`BoundingBox`]es
#[derive(Debug, Clone)]
pub struct CommandFaceDetector {
    program: String,
    args: Vec<String>,
}

impl CommandFaceDetector {
    pub fn new(command: Vec<String>) -> Option<Self> {
        let (program, args) = command.split_first()?;
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }
}

#[async_trait]
impl FaceDetector for CommandFaceDetector {
    async fn detect_faces(&self, frame: &Frame) -> Result<Vec<BoundingBox>, VisionError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| VisionError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        // Feed stdin while draining stdout so a large frame cannot fill
        // both pipes. Stdin is closed once written.
        let stdin = child.stdin.take();
        let feed = async move {
            if let Some(mut stdin) = stdin {
                match stdin.write_all(&frame.0).await {
                    Err(e) if e.kind() != std::io::ErrorKind::BrokenPipe => return Err(e),
                    _ => {}
                }
            }
            Ok(())
        };
        let (fed, output) = tokio::join!(feed, child.wait_with_output());
        fed?;
        let output = output?;

        if !output.status.success() {
            return Err(VisionError::Exited {
                program: self.program.clone(),
                status: output.status.to_string(),
            });
        }
        parse_boxes(&output.stdout)
    }
}

/// Parse detector output. Blank output means no faces.
pub fn parse_boxes(raw: &[u8]) -> Result<Vec<BoundingBox>, VisionError> {
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_slice(raw)?)
}
