//! Launching and terminating desktop applications

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::{Child, Command};
use tracing::{debug, warn};

use crate::command::ActionError;

/// Starts and stops applications by program name
#[async_trait]
pub trait ProcessControl: Send + Sync {
    /// Spawn the program without waiting for it
    async fn launch(&self, program: &str) -> Result<(), ActionError>;

    /// Kill every running instance of the program
    async fn terminate(&self, program: &str) -> Result<(), ActionError>;
}

/// [`ProcessControl`] backed by the host OS
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemProcesses;

impl SystemProcesses {
    pub fn new() -> Self {
        Self
    }

    /// Command that force-kills a program by image name
    fn kill_command(program: &str) -> Command {
        if cfg!(windows) {
            let mut cmd = Command::new("taskkill");
            cmd.args(["/f", "/im", program]);
            cmd
        } else {
            let mut cmd = Command::new("pkill");
            cmd.args(["-x", program]);
            cmd
        }
    }
}

/// Wait for a detached child in the background so it is reaped on exit
pub(crate) fn reap(mut child: Child, program: String) {
    tokio::spawn(async move {
        match child.wait().await {
            Ok(status) => debug!(program = %program, %status, "child exited"),
            Err(e) => warn!(?e, program = %program, "failed to wait on child"),
        }
    });
}

#[async_trait]
impl ProcessControl for SystemProcesses {
    async fn launch(&self, program: &str) -> Result<(), ActionError> {
        let child = Command::new(program)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| ActionError::Spawn {
                program: program.to_string(),
                source,
            })?;

        debug!(program, pid = ?child.id(), "spawned application");
        reap(child, program.to_string());
        Ok(())
    }

    async fn terminate(&self, program: &str) -> Result<(), ActionError> {
        let output = Self::kill_command(program)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| ActionError::Terminate {
                program: program.to_string(),
                reason: e.to_string(),
            })?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = match stderr.trim() {
                "" => format!("kill command exited with {}", output.status),
                msg => msg.to_string(),
            };
            Err(ActionError::Terminate {
                program: program.to_string(),
                reason,
            })
        }
    }
}
