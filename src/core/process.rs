//! Shell command execution with a deadline.
//!
//! Commands run through the platform shell with piped output. When the
//! deadline expires before the command exits and its output is drained, the
//! command is killed and a [`CommandError::Timeout`] is returned; nothing it
//! started outlives the call on unix.

use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tracing::{debug, warn};

/// Captured output of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Stdout when present, otherwise stderr.
    pub fn primary_text(&self) -> &str {
        if self.stdout.is_empty() {
            &self.stderr
        } else {
            &self.stdout
        }
    }
}

/// Errors produced while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Failed to start command: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("Failed while waiting for command: {0}")]
    Wait(#[source] std::io::Error),

    #[error("Command timed out after {} seconds", .0.as_secs_f64())]
    Timeout(Duration),

    #[error("Command failed ({status}): {stderr}")]
    Failed { status: ExitStatus, stderr: String },
}

/// Runs `command` through the shell, killing it if `timeout` elapses first.
///
/// The deadline covers both the exit of the shell and the draining of its
/// output pipes. On unix the shell leads its own process group, and the
/// whole group is killed on timeout so background children die with it.
pub async fn run_shell(command: &str, timeout: Duration) -> Result<CommandOutput, CommandError> {
    let mut cmd = shell(command);
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    #[cfg(unix)]
    {
        cmd.process_group(0);
    }

    let mut child = cmd.spawn().map_err(CommandError::Spawn)?;
    let pid = child.id();
    let stdout_pipe = child.stdout.take();
    let stderr_pipe = child.stderr.take();

    let completed = tokio::time::timeout(timeout, async {
        let (stdout, stderr, status) =
            tokio::join!(read_pipe(stdout_pipe), read_pipe(stderr_pipe), child.wait());
        status.map(|status| (status, CommandOutput { stdout, stderr }))
    })
    .await;

    let (status, output) = match completed {
        Ok(finished) => finished.map_err(CommandError::Wait)?,
        Err(_) => {
            terminate(&mut child, pid).await;
            return Err(CommandError::Timeout(timeout));
        }
    };
    debug!("Command exited with {}", status);

    if !status.success() {
        return Err(CommandError::Failed {
            status,
            stderr: output.stderr,
        });
    }

    Ok(output)
}

/// Kill a timed out command and everything it started.
async fn terminate(child: &mut Child, pid: Option<u32>) {
    #[cfg(unix)]
    {
        if let Some(pid) = pid.and_then(|pid| libc::pid_t::try_from(pid).ok()) {
            // a negative pid addresses the process group led by the shell
            let result = unsafe { libc::kill(-pid, libc::SIGKILL) };
            if result != 0 {
                debug!(
                    "Failed to kill process group {}: {}",
                    pid,
                    std::io::Error::last_os_error()
                );
            }
        }
    }
    #[cfg(not(unix))]
    let _ = pid;

    // the shell itself may already have been reaped
    if let Err(e) = child.kill().await {
        debug!("Failed to kill timed out command: {}", e);
    }
}

#[cfg(unix)]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    cmd
}

#[cfg(windows)]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(command);
    cmd
}

async fn read_pipe<R: AsyncRead + Unpin>(pipe: Option<R>) -> String {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        if let Err(e) = pipe.read_to_end(&mut buf).await {
            warn!("Failed to read command output: {}", e);
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}
