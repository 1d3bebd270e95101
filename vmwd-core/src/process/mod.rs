//! External command execution.
//!
//! Every call to a VMware binary goes through [`run`]: output is captured,
//! a non-zero exit is an error, and the child is killed if it outlives the
//! timeout.

use crate::error::{Result, VmwdError};
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, instrument, warn};

/// Captured output of a finished command.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Stdout followed by stderr, for tools that print banners to either.
    pub fn combined(&self) -> String {
        let mut out = String::with_capacity(self.stdout.len() + self.stderr.len());
        out.push_str(&self.stdout);
        out.push_str(&self.stderr);
        out
    }
}

/// Run `program` with `args` and wait for it, up to `timeout`.
#[instrument(skip(args), fields(program = %program.display()))]
pub async fn run(program: &Path, args: &[&str], timeout: Duration) -> Result<CommandOutput> {
    let command_line = render(program, args);
    debug!(command = %command_line, "Running external command");

    let child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| VmwdError::ExternalTool {
            command: command_line.clone(),
            reason: format!("failed to spawn: {}", e),
        })?;

    let output = tokio::time::timeout(timeout, child.wait_with_output())
        .await
        .map_err(|_| {
            warn!(command = %command_line, ?timeout, "Command timed out");
            VmwdError::ExternalTool {
                command: command_line.clone(),
                reason: format!("timed out after {:?}", timeout),
            }
        })?
        .map_err(|e| VmwdError::ExternalTool {
            command: command_line.clone(),
            reason: format!("failed to wait: {}", e),
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if !output.status.success() {
        return Err(VmwdError::ExternalTool {
            command: command_line,
            reason: format!("{}: {}", output.status, stderr.trim()),
        });
    }

    Ok(CommandOutput { stdout, stderr })
}

fn render(program: &Path, args: &[&str]) -> String {
    let mut line = program.display().to_string();
    for arg in args {
        line.push(' ');
        line.push_str(arg);
    }
    line
}
