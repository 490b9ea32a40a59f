//! Runs interpreter command lines through the platform shell.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::{process::Command, time::timeout};

use super::{Captured, Interpreter};
use crate::config::Config;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Default)]
pub struct ShellInterpreter {
    pub timeout: Option<Duration>,
}

impl ShellInterpreter {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            timeout: cfg.timeout(),
        }
    }
}

impl Interpreter for ShellInterpreter {
    async fn run(&self, command_line: &str) -> Result<Captured> {
        let mut cmd = shell_command(command_line);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = cmd.spawn().map_err(|source| Error::Spawn {
            command: command_line.to_string(),
            source,
        })?;

        let out = match self.timeout {
            Some(limit) => timeout(limit, child.wait_with_output())
                .await
                .map_err(|_| Error::Timeout(limit.as_secs()))??,
            None => child.wait_with_output().await?,
        };

        let mut text = String::from_utf8_lossy(&out.stdout).into_owned();
        if !out.stderr.is_empty() {
            if !text.is_empty() && !text.ends_with('\n') {
                text.push('\n');
            }
            text.push_str(&String::from_utf8_lossy(&out.stderr));
        }
        let status = out.status.code();
        if status == Some(0) {
            tracing::info!("interpreter exited successfully");
        } else {
            tracing::warn!(?status, "interpreter exited with failure");
        }
        Ok(Captured { text, status })
    }
}

fn shell_command(command_line: &str) -> Command {
    if cfg!(windows) {
        let mut cmd = Command::new("cmd.exe");
        cmd.args(["/C", command_line]);
        cmd
    } else {
        let mut cmd = Command::new("/bin/sh");
        cmd.arg("-c").arg(command_line);
        cmd
    }
}

/// Quote `path` as a single shell word.
pub fn quote_path(path: &Path) -> String {
    let raw = path.to_string_lossy();
    if cfg!(windows) {
        format!("\"{raw}\"")
    } else {
        format!("'{}'", raw.replace('\'', r"'\''"))
    }
}
