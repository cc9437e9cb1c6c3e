use crate::models::ManagedHost;
use anyhow::{Context, Result};
use std::fmt;
use std::process::Stdio;
use tokio::process::Command;

/// A command line handed to `sh -c`.
///
/// Shell metacharacters in shortcuts, autocmds and update commands are
/// interpreted by the shell, which existing configs rely on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshCommand(String);

impl SshCommand {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SshCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn connect_command(host: &ManagedHost) -> SshCommand {
    let mut line = format!("{} {}", host.connect_program, host.shortcut);
    if let Some(autocmd) = &host.autocmd {
        line.push_str(&format!(" -t \"{}\"", autocmd));
    }
    SshCommand(line)
}

/// Updates always go through plain `ssh -v`, never the per-host program.
pub fn update_command(host: &ManagedHost) -> Option<SshCommand> {
    host.update_command
        .as_ref()
        .map(|update| SshCommand(format!("ssh -v {} -t \"{}\"", host.shortcut, update)))
}

#[allow(async_fn_in_trait)]
pub trait Launcher {
    /// Runs the command to completion with the terminal attached.
    async fn launch(&mut self, command: &SshCommand) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct ShellLauncher;

impl Launcher for ShellLauncher {
    async fn launch(&mut self, command: &SshCommand) -> Result<()> {
        tracing::info!("Running: {}", command);

        let status = Command::new("sh")
            .arg("-c")
            .arg(command.as_str())
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .with_context(|| format!("Failed to execute `{}`", command))?;

        if !status.success() {
            // ssh already reported the problem on the terminal.
            tracing::warn!("`{}` finished with a non-zero status: {}", command, status);
        }

        Ok(())
    }
}
