use crate::app::App;
use crate::app_event::{Flow, ShellEvent};
use crate::config::AppConfig;
use crate::models::ManagedHost;
use crate::prompt::LineSource;
use crate::ssh_config;
use crate::ssh_service::{Launcher, ShellLauncher};
use crate::ui::{self, HeaderMode, Layout};
use anyhow::{Context, Result};
use crossterm::{
    queue,
    style::{Attribute, SetAttribute},
};
use std::io::{self, Stdout, Write};

pub const FAREWELL_EXIT: &str = "Thank you for using Kroppzeug to manage your digital offspring!";
pub const FAREWELL_INTERRUPT: &str = "Life tasted so good, dude!";

/// Shared by Ctrl+C at the prompt and SIGINT while a child process runs.
pub fn say_goodbye_interrupted<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out)?;
    queue!(out, SetAttribute(Attribute::Reset))?;
    writeln!(out, "{}", FAREWELL_INTERRUPT)?;
    out.flush()
}

impl App<ShellLauncher, Stdout> {
    /// Reads the SSH config named in `config`. An unreadable file is fatal.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let hosts = ssh_config::parse_file(&config.ssh_file_config)
            .context("Failed to load managed hosts")?;
        Ok(Self::with_parts(hosts, config, ShellLauncher, io::stdout()))
    }
}

impl<L: Launcher, W: Write> App<L, W> {
    pub fn with_parts(hosts: Vec<ManagedHost>, config: &AppConfig, launcher: L, out: W) -> Self {
        Self {
            hosts,
            header_mode: HeaderMode::default(),
            layout: Layout::new(config.columns, config.shortcut_width),
            connect_delay: config.connect_delay(),
            update_delay: config.update_delay(),
            launcher,
            out,
        }
    }

    pub fn render(&mut self) -> Result<()> {
        let size = ui::terminal_size();
        ui::draw(&mut self.out, &self.hosts, self.header_mode, &self.layout, size)
            .context("Failed to draw screen")
    }

    /// Runs until `exit`, Ctrl+D or Ctrl+C.
    pub async fn run<S: LineSource>(&mut self, source: &mut S) -> Result<()> {
        self.render()?;

        loop {
            match source.read_line(&*self)? {
                ShellEvent::Line(line) => {
                    tracing::debug!("Command: {:?}", line);
                    if self.execute_line(&line).await? == Flow::Quit {
                        return Ok(());
                    }
                }
                ShellEvent::EndOfInput => {
                    self.execute_line("exit").await?;
                    return Ok(());
                }
                ShellEvent::Interrupted => {
                    tracing::info!("Interrupted at the prompt");
                    say_goodbye_interrupted(&mut self.out)?;
                    return Ok(());
                }
            }
        }
    }
}
