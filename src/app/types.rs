use std::io::{Stdout, Write};
use std::time::Duration;

use crate::models::ManagedHost;
use crate::ssh_service::{Launcher, ShellLauncher};
use crate::ui::{HeaderMode, Layout};

/// The interactive shell: the managed hosts plus everything the commands touch.
#[derive(Debug)]
pub struct App<L: Launcher = ShellLauncher, W: Write = Stdout> {
    /// Loaded once at startup, never modified afterwards.
    pub hosts: Vec<ManagedHost>,
    pub header_mode: HeaderMode,
    pub layout: Layout,
    pub connect_delay: Duration,
    pub update_delay: Duration,
    pub(super) launcher: L,
    pub(super) out: W,
}
