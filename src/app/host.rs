use crate::app::App;
use crate::models::ManagedHost;
use crate::ssh_service::Launcher;
use std::io::Write;

impl<L: Launcher, W: Write> App<L, W> {
    /// First match wins when a shortcut appears more than once.
    pub fn find_by_shortcut(&self, shortcut: &str) -> Option<&ManagedHost> {
        self.hosts.iter().find(|host| host.shortcut == shortcut)
    }

    /// Shortcuts starting with `prefix`, case-sensitive, in store order.
    pub fn shortcuts_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.hosts
            .iter()
            .filter(|host| host.shortcut.starts_with(prefix))
            .map(|host| host.shortcut.clone())
            .collect()
    }
}
