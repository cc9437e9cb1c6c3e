pub const DEFAULT_ABOUT: &str = "no description";
pub const DEFAULT_CONNECT_PROGRAM: &str = "ssh";

/// A host from the SSH config that opted in with `#kroppzeug_managed true`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedHost {
    pub shortcut: String,
    pub about: String,
    /// `None` means the host cannot be updated at all.
    pub update_command: Option<String>,
    pub autocmd: Option<String>,
    pub connect_program: String,
}

impl ManagedHost {
    pub fn new(shortcut: impl Into<String>) -> Self {
        Self {
            shortcut: shortcut.into(),
            about: DEFAULT_ABOUT.to_string(),
            update_command: None,
            autocmd: None,
            connect_program: DEFAULT_CONNECT_PROGRAM.to_string(),
        }
    }
}
