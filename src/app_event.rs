/// What the prompt hands back to the shell loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellEvent {
    Line(String),
    /// Ctrl+C at the prompt.
    Interrupted,
    /// Ctrl+D on an empty line.
    EndOfInput,
}

/// Whether the shell loop keeps going after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}
