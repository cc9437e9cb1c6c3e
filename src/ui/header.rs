use crossterm::{
    queue,
    style::{Attribute, Color, SetAttribute, SetForegroundColor},
};
use std::io::{self, Write};

const BANNER: [&str; 3] = [
    "┬┌─┬─┐┌─┐┌─┐┌─┐┌─┐┌─┐┬ ┬┌─┐",
    "├┴┐├┬┘│ │├─┘├─┘┌─┘├┤ │ ││ ┬",
    "┴ ┴┴└─└─┘┴  ┴  └─┘└─┘└─┘└─┘",
];

/// What the top of the screen shows. Toggled by `whereami`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HeaderMode {
    #[default]
    Banner,
    Hostname,
}

impl HeaderMode {
    pub fn toggled(self) -> Self {
        match self {
            HeaderMode::Banner => HeaderMode::Hostname,
            HeaderMode::Hostname => HeaderMode::Banner,
        }
    }
}

pub fn local_hostname() -> String {
    whoami::fallible::hostname().unwrap_or_else(|e| {
        tracing::warn!("Could not read hostname: {}", e);
        "localhost".to_string()
    })
}

fn center(text: &str, width: u16) -> String {
    format!("{:^width$}", text, width = width as usize)
}

pub fn draw_header<W: Write>(out: &mut W, mode: HeaderMode, width: u16) -> io::Result<()> {
    queue!(
        out,
        SetAttribute(Attribute::Bold),
        SetForegroundColor(Color::Red)
    )?;

    match mode {
        HeaderMode::Hostname => {
            writeln!(out)?;
            writeln!(out, "{}", center(&local_hostname(), width))?;
            writeln!(out)?;
        }
        HeaderMode::Banner => {
            for line in BANNER {
                writeln!(out, "{}", center(line, width))?;
            }
        }
    }

    queue!(out, SetAttribute(Attribute::Reset))?;
    super::draw_rule(out, width)
}
