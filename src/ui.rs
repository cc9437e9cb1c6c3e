pub mod footer;
pub mod header;
pub mod hosts_list;

use crate::models::ManagedHost;
use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Attribute, Color, SetAttribute, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use std::io::{self, Write};

pub use header::HeaderMode;

// Fine grained spacing around each host cell.
pub const BEFORE_SHORTCUT: usize = 1;
pub const BETWEEN: usize = 1;
pub const AFTER_ABOUT: usize = 1;
pub const MIDDLE: usize = 0;

const FALLBACK_SIZE: ScreenSize = ScreenSize { cols: 80, rows: 24 };

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenSize {
    pub cols: u16,
    pub rows: u16,
}

/// Column layout of the host list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub columns: usize,
    pub shortcut_width: usize,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            columns: 2,
            shortcut_width: 16,
        }
    }
}

impl Layout {
    pub fn new(columns: usize, shortcut_width: usize) -> Self {
        Self {
            columns: columns.max(1),
            shortcut_width,
        }
    }

    /// Width left for descriptions once shortcuts and spacing are placed.
    pub fn about_width(&self, terminal_width: u16) -> usize {
        let cell = BEFORE_SHORTCUT + self.shortcut_width + BETWEEN + AFTER_ABOUT;
        let used = cell * self.columns + MIDDLE;
        (terminal_width as usize).saturating_sub(used) / self.columns
    }
}

/// Queries the terminal on every call since it may have been resized.
pub fn terminal_size() -> ScreenSize {
    match crossterm::terminal::size() {
        Ok((cols, rows)) => ScreenSize { cols, rows },
        Err(e) => {
            tracing::warn!("Could not query terminal size, assuming 80x24: {}", e);
            FALLBACK_SIZE
        }
    }
}

pub fn clear_screen<W: Write>(out: &mut W) -> io::Result<()> {
    queue!(out, Clear(ClearType::All), MoveTo(0, 0))
}

/// Horizontal rule across the full width, bold green.
pub fn draw_rule<W: Write>(out: &mut W, width: u16) -> io::Result<()> {
    queue!(
        out,
        SetAttribute(Attribute::Bold),
        SetForegroundColor(Color::Green)
    )?;
    write!(out, "{}", "─".repeat(width as usize))?;
    queue!(out, SetAttribute(Attribute::Reset))?;
    writeln!(out)
}

/// Redraws the whole screen: header, host columns and the closing rule.
pub fn draw<W: Write>(
    out: &mut W,
    hosts: &[ManagedHost],
    header_mode: HeaderMode,
    layout: &Layout,
    size: ScreenSize,
) -> io::Result<()> {
    clear_screen(out)?;
    header::draw_header(out, header_mode, size.cols)?;
    hosts_list::draw_hosts_list(out, hosts, layout, size.cols)?;
    footer::draw_footer(out, size)?;
    out.flush()
}
