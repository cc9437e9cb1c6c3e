use crossterm::{cursor::MoveTo, queue};
use std::io::{self, Write};

use super::ScreenSize;

/// Closing rule, placed two rows above the bottom so the prompt fits below.
pub fn draw_footer<W: Write>(out: &mut W, size: ScreenSize) -> io::Result<()> {
    queue!(out, MoveTo(0, size.rows.saturating_sub(2)))?;
    super::draw_rule(out, size.cols)
}
