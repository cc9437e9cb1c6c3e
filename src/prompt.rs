//! Minimal line editor running the terminal in raw mode for one line at a time.

use anyhow::{Context, Result};
use crossterm::{
    cursor::MoveToColumn,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    queue,
    style::{Attribute, Color, SetAttribute, SetForegroundColor},
    terminal::{disable_raw_mode, enable_raw_mode, Clear, ClearType},
};
use std::io::{self, Write};

use crate::app_event::ShellEvent;

pub const PROMPT: &str = "(kroppzeug)$ ";

/// Candidates for the word that ends at the cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Completion {
    /// Byte offset where the word being completed starts.
    pub start: usize,
    pub candidates: Vec<String>,
}

pub trait Completer {
    fn complete(&self, line: &str) -> Completion;
}

/// Where the shell loop gets its input from.
pub trait LineSource {
    fn read_line<C: Completer>(&mut self, completer: &C) -> Result<ShellEvent>;
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LineBuffer {
    text: String,
    cursor: usize,
}

impl LineBuffer {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn before_cursor(&self) -> &str {
        &self.text[..self.cursor]
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn set(&mut self, text: &str) {
        self.text = text.to_string();
        self.cursor = self.text.len();
    }

    pub fn insert(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn insert_str(&mut self, s: &str) {
        self.text.insert_str(self.cursor, s);
        self.cursor += s.len();
    }

    pub fn backspace(&mut self) {
        if let Some(c) = self.before_cursor().chars().next_back() {
            self.cursor -= c.len_utf8();
            self.text.remove(self.cursor);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.text.len() {
            self.text.remove(self.cursor);
        }
    }

    pub fn move_left(&mut self) {
        if let Some(c) = self.before_cursor().chars().next_back() {
            self.cursor -= c.len_utf8();
        }
    }

    pub fn move_right(&mut self) {
        if let Some(c) = self.text[self.cursor..].chars().next() {
            self.cursor += c.len_utf8();
        }
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.text.len();
    }

    /// Applies a completion in place. Returns the candidates when they are
    /// ambiguous and nothing more could be filled in, so the caller can list them.
    pub fn complete(&mut self, completion: &Completion) -> Option<Vec<String>> {
        let typed_len = self.cursor.checked_sub(completion.start)?;

        match completion.candidates.as_slice() {
            [] => None,
            [only] => {
                if let Some(rest) = only.get(typed_len..) {
                    self.insert_str(rest);
                }
                self.insert(' ');
                None
            }
            candidates => {
                let common = longest_common_prefix(candidates);
                match common.get(typed_len..) {
                    Some(rest) if !rest.is_empty() => {
                        self.insert_str(rest);
                        None
                    }
                    _ => Some(candidates.to_vec()),
                }
            }
        }
    }

    /// Cursor column, pinned to the last column once the line outgrows the terminal.
    fn display_cursor(&self, terminal_width: u16) -> u16 {
        let column = PROMPT.chars().count() + self.before_cursor().chars().count();
        column.min(terminal_width.saturating_sub(1) as usize) as u16
    }
}

fn longest_common_prefix(words: &[String]) -> String {
    let Some((first, rest)) = words.split_first() else {
        return String::new();
    };

    let mut prefix_len = first.len();
    for word in rest {
        prefix_len = first
            .char_indices()
            .zip(word.chars())
            .find(|((_, a), b)| a != b)
            .map(|((i, _), _)| i)
            .unwrap_or_else(|| first.len().min(word.len()))
            .min(prefix_len);
    }
    first[..prefix_len].to_string()
}

/// Restores cooked mode however the read ends.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if let Err(e) = disable_raw_mode() {
            tracing::error!("Failed to disable raw mode: {}", e);
        }
    }
}

enum KeyOutcome {
    Edit,
    Done(ShellEvent),
    List(Vec<String>),
}

#[derive(Debug, Default)]
pub struct LineEditor {
    history: Vec<String>,
}

impl LineEditor {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LineSource for LineEditor {
    fn read_line<C: Completer>(&mut self, completer: &C) -> Result<ShellEvent> {
        let _raw = RawModeGuard::enable()?;
        let mut stdout = io::stdout();
        let mut buffer = LineBuffer::default();
        let mut history_index = self.history.len();

        redraw(&mut stdout, &buffer)?;

        loop {
            let Event::Key(key) = event::read().context("Failed to read terminal event")? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }

            let outcome = match (key.code, key.modifiers) {
                (KeyCode::Up, _) if history_index > 0 => {
                    history_index -= 1;
                    buffer.set(&self.history[history_index]);
                    KeyOutcome::Edit
                }
                (KeyCode::Down, _) if history_index < self.history.len() => {
                    history_index += 1;
                    buffer.set(self.history.get(history_index).map_or("", String::as_str));
                    KeyOutcome::Edit
                }
                (KeyCode::Tab, _) => {
                    let completion = completer.complete(buffer.before_cursor());
                    match buffer.complete(&completion) {
                        Some(candidates) => KeyOutcome::List(candidates),
                        None => KeyOutcome::Edit,
                    }
                }
                _ => handle_key(&mut buffer, key),
            };

            match outcome {
                KeyOutcome::Edit => redraw(&mut stdout, &buffer)?,
                KeyOutcome::List(candidates) => {
                    write!(stdout, "\r\n{}\r\n", candidates.join("  "))?;
                    redraw(&mut stdout, &buffer)?;
                }
                KeyOutcome::Done(shell_event) => {
                    write!(stdout, "\r\n")?;
                    stdout.flush()?;
                    if let ShellEvent::Line(line) = &shell_event {
                        if !line.trim().is_empty() {
                            self.history.push(line.clone());
                        }
                    }
                    return Ok(shell_event);
                }
            }
        }
    }
}

fn handle_key(buffer: &mut LineBuffer, key: KeyEvent) -> KeyOutcome {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('c') if ctrl => return KeyOutcome::Done(ShellEvent::Interrupted),
        KeyCode::Char('d') if ctrl => {
            if buffer.is_empty() {
                return KeyOutcome::Done(ShellEvent::EndOfInput);
            }
            buffer.delete();
        }
        KeyCode::Char('a') if ctrl => buffer.home(),
        KeyCode::Char('e') if ctrl => buffer.end(),
        KeyCode::Char('u') if ctrl => buffer.set(""),
        KeyCode::Char(c) if !ctrl => buffer.insert(c),
        KeyCode::Enter => return KeyOutcome::Done(ShellEvent::Line(buffer.as_str().to_string())),
        KeyCode::Backspace => buffer.backspace(),
        KeyCode::Delete => buffer.delete(),
        KeyCode::Left => buffer.move_left(),
        KeyCode::Right => buffer.move_right(),
        KeyCode::Home => buffer.home(),
        KeyCode::End => buffer.end(),
        _ => {}
    }
    KeyOutcome::Edit
}

fn redraw<W: Write>(out: &mut W, buffer: &LineBuffer) -> io::Result<()> {
    queue!(
        out,
        MoveToColumn(0),
        Clear(ClearType::CurrentLine),
        SetAttribute(Attribute::Bold),
        SetForegroundColor(Color::Yellow)
    )?;
    write!(out, "{}", PROMPT)?;
    queue!(out, SetAttribute(Attribute::Reset))?;
    write!(out, "{}", buffer.as_str())?;
    let width = crossterm::terminal::size().map_or(u16::MAX, |(cols, _)| cols);
    queue!(out, MoveToColumn(buffer.display_cursor(width)))?;
    out.flush()
}
