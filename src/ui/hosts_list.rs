use crossterm::{
    queue,
    style::{Attribute, Color, SetAttribute, SetForegroundColor},
};
use std::io::{self, Write};

use super::{Layout, AFTER_ABOUT, BEFORE_SHORTCUT, BETWEEN};
use crate::models::ManagedHost;

fn truncate(text: &str, width: usize) -> String {
    text.chars().take(width).collect()
}

/// Shortcut right-justified and description left-justified, both cut to width.
pub fn format_cell(host: &ManagedHost, shortcut_width: usize, about_width: usize) -> (String, String) {
    let shortcut = format!(
        "{:>width$}",
        truncate(&host.shortcut, shortcut_width),
        width = shortcut_width
    );
    let about = format!(
        "{:<width$}",
        truncate(&host.about, about_width),
        width = about_width
    );
    (shortcut, about)
}

pub fn draw_hosts_list<W: Write>(
    out: &mut W,
    hosts: &[ManagedHost],
    layout: &Layout,
    terminal_width: u16,
) -> io::Result<()> {
    let about_width = layout.about_width(terminal_width);

    for (i, host) in hosts.iter().enumerate() {
        let (shortcut, about) = format_cell(host, layout.shortcut_width, about_width);

        write!(out, "{}", " ".repeat(BEFORE_SHORTCUT))?;
        queue!(
            out,
            SetAttribute(Attribute::Bold),
            SetForegroundColor(Color::Blue)
        )?;
        write!(out, "{}", shortcut)?;
        queue!(out, SetAttribute(Attribute::Reset))?;
        write!(
            out,
            "{}{}{}",
            " ".repeat(BETWEEN),
            about,
            " ".repeat(AFTER_ABOUT)
        )?;

        if i % layout.columns == layout.columns - 1 {
            writeln!(out)?;
        }
    }

    if hosts.len() % layout.columns != 0 {
        writeln!(out)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host(shortcut: &str, about: &str) -> ManagedHost {
        let mut host = ManagedHost::new(shortcut);
        host.about = about.to_string();
        host
    }

    fn render(hosts: &[ManagedHost], width: u16) -> Vec<String> {
        let mut out = Vec::new();
        draw_hosts_list(&mut out, hosts, &Layout::default(), width).unwrap();
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_format_cell_pads() {
        let (shortcut, about) = format_cell(&host("web", "frontend"), 6, 10);
        assert_eq!(shortcut, "   web");
        assert_eq!(about, "frontend  ");
    }

    #[test]
    fn test_format_cell_truncates() {
        let (shortcut, about) = format_cell(&host("database-primary", "ümlaut heavy text"), 4, 6);
        assert_eq!(shortcut, "data");
        assert_eq!(about, "ümlaut");
    }

    #[test]
    fn test_two_hosts_per_line() {
        let hosts = vec![host("a", "one"), host("b", "two"), host("c", "three")];
        let lines = render(&hosts, 80);

        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("one") && lines[0].contains("two"));
        assert!(lines[1].contains("three"));
    }

    #[test]
    fn test_even_count_has_no_extra_line() {
        let hosts = vec![host("a", "one"), host("b", "two")];
        assert_eq!(render(&hosts, 80).len(), 1);
    }

    #[test]
    fn test_empty_store_renders_nothing() {
        assert!(render(&[], 80).is_empty());
    }
}
