use crate::app::state::FAREWELL_EXIT;
use crate::app::App;
use crate::app_event::Flow;
use crate::models::ManagedHost;
use crate::prompt::{Completer, Completion};
use crate::ssh_service::{self, Launcher, SshCommand};
use crate::ui;
use anyhow::Result;
use crossterm::{
    queue,
    style::{Attribute, Color, SetAttribute, SetForegroundColor},
};
use std::io::Write;
use tokio::time::sleep;

const UPDATE_ALL: &str = "all";

/// Verb names with their help text, in the order `help` lists them.
const VERBS: [(&str, &str); 6] = [
    ("connect", "Connect to specified host: connect valkyr"),
    ("exit", "Exit/quit the Kroppzeug shell: exit"),
    (
        "help",
        "List available commands with \"help\" or detailed help with \"help cmd\".",
    ),
    ("list", "List all available shortcuts for managed hosts: list"),
    (
        "update",
        "Update specified host: update painkiller\nUpdate all hosts:      update all",
    ),
    (
        "whereami",
        "Toggle if current hostname should be displayed instead of the Kroppzeug logo: whereami",
    ),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command<'a> {
    WhereAmI,
    Connect(&'a str),
    Update(UpdateTarget<'a>),
    List,
    Exit,
    Help(Option<&'a str>),
    Empty,
    Unknown(&'a str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateTarget<'a> {
    All,
    Host(&'a str),
}

impl<'a> Command<'a> {
    pub fn parse(line: &'a str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Command::Empty;
        }

        // `?` is shorthand for `help`, with or without a space before the topic.
        if let Some(topic) = line.strip_prefix('?') {
            let topic = topic.trim();
            return Command::Help((!topic.is_empty()).then_some(topic));
        }

        let (verb, arg) = match line.split_once(char::is_whitespace) {
            Some((verb, arg)) => (verb, arg.trim()),
            None => (line, ""),
        };

        match verb {
            "whereami" => Command::WhereAmI,
            "connect" => Command::Connect(arg),
            "update" if arg == UPDATE_ALL => Command::Update(UpdateTarget::All),
            "update" => Command::Update(UpdateTarget::Host(arg)),
            "list" => Command::List,
            "exit" => Command::Exit,
            "help" if arg.is_empty() => Command::Help(None),
            "help" => Command::Help(Some(arg)),
            _ => Command::Unknown(line),
        }
    }
}

impl<L: Launcher, W: Write> App<L, W> {
    pub async fn execute_line(&mut self, line: &str) -> Result<Flow> {
        match Command::parse(line) {
            Command::WhereAmI => {
                // Shown on the next redraw.
                self.header_mode = self.header_mode.toggled();
            }
            Command::Connect(shortcut) => self.connect(shortcut).await?,
            Command::Update(UpdateTarget::All) => self.update_all().await?,
            Command::Update(UpdateTarget::Host(shortcut)) => self.update(shortcut).await?,
            Command::List => self.render()?,
            Command::Exit => {
                writeln!(self.out, "{}", FAREWELL_EXIT)?;
                self.out.flush()?;
                return Ok(Flow::Quit);
            }
            Command::Help(topic) => self.help(topic)?,
            Command::Empty => {}
            Command::Unknown(line) => {
                writeln!(self.out, "*** Unknown syntax: {}", line)?;
                self.out.flush()?;
            }
        }
        Ok(Flow::Continue)
    }

    async fn connect(&mut self, shortcut: &str) -> Result<()> {
        let Some(host) = self.find_by_shortcut(shortcut) else {
            return self.report_unknown_shortcut(shortcut);
        };

        let command = ssh_service::connect_command(host);
        self.launch(&command).await?;
        sleep(self.connect_delay).await;
        self.render()
    }

    async fn update(&mut self, shortcut: &str) -> Result<()> {
        let Some(host) = self.find_by_shortcut(shortcut).cloned() else {
            return self.report_unknown_shortcut(shortcut);
        };

        if self.update_host(&host).await? {
            ui::draw_rule(&mut self.out, ui::terminal_size().cols)?;
            self.out.flush()?;
            sleep(self.update_delay).await;
            self.render()?;
        }
        Ok(())
    }

    async fn update_all(&mut self) -> Result<()> {
        let hosts = self.hosts.clone();
        for host in &hosts {
            if self.update_host(host).await? {
                ui::draw_rule(&mut self.out, ui::terminal_size().cols)?;
                self.render()?;
            }
        }
        Ok(())
    }

    /// Returns whether anything ran. Hosts without an update command are skipped silently.
    async fn update_host(&mut self, host: &ManagedHost) -> Result<bool> {
        let Some(command) = ssh_service::update_command(host) else {
            tracing::debug!("{} has no update command", host.shortcut);
            return Ok(false);
        };

        self.launch(&command).await?;
        Ok(true)
    }

    async fn launch(&mut self, command: &SshCommand) -> Result<()> {
        ui::clear_screen(&mut self.out)?;
        queue!(self.out, SetForegroundColor(Color::Yellow))?;
        write!(self.out, "{}", command)?;
        queue!(self.out, SetAttribute(Attribute::Reset))?;
        writeln!(self.out)?;
        self.out.flush()?;

        if let Err(e) = self.launcher.launch(command).await {
            tracing::error!("{:?}", e);
            self.print_error(&format!("{:#}", e))?;
        }
        Ok(())
    }

    fn report_unknown_shortcut(&mut self, shortcut: &str) -> Result<()> {
        tracing::debug!("Unknown shortcut {:?}", shortcut);
        self.print_error("unknown/undefined shortcut")
    }

    fn print_error(&mut self, message: &str) -> Result<()> {
        queue!(
            self.out,
            SetAttribute(Attribute::Bold),
            SetForegroundColor(Color::Red)
        )?;
        write!(self.out, "{}", message)?;
        queue!(self.out, SetAttribute(Attribute::Reset))?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }

    fn help(&mut self, topic: Option<&str>) -> Result<()> {
        match topic {
            None => {
                queue!(
                    self.out,
                    SetAttribute(Attribute::Bold),
                    SetForegroundColor(Color::Magenta)
                )?;
                write!(self.out, "Documented commands (type help <topic>):")?;
                queue!(self.out, SetAttribute(Attribute::Reset))?;
                writeln!(self.out)?;
                writeln!(self.out, "{}", "=".repeat(40))?;
                let names: Vec<&str> = VERBS.iter().map(|(name, _)| *name).collect();
                writeln!(self.out, "{}", names.join("  "))?;
                writeln!(self.out)?;
            }
            Some(topic) => match VERBS.iter().find(|(name, _)| *name == topic) {
                Some((_, text)) => writeln!(self.out, "{}", text)?,
                None => writeln!(self.out, "*** No help on {}", topic)?,
            },
        }
        self.out.flush()?;
        Ok(())
    }
}

impl<L: Launcher, W: Write> Completer for App<L, W> {
    fn complete(&self, line: &str) -> Completion {
        let start = line
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_whitespace())
            .map_or(0, |(i, c)| i + c.len_utf8());
        let word = &line[start..];
        let first_word = !line.trim_start().contains(char::is_whitespace);

        let candidates = if first_word {
            verbs_with_prefix(word)
        } else {
            match line.split_whitespace().next() {
                Some("connect") | Some("update") => self.shortcuts_with_prefix(word),
                Some("help") => verbs_with_prefix(word),
                _ => Vec::new(),
            }
        };

        Completion { start, candidates }
    }
}

fn verbs_with_prefix(prefix: &str) -> Vec<String> {
    VERBS
        .iter()
        .map(|(name, _)| *name)
        .filter(|name| name.starts_with(prefix))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::{app_with, host, output, updatable};
    use crate::ui::HeaderMode;

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("whereami"), Command::WhereAmI);
        assert_eq!(Command::parse("  connect   valkyr "), Command::Connect("valkyr"));
        assert_eq!(Command::parse("update all"), Command::Update(UpdateTarget::All));
        assert_eq!(
            Command::parse("update painkiller"),
            Command::Update(UpdateTarget::Host("painkiller"))
        );
        assert_eq!(Command::parse("list"), Command::List);
        assert_eq!(Command::parse("exit"), Command::Exit);
        assert_eq!(Command::parse("help"), Command::Help(None));
        assert_eq!(Command::parse("help update"), Command::Help(Some("update")));
        assert_eq!(Command::parse("?"), Command::Help(None));
        assert_eq!(Command::parse("? update"), Command::Help(Some("update")));
        assert_eq!(Command::parse("?connect"), Command::Help(Some("connect")));
        assert_eq!(Command::parse(""), Command::Empty);
        assert_eq!(Command::parse("reboot now"), Command::Unknown("reboot now"));
        assert_eq!(Command::parse("Connect a"), Command::Unknown("Connect a"));
    }

    #[tokio::test]
    async fn test_whereami_toggles_without_redraw() {
        let mut app = app_with(vec![host("alpha")]);

        assert_eq!(app.execute_line("whereami").await.unwrap(), Flow::Continue);
        assert_eq!(app.header_mode, HeaderMode::Hostname);
        assert!(output(&app).is_empty());

        app.execute_line("whereami").await.unwrap();
        assert_eq!(app.header_mode, HeaderMode::Banner);
    }

    #[tokio::test]
    async fn test_connect_known_host() {
        let mut alpha = host("alpha");
        alpha.connect_program = "mosh".into();
        alpha.autocmd = Some("tmux a".into());
        let mut app = app_with(vec![alpha]);

        app.execute_line("connect alpha").await.unwrap();

        assert_eq!(app.launcher.commands, vec!["mosh alpha -t \"tmux a\""]);
        let screen = output(&app);
        assert!(screen.contains("mosh alpha -t \"tmux a\""));
        assert!(screen.contains("alpha"));
    }

    const CLEAR: &str = "\x1b[2J";

    fn yellow() -> String {
        let mut buf = Vec::new();
        queue!(buf, SetForegroundColor(Color::Yellow)).unwrap();
        String::from_utf8(buf).unwrap()
    }

    /// Checks that `command` was echoed in yellow and followed by a redraw,
    /// with a separator rule in between when `with_rule` is set.
    fn assert_ran_then_redrew(screen: &str, command: &str, with_rule: bool) {
        let echoed = format!("{}{}", yellow(), command);
        let at = screen
            .find(&echoed)
            .unwrap_or_else(|| panic!("{command} was not echoed"));
        let rest = &screen[at..];
        let redraw = rest
            .find(CLEAR)
            .unwrap_or_else(|| panic!("no redraw after {command}"));

        match rest.find('─') {
            Some(rule) if with_rule => assert!(rule < redraw, "rule after redraw for {command}"),
            None if with_rule => panic!("no rule after {command}"),
            Some(rule) => assert!(rule > redraw, "unexpected rule after {command}"),
            None => {}
        }
    }

    #[tokio::test]
    async fn test_connect_redraws_after_child_returns() {
        let mut app = app_with(vec![host("alpha")]);

        app.execute_line("connect alpha").await.unwrap();

        let screen = output(&app);
        assert_ran_then_redrew(&screen, "ssh alpha", false);
        assert_eq!(screen.matches(CLEAR).count(), 2);
    }

    #[tokio::test]
    async fn test_update_prints_rule_then_redraws() {
        let mut app = app_with(vec![updatable("alpha", "uptime")]);

        app.execute_line("update alpha").await.unwrap();

        let screen = output(&app);
        assert_ran_then_redrew(&screen, "ssh -v alpha -t \"uptime\"", true);
        assert_eq!(screen.matches(CLEAR).count(), 2);
    }

    #[tokio::test]
    async fn test_update_all_rule_and_redraw_per_updated_host() {
        let hosts = vec![updatable("a", "x"), host("b"), updatable("c", "y")];
        let mut app = app_with(hosts);

        app.execute_line("update all").await.unwrap();

        let screen = output(&app);
        assert_ran_then_redrew(&screen, "ssh -v a -t \"x\"", true);
        assert_ran_then_redrew(&screen, "ssh -v c -t \"y\"", true);
        assert!(screen.find("-v a ").unwrap() < screen.find("-v c ").unwrap());
        // One clear for the command echo and one for the redraw, per host that ran.
        assert_eq!(screen.matches(CLEAR).count(), 2 * 2);
    }

    #[tokio::test]
    async fn test_connect_first_match_wins() {
        let mut first = host("dup");
        first.connect_program = "first".into();
        let mut second = host("dup");
        second.connect_program = "second".into();
        let mut app = app_with(vec![first, second]);

        app.execute_line("connect dup").await.unwrap();
        assert_eq!(app.launcher.commands, vec!["first dup"]);
    }

    #[tokio::test]
    async fn test_connect_unknown_shortcut() {
        let mut app = app_with(vec![host("alpha")]);

        assert_eq!(app.execute_line("connect beta").await.unwrap(), Flow::Continue);
        assert!(app.launcher.commands.is_empty());
        assert!(output(&app).contains("unknown/undefined shortcut"));
    }

    #[tokio::test]
    async fn test_update_all_only_runs_updatable_hosts() {
        let hosts = vec![
            updatable("a", "apt-get upgrade"),
            host("b"),
            updatable("c", "yum update"),
            host("d"),
        ];
        let mut app = app_with(hosts);

        app.execute_line("update all").await.unwrap();

        assert_eq!(
            app.launcher.commands,
            vec![
                "ssh -v a -t \"apt-get upgrade\"",
                "ssh -v c -t \"yum update\""
            ]
        );
    }

    #[tokio::test]
    async fn test_update_ignores_connect_program() {
        let mut alpha = updatable("alpha", "uptime");
        alpha.connect_program = "mosh".into();
        let mut app = app_with(vec![alpha]);

        app.execute_line("update alpha").await.unwrap();
        assert_eq!(app.launcher.commands, vec!["ssh -v alpha -t \"uptime\""]);
    }

    #[tokio::test]
    async fn test_update_without_command_is_silent() {
        let mut app = app_with(vec![host("alpha")]);

        app.execute_line("update alpha").await.unwrap();
        assert!(app.launcher.commands.is_empty());
        assert!(output(&app).is_empty());
    }

    #[tokio::test]
    async fn test_update_unknown_shortcut() {
        let mut app = app_with(vec![updatable("alpha", "uptime")]);

        app.execute_line("update beta").await.unwrap();
        assert!(app.launcher.commands.is_empty());
        assert!(output(&app).contains("unknown/undefined shortcut"));
    }

    #[tokio::test]
    async fn test_launch_failure_is_reported_and_loop_continues() {
        let mut app = app_with(vec![host("alpha")]);
        app.launcher.fail = true;

        assert_eq!(app.execute_line("connect alpha").await.unwrap(), Flow::Continue);
        assert!(output(&app).contains("no shell here"));
    }

    #[tokio::test]
    async fn test_exit_says_goodbye() {
        let mut app = app_with(vec![]);

        assert_eq!(app.execute_line("exit").await.unwrap(), Flow::Quit);
        assert!(output(&app).contains(FAREWELL_EXIT));
    }

    #[tokio::test]
    async fn test_list_redraws() {
        let mut app = app_with(vec![host("alpha")]);

        app.execute_line("list").await.unwrap();
        assert!(output(&app).contains("alpha"));
    }

    #[tokio::test]
    async fn test_question_mark_is_help() {
        let mut app = app_with(vec![]);

        app.execute_line("?").await.unwrap();
        app.execute_line("? exit").await.unwrap();

        let text = output(&app);
        assert!(text.contains("Documented commands"));
        assert!(text.contains("Exit/quit the Kroppzeug shell"));
        assert!(!text.contains("Unknown syntax"));
    }

    #[tokio::test]
    async fn test_help_and_unknown() {
        let mut app = app_with(vec![]);

        app.execute_line("help").await.unwrap();
        app.execute_line("help update").await.unwrap();
        app.execute_line("help nothing").await.unwrap();
        app.execute_line("frobnicate").await.unwrap();

        let text = output(&app);
        assert!(text.contains("Documented commands"));
        assert!(text.contains("update all"));
        assert!(text.contains("*** No help on nothing"));
        assert!(text.contains("*** Unknown syntax: frobnicate"));
    }

    #[test]
    fn test_complete_shortcuts() {
        let app = app_with(vec![host("alpha"), host("beta"), host("app")]);

        let completion = app.complete("connect a");
        assert_eq!(completion.start, 8);
        assert_eq!(completion.candidates, vec!["alpha", "app"]);

        assert_eq!(app.complete("update b").candidates, vec!["beta"]);
        assert!(app.complete("list a").candidates.is_empty());
    }

    #[test]
    fn test_complete_verbs() {
        let app = app_with(vec![]);

        assert_eq!(app.complete("").candidates.len(), VERBS.len());
        assert_eq!(app.complete("e").candidates, vec!["exit"]);
        assert_eq!(app.complete("help u").candidates, vec!["update"]);

        let indented = app.complete("  co");
        assert_eq!(indented.start, 2);
        assert_eq!(indented.candidates, vec!["connect"]);
    }
}
