//! Scanner for the managed-host directives kept as comments in an SSH config.
//!
//! Only blocks carrying `#kroppzeug_managed true` become hosts. The commit
//! happens on the managed line itself, so directives placed after it in the
//! same block are not captured.

use std::fs;
use std::path::Path;

use crate::error::Error;
use crate::models::{ManagedHost, DEFAULT_CONNECT_PROGRAM};

pub fn parse_file(path: &Path) -> Result<Vec<ManagedHost>, Error> {
    let content = fs::read_to_string(path).map_err(|source| Error::SshConfigUnreadable {
        path: path.to_path_buf(),
        source,
    })?;

    let hosts = parse_str(&content);
    tracing::info!("Loaded {} managed hosts from {:?}", hosts.len(), path);
    Ok(hosts)
}

pub fn parse_str(content: &str) -> Vec<ManagedHost> {
    let mut hosts = Vec::new();
    // Directives before the first `Host` line have no block to apply to.
    let mut current: Option<ManagedHost> = None;

    for line in content.lines() {
        let Some((option, value)) = split_option(line) else {
            continue;
        };

        match option.to_lowercase().as_str() {
            "host" => current = Some(ManagedHost::new(value)),
            "#kroppzeug_ssh" => {
                if let Some(host) = &mut current {
                    if !value.eq_ignore_ascii_case(DEFAULT_CONNECT_PROGRAM) {
                        host.connect_program = value.to_string();
                    }
                }
            }
            "#kroppzeug_description" => {
                if let Some(host) = &mut current {
                    host.about = value.to_string();
                }
            }
            "#kroppzeug_update" => {
                if let Some(host) = &mut current {
                    if !value.is_empty() {
                        host.update_command = Some(value.to_string());
                    }
                }
            }
            "#kroppzeug_autocmd" => {
                if let Some(host) = &mut current {
                    if !value.eq_ignore_ascii_case("false") {
                        host.autocmd = Some(value.to_string());
                    }
                }
            }
            "#kroppzeug_managed" => {
                if let Some(host) = &current {
                    if value.eq_ignore_ascii_case("true") {
                        tracing::debug!("Managed host: {:?}", host);
                        hosts.push(host.clone());
                    }
                }
            }
            _ => {}
        }
    }

    hosts
}

/// Splits a trimmed line on its first run of whitespace.
fn split_option(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    let (option, rest) = line.split_once(char::is_whitespace)?;
    let value = rest.trim_start();
    if value.is_empty() {
        return None;
    }
    Some((option, value))
}
