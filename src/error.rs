use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The SSH config is missing or cannot be read. Fatal at startup.
    #[error("failed to read SSH config {}: {source}", path.display())]
    SshConfigUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not determine config directory")]
    NoConfigDir,

    #[error("invalid settings file: {0}")]
    Settings(#[from] toml::de::Error),
}
