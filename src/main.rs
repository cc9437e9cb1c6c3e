use anyhow::Result;
use chrono::Local;
use clap::Parser;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

mod app;
mod app_event;
mod config;
mod error;
mod models;
mod prompt;
mod ssh_config;
mod ssh_service;
mod ui;

use app::App;
use config::ConfigManager;
use prompt::LineEditor;

#[derive(Parser)]
#[command(name = "kroppzeug", version, about = "Helps you to manage your server kindergarten")]
struct Arguments {
    /// SSH config to read managed hosts from [default: ~/.ssh/config]
    #[arg(long, value_name = "PATH")]
    ssh_config: Option<PathBuf>,

    /// Settings file [default: <config dir>/kroppzeug/kroppzeug.toml]
    #[arg(long, value_name = "PATH")]
    settings: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Arguments::parse();

    let config_manager = match args.settings {
        Some(path) => ConfigManager::with_file(path),
        None => ConfigManager::new()?,
    };
    let mut app_config = config_manager.load_config()?;
    if let Some(path) = args.ssh_config {
        app_config.ssh_file_config = path;
    }

    // The screen belongs to the shell, so logs only ever go to a file.
    if let Err(e) = init_logging(&app_config.log_dir) {
        eprintln!("Logging disabled: {:#}", e);
    }

    debug!(
        "Starting with settings from {:?}: {:?}",
        config_manager.get_config_path(),
        app_config
    );

    let mut app = match App::new(&app_config) {
        Ok(app) => app,
        Err(err) => {
            tracing::error!("{:?}", err);
            eprintln!("Error: {:#}", err);
            std::process::exit(1);
        }
    };

    // SIGINT only arrives while a child owns the terminal; at the prompt
    // Ctrl+C is read as a key.
    tokio::spawn(async {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Received SIGINT");
            let _ = app::say_goodbye_interrupted(&mut io::stdout());
            std::process::exit(0);
        }
    });

    let mut editor = LineEditor::new();
    if let Err(err) = app.run(&mut editor).await {
        tracing::error!("{:?}", err);
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }

    Ok(())
}

fn init_logging(log_dir: &Path) -> Result<()> {
    fs::create_dir_all(log_dir)?;

    let log_file = log_dir.join(format!(
        "kroppzeug_{}.log",
        Local::now().format("%Y%m%d_%H%M%S")
    ));
    let file = File::create(&log_file)?;

    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("kroppzeug=debug".parse()?))
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    debug!("Logging to {:?}", log_file);
    Ok(())
}
