//! EXCMD Shell
//!
//! Reads ex-commands line by line and runs them against a simulated
//! browser: tabs, windows and bookmarks live in memory, aliases, key
//! bindings and search keywords in the configuration store.

mod commands;
mod state;

use anyhow::Context;
use clap::Parser;
use excmd_core::{Config, Dispatcher, Interpreter};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};

use commands::Host;
use state::AppState;

#[derive(Debug, Parser)]
#[command(name = "excmd", version)]
#[command(about = "Run ex-commands against a simulated browser")]
struct Options {
    /// JSON configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Keep settings in memory instead of the SQLite store
    #[arg(long)]
    memory: bool,

    /// Command to run; when given, stdin is not read
    #[arg(short = 'c', long = "command", value_name = "EXCMD")]
    commands: Vec<String>,
}

async fn run_line(interpreter: &mut Interpreter<Host>, line: &str) {
    let line = line.trim().trim_start_matches(':');
    if let Err(e) = interpreter.execute(line).await {
        interpreter.dispatcher_mut().report(&e);
    }
    for message in interpreter.dispatcher_mut().drain_messages() {
        println!("{message}");
    }
}

pub async fn run() -> anyhow::Result<()> {
    let options = Options::parse();

    let config = match &options.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };

    // Initialize logging
    excmd_core::init_logging(&config.log_level);

    let state = AppState::open(config, options.memory)?;
    state.initialize()?;
    let mut interpreter = Interpreter::new(state.store(), Host::new(state));

    tracing::info!(in_memory = options.memory, "EXCMD shell started");

    if !options.commands.is_empty() {
        for command in &options.commands {
            run_line(&mut interpreter, command).await;
        }
        return Ok(());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        run_line(&mut interpreter, &line).await;
    }

    Ok(())
}
