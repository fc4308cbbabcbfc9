//! acctkeep - Terminal UI for a local account list
//!
//! Built with Ratatui and crossterm.

mod app;
mod config;
mod handlers;
mod ui;

use acctkeep_core::{AccountStore, FileStorage, KeyValueStorage};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use app::{App, AppState};
use config::{Config, ConfigOrigin};

/// acctkeep - manage a local list of accounts
#[derive(Parser, Debug)]
#[command(name = "acctkeep")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory holding the account list (overrides config)
    #[arg(short, long, value_name = "DIR")]
    storage_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print all accounts as pretty JSON
    Export {
        /// Write to this file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Append accounts from a JSON array, assigning new ids
    Import {
        /// JSON file to read
        file: PathBuf,
    },
    /// Print account counts
    Stats,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let (mut config, origin) = Config::load(args.config)?;
    if let Some(storage_dir) = args.storage_dir {
        config.storage_dir = storage_dir;
    }

    init_logging(&config)?;
    match origin {
        ConfigOrigin::Created(path) => {
            tracing::info!("Created default config: {}", path.display())
        }
        ConfigOrigin::Loaded(path) => tracing::info!("Loaded config from {}", path.display()),
    }
    tracing::info!("Storage: {} (key '{}')", config.storage_dir.display(), config.storage_key);

    let mut store = AccountStore::new(FileStorage::new(&config.storage_dir))
        .with_storage_key(config.storage_key.clone());
    store.init_store();

    match args.command {
        Some(Command::Export { output }) => export(&store, output),
        Some(Command::Import { file }) => import(&mut store, file),
        Some(Command::Stats) => {
            let stats = store.get_account_stats();
            println!(
                "total: {}\nlocal: {}\nldap: {}\nlabels: {}",
                stats.total, stats.local, stats.ldap, stats.total_labels
            );
            Ok(())
        }
        None => run_tui(App::new(store, config.mask_passwords)),
    }
}

/// Add info-level directives for this binary and the core crate to `base`.
fn default_filter(base: EnvFilter) -> Result<EnvFilter> {
    Ok(base
        .add_directive(concat!(env!("CARGO_CRATE_NAME"), "=info").parse()?)
        .add_directive("acctkeep_core=info".parse()?))
}

fn init_logging(config: &Config) -> Result<()> {
    let filter = default_filter(EnvFilter::from_default_env())?;

    match config.log_file {
        Some(ref path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file: {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr) // Write logs to stderr to not interfere with TUI
                .init();
        }
    }
    Ok(())
}

fn export<S: KeyValueStorage>(store: &AccountStore<S>, output: Option<PathBuf>) -> Result<()> {
    let json = store.export_accounts().context("Failed to export accounts")?;
    match output {
        Some(path) => {
            std::fs::write(&path, json)
                .with_context(|| format!("Failed to write export file: {}", path.display()))?;
            tracing::info!("Exported {} accounts to {}", store.accounts().len(), path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn import<S: KeyValueStorage>(store: &mut AccountStore<S>, file: PathBuf) -> Result<()> {
    let json = std::fs::read_to_string(&file)
        .with_context(|| format!("Failed to read import file: {}", file.display()))?;
    let count = store
        .import_accounts(&json)
        .with_context(|| format!("Failed to import {}", file.display()))?;
    println!("Imported {count} accounts");
    Ok(())
}

fn run_tui<S: KeyValueStorage>(mut app: App<S>) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {e}");
    }

    Ok(())
}

fn run_app<B: Backend, S: KeyValueStorage>(
    terminal: &mut Terminal<B>,
    app: &mut App<S>,
) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if handlers::handle_key(app, key) {
                    break;
                }
            }
        }

        if matches!(app.state, AppState::Quit) {
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl io::Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn default_filter_keeps_info_from_binary_and_core() {
        let buf = SharedBuf::default();
        let writer = buf.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(default_filter(EnvFilter::new("error")).unwrap())
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("binary message");
            tracing::info!(target: "acctkeep_core::store", "core message");
            tracing::info!(target: "some_dependency", "dependency message");
        });

        let output = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("binary message"), "{output}");
        assert!(output.contains("core message"), "{output}");
        assert!(!output.contains("dependency message"), "{output}");
    }
}
