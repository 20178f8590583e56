//! library-staff-tool binary entry point.
//!
//! Reads settings, opens the log file, initializes the terminal in raw mode,
//! runs the TUI event loop, and restores the terminal state on exit.
//!
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::info;
use tracing_subscriber::EnvFilter;

use library_staff_tool::app::{self, AppState, config::LibraryConfig};

#[derive(Parser, Debug)]
#[command(version, about = "Library staff tool: view, borrow, return and add books")]
struct Args {
    /// Settings file; created with defaults if missing
    #[arg(long, default_value = "library.conf", env = "LIBRARY_CONFIG")]
    config: PathBuf,
    /// Catalog file (overrides `books_file`)
    #[arg(long)]
    books: Option<PathBuf>,
    /// Borrower log (overrides `borrowers_file`)
    #[arg(long)]
    borrowers: Option<PathBuf>,
    /// Log output (overrides `log_file`)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Args {
    fn settings(&self) -> LibraryConfig {
        let mut cfg = LibraryConfig::load_or_init(&self.config);
        if let Some(p) = &self.books {
            cfg.books_file = p.clone();
        }
        if let Some(p) = &self.borrowers {
            cfg.borrowers_file = p.clone();
        }
        if let Some(p) = &self.log_file {
            cfg.log_file = p.clone();
        }
        cfg
    }
}

/// Send `tracing` output to `path`; the terminal belongs to the TUI.
fn init_logging(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Program entry point: run the TUI and report any top-level error to stderr.
fn main() -> Result<()> {
    let args = Args::parse();
    let cfg = args.settings();
    init_logging(&cfg.log_file)?;
    info!(books = %cfg.books_file.display(), borrowers = %cfg.borrowers_file.display(), "starting");

    let state = AppState::open(cfg.data_files(), cfg.currency.clone());
    let mut terminal = init_terminal().context("init terminal")?;

    let res = app::run(&mut terminal, state);

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    if let Err(err) = res {
        eprintln!("application error: {err:#}");
    }
    info!("exiting");
    Ok(())
}
