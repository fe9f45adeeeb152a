use auctioneer::session::Session;
use auctioneer::tui::{app::AppState, controller};
use clap::Parser;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use ratatui::prelude::*;
use std::fs::File;
use std::io::{self, IsTerminal, Stdout};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Run an auction from the terminal.
#[derive(Debug, Parser)]
#[command(name = "auctioneer", version, about)]
struct Cli {
    /// Game state file; loaded at start if present, written on /save and on quit.
    #[arg(long)]
    state: Option<PathBuf>,

    /// Seed for item shuffles.
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs here (filter with RUST_LOG); the terminal itself is reserved for the UI.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// UI poll interval in milliseconds.
    #[arg(long, default_value_t = 250)]
    tick_ms: u64,
}

fn init_logging(path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn open_session(cli: &Cli) -> Session {
    let seed = cli.seed.unwrap_or_else(rand::random);
    let Some(path) = cli.state.as_deref().filter(|p| p.exists()) else {
        return Session::with_seed(seed);
    };
    match Session::load(path, seed) {
        Ok(session) => {
            info!(path = %path.display(), "restored saved game");
            session
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "ignoring unreadable state file");
            Session::with_seed(seed)
        }
    }
}

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    crossterm::execute!(terminal.backend_mut(), crossterm::terminal::LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }
    if !io::stdout().is_terminal() {
        println!(
            "auctioneer requires a real terminal (TTY).\nRun it in a terminal and press Esc to quit. Version: {}",
            auctioneer::VERSION
        );
        return Ok(());
    }

    let mut app = AppState::new(open_session(&cli), cli.state.clone());
    let mut terminal = setup_terminal()?;
    let res = controller::run(&mut terminal, &mut app, Duration::from_millis(cli.tick_ms));

    // Always attempt to restore terminal
    restore_terminal(terminal)?;
    if app.state_path().is_some() {
        app.save();
        if let Some(notice) = app.notice() {
            println!("{notice}");
        }
    }
    res
}
