use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, info};

use connect_four::config::{AppConfig, UiConfig};
use connect_four::logging::{self, LogTarget};
use connect_four::replay;
use connect_four::ui::App;

/// Play Connect Four in the terminal.
#[derive(Parser)]
#[command(name = "connect-four", about = "Two-player Connect Four")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "connect-four.toml")]
    config: PathBuf,

    /// Replay 0-based column indices without the UI, e.g. "0,0,1,1,2,2,3"
    #[arg(long)]
    moves: Option<String>,

    /// Log filter, overrides RUST_LOG and the config file
    #[arg(long)]
    log_level: Option<String>,

    /// Print a config file with every default value and exit
    #[arg(long)]
    print_default_config: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.print_default_config {
        print!("{}", AppConfig::default_toml());
        return Ok(());
    }

    let config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    let target = if cli.moves.is_some() {
        LogTarget::Stderr
    } else {
        LogTarget::FileOnly
    };
    logging::init(cli.log_level.as_deref(), &config.log, target)
        .context("setting up logging")?;
    debug!(
        path = %cli.config.display(),
        found = cli.config.exists(),
        "configuration loaded"
    );

    match cli.moves {
        Some(moves) => run_headless(&moves),
        None => run_tui(config.ui).context("running terminal UI"),
    }
}

fn run_headless(moves: &str) -> Result<()> {
    let moves = replay::parse_moves(moves).context("parsing --moves")?;
    info!(count = moves.len(), "replaying moves");

    let report = replay::replay(&moves);
    for step in &report.steps {
        println!("{step}");
    }
    println!();
    print!("{}", report.engine.board());
    println!("{}", report.status());
    Ok(())
}

fn run_tui(config: UiConfig) -> io::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config);
    let res = app.run(&mut terminal);

    // Restore terminal — always runs, even on error
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();

    res
}
