//! Vivian TUI Entry Point
//!
//! Puts Vivian on a full-screen terminal stage.
//!
//! ```bash
//! vivian-tui
//! vivian-tui --config ~/vivian.toml
//! VIVIAN_LOG=/tmp/vivian.log RUST_LOG=debug vivian-tui
//! ```

use std::io::{self, IsTerminal};
use std::panic;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{error, info};

use animator_core::AnimatorConfig;
use vivian_tui::cli::Args;
use vivian_tui::logging::{init_logging, log_path};
use vivian_tui::App;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_file = log_path(|key| std::env::var(key).ok());
    init_logging(&log_file)
        .with_context(|| format!("cannot open log file {}", log_file.display()))?;

    // Raw mode and the alternate screen need a real terminal on both ends
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        anyhow::bail!("vivian-tui needs an interactive terminal on stdin and stdout");
    }

    // Load configuration and decode every frame before touching the terminal,
    // so errors print normally
    let config = AnimatorConfig::discover(args.config.as_deref())
        .context("cannot load configuration")?;
    let size = crossterm::terminal::size()?;
    let mut app = App::new(&config, size).context("cannot load animation frames")?;
    info!(cols = size.0, rows = size.1, log = %log_file.display(), "Starting");

    // A panic must leave the shell usable
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        default_hook(panic_info);
    }));

    // Hand the screen to the stage
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = app.run(&mut terminal).await;

    // Give the screen back
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        error!(error = %e, "Exited with error");
    }

    result
}
