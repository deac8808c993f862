//! airdir - browse airport facilities from the terminal
//!
//! A terminal UI application that lists airports, their facility categories and
//! facilities, backed by an HTTP directory API or a bundled dataset.

use std::io;
use std::panic;
use std::process;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{error, info};

use airdir::app::App;
use airdir::cli::{Cli, StartupConfig};
use airdir::directory::DirectoryClient;
use airdir::{logging, ui};

/// Sets up a panic hook that restores the terminal before printing the panic message.
/// This ensures the terminal is usable even if the application panics.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Attempt to restore the terminal
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        // Call the original panic hook
        original_hook(panic_info);
    }));
}

/// Main event loop: draw, load whatever the current screen is waiting for, then
/// poll for keyboard input with a 100ms timeout
async fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        app.tick();
        terminal.draw(|f| ui::render(f, app))?;

        if app.needs_load() {
            // The loading indicator is on screen; fetch and redraw
            app.load_current().await;
            continue;
        }

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = match StartupConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            // Usage errors exit like clap's own
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    };

    // Keep the guard alive until shutdown so buffered log lines are flushed
    let _log_guard = match logging::init(config.log_dir.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Warning: logging disabled: {}", e);
            None
        }
    };

    let source = config.build_source().map_err(|e| {
        error!(error = %e, "failed to create data source");
        e
    })?;
    let client = DirectoryClient::new(source, config.freshness_window);
    let mut app = App::new(client, config.page_size);

    run_tui(&mut app).await.map_err(|e| {
        error!(error = %e, "terminal error");
        e
    })?;

    info!("exiting");
    Ok(())
}

/// Sets up the terminal, runs the event loop and restores the terminal afterwards
async fn run_tui(app: &mut App) -> io::Result<()> {
    // Set up panic hook to restore terminal on crash
    setup_panic_hook();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, app).await;

    // Restore terminal even if the loop failed
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    result
}
