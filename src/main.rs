//! MovieManager - admin client for a movie library backend
//!
//! # Usage
//!
//! ```bash
//! # Launch interactive TUI
//! moviemanager
//!
//! # CLI mode (for automation)
//! moviemanager movies --json
//! moviemanager actor add 2 1
//! moviemanager --backend http://nas:8000 import
//! ```

use std::io::{stdout, Stdout};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use moviemanager::api::MovieManagerClient;
use moviemanager::app::{Action, App};
use moviemanager::cli::{Cli, Command, ExitCode, Output};
use moviemanager::commands;
use moviemanager::config::Config;
use moviemanager::logging;
use moviemanager::session::Session;
use moviemanager::ui;

/// Terminal type alias for convenience
type Tui = Terminal<CrosstermBackend<Stdout>>;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };

    if cli.is_cli_mode() {
        // CLI mode: execute command and exit
        logging::init_cli_logging(&config);
        let exit_code = run_cli(cli, config).await;
        std::process::exit(exit_code.into());
    } else {
        // TUI mode: launch interactive interface
        logging::init_tui_logging(&config);
        let client = MovieManagerClient::new(config.backend_url(cli.backend.as_deref()));
        run_tui(client, config, cli.config).await
    }
}

/// Run CLI command and return exit code
async fn run_cli(cli: Cli, config: Config) -> ExitCode {
    let output = Output::new(&cli);
    let client = MovieManagerClient::new(config.backend_url(cli.backend.as_deref()));
    tracing::debug!(backend = client.base_url(), "cli mode");

    match cli.command {
        Some(Command::Movies) => commands::movies_cmd(client, &output).await,

        Some(Command::Show(cmd)) => commands::show_cmd(cmd, client, &output).await,

        Some(Command::Import) => commands::import_cmd(client, &output).await,

        Some(Command::Update(cmd)) => commands::update_cmd(cmd, client, &output).await,

        Some(Command::Remove(cmd)) => commands::remove_cmd(cmd, client, &output).await,

        Some(Command::Actor(cmd)) => commands::actor_cmd(cmd, client, &output).await,

        Some(Command::Category(cmd)) => commands::category_cmd(cmd, client, &output).await,

        Some(Command::Property(cmd)) => commands::property_cmd(cmd, client, &output).await,

        Some(Command::Theme(cmd)) => commands::theme_cmd(cmd, cli.config.as_deref(), &output),

        None => {
            // This shouldn't happen (handled by is_cli_mode check)
            ExitCode::Success
        }
    }
}

// =============================================================================
// TUI Mode
// =============================================================================

/// Initialize the terminal for TUI mode
fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal to normal state
fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run interactive TUI
async fn run_tui(
    client: MovieManagerClient,
    config: Config,
    config_path: Option<PathBuf>,
) -> Result<()> {
    tracing::info!(backend = client.base_url(), "starting tui");
    let mut terminal = init_terminal()?;

    let mut app = App::new(Session::new(client), config, config_path);

    let result = run_event_loop(&mut terminal, &mut app).await;

    // Always restore terminal, even on error
    restore_terminal(&mut terminal)?;

    result
}

/// Main event loop - handles input, runs backend work, renders UI
async fn run_event_loop(terminal: &mut Tui, app: &mut App) -> Result<()> {
    const TICK_RATE: Duration = Duration::from_millis(100);

    // Initial load of the listing and every catalog
    run_action(terminal, app, Action::Refresh).await?;

    while app.running {
        terminal.draw(|frame| ui::render(frame, app))?;

        if event::poll(TICK_RATE)? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (ignore releases on Windows)
                if key.kind == KeyEventKind::Press {
                    if let Some(action) = app.handle_key(key) {
                        run_action(terminal, app, action).await?;
                    }
                }
            }
        }
    }

    Ok(())
}

/// Show the working indicator, then run one action to completion.
/// Input is not read meanwhile, so actions never overlap.
async fn run_action(terminal: &mut Tui, app: &mut App, action: Action) -> Result<()> {
    app.working = Some(action.label());
    terminal.draw(|frame| ui::render(frame, app))?;
    app.dispatch(action).await;
    app.working = None;
    Ok(())
}
