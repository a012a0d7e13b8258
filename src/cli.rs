//! CLI - Command Line Interface for MovieManager
//!
//! Every TUI action is scriptable. All output is JSON-parseable.
//!
//! # Examples
//!
//! ```bash
//! # Browse the catalog
//! moviemanager movies --json
//! moviemanager show 2
//!
//! # Edit a movie
//! moviemanager update 2 --name "Saw" --series-id 2 --series-number 1
//! moviemanager actor add 2 1
//!
//! # Reference data
//! moviemanager property add studio --name "Lionsgate"
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::path::PathBuf;

use crate::models::PropertyKind;

// =============================================================================
// Exit Codes
// =============================================================================

/// Exit codes for CLI operations (semantic for scripting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// General error
    Error = 1,
    /// Invalid arguments
    InvalidArgs = 2,
    /// Backend unreachable
    NetworkError = 3,
    /// Movie or entry not found
    NotFound = 4,
    /// Rejected by the backend (conflict, validation)
    Rejected = 5,
    /// Confirmation declined
    Cancelled = 6,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> std::process::ExitCode {
        std::process::ExitCode::from(code as u8)
    }
}

// =============================================================================
// Main CLI Structure
// =============================================================================

/// MovieManager - admin client for a movie library backend
///
/// Run without arguments to launch interactive TUI.
/// Use subcommands for scriptable automation.
#[derive(Parser, Debug)]
#[command(
    name = "moviemanager",
    version,
    about = "Admin client for a movie library backend",
    long_about = "Edit movie metadata, link actors and categories, manage \
                  reference data and import new movie files.\n\n\
                  Run without arguments to launch the interactive TUI.\n\
                  Use subcommands for automation and scripting.",
    after_help = "EXAMPLES:\n\
                  moviemanager                              Launch interactive TUI\n\
                  moviemanager movies                       List movie files\n\
                  moviemanager actor add 2 1                Link actor 1 to movie 2\n\
                  moviemanager property list studio --json  List studios"
)]
pub struct Cli {
    /// Output format as JSON (default for non-TTY)
    #[arg(long, short = 'j', global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Backend origin (overrides MOVIES_BACKEND and the config file)
    #[arg(long, short = 'b', global = true)]
    pub backend: Option<String>,

    /// Path to config file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run (omit for TUI mode)
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Check if running in CLI mode (has subcommand)
    pub fn is_cli_mode(&self) -> bool {
        self.command.is_some()
    }

    /// Check if JSON output should be used
    pub fn should_json(&self) -> bool {
        self.json || !std::io::stdout().is_terminal()
    }
}

// =============================================================================
// Subcommands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List movie files
    #[command(visible_alias = "ls")]
    Movies,

    /// Show the full record of a movie
    #[command(visible_alias = "i")]
    Show(ShowCmd),

    /// Scan the backend for new movie files
    Import,

    /// Update name, series and studio of a movie
    Update(UpdateCmd),

    /// Remove a movie from the catalog
    #[command(visible_alias = "rm")]
    Remove(RemoveCmd),

    /// Link or unlink an actor
    Actor(AssociationCmd),

    /// Link or unlink a category
    Category(AssociationCmd),

    /// Manage actors, categories, series and studios
    #[command(visible_alias = "prop")]
    Property(PropertyCmd),

    /// Show or change the color scheme
    Theme(ThemeCmd),
}

/// Show one movie
#[derive(Args, Debug)]
pub struct ShowCmd {
    /// Movie id
    pub id: u64,
}

/// Update a movie; omitted options keep their current values
#[derive(Args, Debug, Default)]
pub struct UpdateCmd {
    /// Movie id
    pub id: u64,

    /// Display name (empty clears it)
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Series id
    #[arg(long, conflicts_with = "clear_series")]
    pub series_id: Option<u64>,

    /// Position within the series
    #[arg(long, conflicts_with = "clear_series_number")]
    pub series_number: Option<i64>,

    /// Studio id
    #[arg(long, conflicts_with = "clear_studio")]
    pub studio_id: Option<u64>,

    /// Unset the series
    #[arg(long)]
    pub clear_series: bool,

    /// Unset the series number
    #[arg(long)]
    pub clear_series_number: bool,

    /// Unset the studio
    #[arg(long)]
    pub clear_studio: bool,
}

/// Remove a movie
#[derive(Args, Debug)]
pub struct RemoveCmd {
    /// Movie id
    pub id: u64,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

// =============================================================================
// Association Commands
// =============================================================================

/// Link or unlink an actor/category
#[derive(Args, Debug)]
pub struct AssociationCmd {
    #[arg(value_enum)]
    pub op: LinkOp,

    /// Movie id
    pub movie_id: u64,

    /// Actor or category id
    pub other_id: u64,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOp {
    /// Create the link
    Add,
    /// Delete the link
    Remove,
}

// =============================================================================
// Property Command
// =============================================================================

/// Manage reference data
#[derive(Args, Debug)]
pub struct PropertyCmd {
    #[arg(value_enum)]
    pub op: PropertyOp,

    /// Entity kind
    #[arg(value_enum)]
    pub kind: KindArg,

    /// Entry id (update, remove)
    #[arg(long)]
    pub id: Option<u64>,

    /// Entry name (add, update)
    #[arg(long, short = 'n')]
    pub name: Option<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyOp {
    List,
    Add,
    Update,
    Remove,
}

/// Reference data kind
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindArg {
    #[value(alias = "actors")]
    Actor,
    #[value(alias = "categories")]
    Category,
    Series,
    #[value(alias = "studios")]
    Studio,
}

impl From<KindArg> for PropertyKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Actor => PropertyKind::Actor,
            KindArg::Category => PropertyKind::Category,
            KindArg::Series => PropertyKind::Series,
            KindArg::Studio => PropertyKind::Studio,
        }
    }
}

// =============================================================================
// Theme Command
// =============================================================================

/// Show or set the theme
#[derive(Args, Debug)]
pub struct ThemeCmd {
    /// New theme; omit to print the current one
    #[arg(value_enum)]
    pub mode: Option<ThemeArg>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeArg {
    Dark,
    Light,
    Toggle,
}

// =============================================================================
// JSON Output Types
// =============================================================================

/// Generic JSON output wrapper with status
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub exit_code: i32,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

impl<T: Serialize> JsonOutput<T> {
    /// Create success output with data
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            exit_code: 0,
        }
    }

    /// Create error output (no data)
    pub fn error_msg(msg: impl Into<String>, code: ExitCode) -> JsonOutput<()> {
        JsonOutput::<()> {
            data: None,
            error: Some(msg.into()),
            exit_code: code.into(),
        }
    }
}

/// Confirmation of a mutation
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusMessage {
    pub status: String,
}

impl StatusMessage {
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
        }
    }
}

// =============================================================================
// Output Helpers
// =============================================================================

/// Output handler for consistent formatting
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

impl Output {
    pub fn new(cli: &Cli) -> Self {
        Self {
            json: cli.should_json(),
            quiet: cli.quiet,
        }
    }

    /// Print success data; `human` renders it for a terminal
    pub fn print<T: Serialize>(
        &self,
        data: T,
        human: impl FnOnce(&T) -> String,
    ) -> anyhow::Result<()> {
        if self.json {
            let output = JsonOutput::success(data);
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("{}", human(&data));
        }
        Ok(())
    }

    /// Print a mutation's status message
    pub fn status(&self, message: impl Into<String>) -> anyhow::Result<()> {
        let message = StatusMessage::new(message);
        if self.json {
            self.print(message, |_| String::new())
        } else {
            if !self.quiet {
                println!("{}", message.status);
            }
            Ok(())
        }
    }

    /// Print error and return exit code
    pub fn error(&self, msg: impl Into<String>, code: ExitCode) -> ExitCode {
        let msg = msg.into();
        if self.json {
            let output = JsonOutput::<()>::error_msg(&msg, code);
            if let Ok(json) = serde_json::to_string_pretty(&output) {
                eprintln!("{}", json);
            }
        } else if !self.quiet {
            eprintln!("Error: {}", msg);
        }
        code
    }

    /// Print info message (suppressed in quiet mode)
    pub fn info(&self, msg: impl std::fmt::Display) {
        if !self.quiet && !self.json {
            eprintln!("{}", msg);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
