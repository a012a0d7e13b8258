//! MovieManager - admin client for a movie library backend
//!
//! Browse movie files, edit their metadata, link actors and categories,
//! maintain reference data and import new files. Runs as a TUI or as a
//! scriptable CLI over the same session logic.
//!
//! # Modules
//!
//! - `models` - Wire types for movies and reference data
//! - `api` - REST client and error decoding
//! - `cache` - Query cache with tag invalidation
//! - `store` - Selection and theme state
//! - `forms` - Form state and local validation
//! - `session` - User operations: mutate, report, refetch
//! - `app` / `ui` - Interactive interface
//! - `cli` / `commands` - Scriptable interface

pub mod api;
pub mod app;
pub mod cache;
pub mod cli;
pub mod commands;
pub mod config;
pub mod forms;
pub mod logging;
pub mod models;
pub mod session;
pub mod store;
pub mod ui;

// Re-export commonly used types
pub use models::{Movie, MovieFile, MovieUpdate, Property, PropertyKind};

pub use api::{ApiError, MovieManagerClient};
pub use app::{App, AppState};
pub use session::{Outcome, Session};
pub use store::{SelectionState, ThemeMode};
