//! CLI Command Handlers
//!
//! Implements all CLI commands on top of the same [`Session`] the TUI uses,
//! so status messages read the same in both modes.
//! Each handler takes CLI args and Output, returns ExitCode.

use std::io::{BufRead, IsTerminal, Write};
use std::path::Path;

use crate::api::{ApiError, MovieManagerClient};
use crate::cli::{
    AssociationCmd, ExitCode, LinkOp, Output, PropertyCmd, PropertyOp, RemoveCmd, ShowCmd,
    ThemeArg, ThemeCmd, UpdateCmd,
};
use crate::config::Config;
use crate::forms::{PropertyAction, FIELD_NAME};
use crate::models::{property_name, Movie, MovieFile, Property, PropertyKind};
use crate::session::{Outcome, Session, Transfer};
use crate::store::ThemeMode;

/// Exit code for a failed backend call
pub fn exit_code_for(error: &ApiError) -> ExitCode {
    match error {
        ApiError::RequestFailed(e) if e.status().is_none() => ExitCode::NetworkError,
        ApiError::Server { status: 404, .. } => ExitCode::NotFound,
        ApiError::Validation(_) | ApiError::Server { .. } => ExitCode::Rejected,
        _ => ExitCode::Error,
    }
}

/// Human-readable text for a failed backend call
fn failure_text(error: &ApiError) -> String {
    match error {
        ApiError::Server { .. } => error
            .status_message()
            .unwrap_or_else(|| error.to_string()),
        _ => error.to_string(),
    }
}

/// Report a finished operation using the status slot it wrote to
fn finish(outcome: Outcome, status: Option<&str>, output: &Output) -> ExitCode {
    match outcome {
        Outcome::Succeeded => match output.status(status.unwrap_or_default()) {
            Ok(()) => ExitCode::Success,
            Err(e) => output.error(format!("Failed to serialize: {}", e), ExitCode::Error),
        },
        Outcome::Failed(e) => output.error(failure_text(&e), exit_code_for(&e)),
        Outcome::Skipped => output.error(
            status.unwrap_or("Nothing to do"),
            ExitCode::InvalidArgs,
        ),
    }
}

fn format_movies(movies: &[MovieFile]) -> String {
    if movies.is_empty() {
        return "No movies".to_string();
    }
    movies
        .iter()
        .map(|m| m.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_properties(entries: &[Property]) -> String {
    entries
        .iter()
        .map(|p| format!("#{} {}", p.id, p.name))
        .collect::<Vec<_>>()
        .join("\n")
}

// =============================================================================
// Movie Commands
// =============================================================================

pub async fn movies_cmd(client: MovieManagerClient, output: &Output) -> ExitCode {
    match client.movies().await {
        Ok(movies) => {
            if let Err(e) = output.print(movies, |m| format_movies(m)) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        Err(e) => output.error(failure_text(&e), exit_code_for(&e)),
    }
}

pub async fn show_cmd(cmd: ShowCmd, client: MovieManagerClient, output: &Output) -> ExitCode {
    match client.movie(cmd.id).await {
        Ok(movie) => {
            let human = |m: &Movie| {
                let mut lines = vec![
                    m.to_string(),
                    format!("File:       {}", m.filename),
                ];
                let actors: Vec<&str> = m.actors.iter().map(|a| a.name.as_str()).collect();
                let categories: Vec<&str> = m.categories.iter().map(|c| c.name.as_str()).collect();
                lines.push(format!("Actors:     {}", actors.join(", ")));
                lines.push(format!("Categories: {}", categories.join(", ")));
                lines.join("\n")
            };
            if let Err(e) = output.print(movie, human) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        Err(e) => output.error(failure_text(&e), exit_code_for(&e)),
    }
}

pub async fn import_cmd(client: MovieManagerClient, output: &Output) -> ExitCode {
    let mut session = Session::new(client);
    output.info("Scanning for new movie files...");
    let outcome = session.import_movies().await;
    finish(outcome, Some(session.import_status()), output)
}

pub async fn update_cmd(cmd: UpdateCmd, client: MovieManagerClient, output: &Output) -> ExitCode {
    let mut session = Session::new(client);
    if let Err(e) = session.select_movie(Some(cmd.id)).await {
        return output.error(failure_text(&e), exit_code_for(&e));
    }

    // The form holds the server values; only the passed options change it
    let form = session.movie_form_mut();
    if let Some(name) = cmd.name {
        form.name.set(name);
    }
    if cmd.clear_series {
        form.series_id = None;
    } else if let Some(id) = cmd.series_id {
        form.series_id = Some(id);
    }
    if cmd.clear_series_number {
        form.series_number.clear();
    } else if let Some(number) = cmd.series_number {
        form.series_number.set(number.to_string());
    }
    if cmd.clear_studio {
        form.studio_id = None;
    } else if let Some(id) = cmd.studio_id {
        form.studio_id = Some(id);
    }

    let outcome = session.submit_movie_form().await;
    for (field, message) in session.movie_form().errors.iter() {
        output.info(format!("{}: {}", field, message));
    }
    finish(outcome, session.movie_status(), output)
}

pub async fn remove_cmd(cmd: RemoveCmd, client: MovieManagerClient, output: &Output) -> ExitCode {
    let mut session = Session::new(client);
    if let Err(e) = session.select_movie(Some(cmd.id)).await {
        return output.error(failure_text(&e), exit_code_for(&e));
    }
    let Some(prompt) = session.request_remove() else {
        return output.error(format!("Movie {} not found", cmd.id), ExitCode::NotFound);
    };

    if !cmd.yes && !confirm(&prompt) {
        session.cancel_remove();
        return output.error("Cancelled", ExitCode::Cancelled);
    }

    let outcome = session.confirm_remove().await;
    finish(outcome, session.movie_status(), output)
}

/// Ask on the terminal; anything but y/yes declines
fn confirm(prompt: &str) -> bool {
    if !std::io::stdin().is_terminal() {
        return false;
    }
    eprint!("{} [y/N] ", prompt);
    let _ = std::io::stderr().flush();
    let mut answer = String::new();
    if std::io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

// =============================================================================
// Association Commands
// =============================================================================

pub async fn actor_cmd(
    cmd: AssociationCmd,
    client: MovieManagerClient,
    output: &Output,
) -> ExitCode {
    let mut session = Session::new(client);
    if let Err(e) = session.select_movie(Some(cmd.movie_id)).await {
        return output.error(failure_text(&e), exit_code_for(&e));
    }
    if let Err(e) = session.load_catalog(PropertyKind::Actor).await {
        tracing::warn!(error = %e, "actor catalog unavailable");
    }

    let transfer = match cmd.op {
        LinkOp::Add => {
            session.highlight_available(cmd.other_id);
            Transfer::Add
        }
        LinkOp::Remove => {
            session.highlight_selected(cmd.other_id);
            Transfer::Remove
        }
    };
    let outcome = session.transfer_actor(transfer).await;
    finish(outcome, session.actor_status(), output)
}

pub async fn category_cmd(
    cmd: AssociationCmd,
    client: MovieManagerClient,
    output: &Output,
) -> ExitCode {
    let mut session = Session::new(client);
    if let Err(e) = session.select_movie(Some(cmd.movie_id)).await {
        return output.error(failure_text(&e), exit_code_for(&e));
    }
    if let Err(e) = session.load_catalog(PropertyKind::Category).await {
        tracing::warn!(error = %e, "category catalog unavailable");
    }

    let outcome = session
        .set_category(cmd.other_id, cmd.op == LinkOp::Add)
        .await;
    finish(outcome, session.category_status(), output)
}

// =============================================================================
// Property Command
// =============================================================================

pub async fn property_cmd(
    cmd: PropertyCmd,
    client: MovieManagerClient,
    output: &Output,
) -> ExitCode {
    let kind = PropertyKind::from(cmd.kind);

    if cmd.op == PropertyOp::List {
        return match client.properties(kind).await {
            Ok(entries) => {
                if let Err(e) = output.print(entries, |p| format_properties(p)) {
                    return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
                }
                ExitCode::Success
            }
            Err(e) => output.error(failure_text(&e), exit_code_for(&e)),
        };
    }

    let mut session = Session::new(client);
    if let Err(e) = session.set_property_kind(kind).await {
        return output.error(failure_text(&e), exit_code_for(&e));
    }

    let action = match cmd.op {
        PropertyOp::Update => PropertyAction::Update,
        PropertyOp::Remove => PropertyAction::Remove,
        _ => PropertyAction::Add,
    };
    session.property_form_mut().set_action(action);
    if action.needs_selection() {
        if let Some(id) = cmd.id {
            if property_name(session.catalog(kind), id).is_none() {
                return output.error(
                    format!("{} {} not found", kind.title(), id),
                    ExitCode::NotFound,
                );
            }
        }
        session.select_property(cmd.id);
    }
    if let Some(name) = cmd.name {
        session.property_form_mut().name.set(name);
    }

    let outcome = session.submit_property_form().await;
    if matches!(outcome, Outcome::Skipped) {
        if let Some(message) = session.property_form().errors.get(FIELD_NAME) {
            return output.error(message, ExitCode::InvalidArgs);
        }
    }
    finish(outcome, session.property_status(), output)
}

// =============================================================================
// Theme Command
// =============================================================================

pub fn theme_cmd(cmd: ThemeCmd, config_path: Option<&Path>, output: &Output) -> ExitCode {
    let mut config = match config_path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };

    let Some(mode) = cmd.mode else {
        return match output.print(config.theme, |t| t.to_string()) {
            Ok(()) => ExitCode::Success,
            Err(e) => output.error(format!("Failed to serialize: {}", e), ExitCode::Error),
        };
    };

    config.theme = match mode {
        ThemeArg::Dark => ThemeMode::Dark,
        ThemeArg::Light => ThemeMode::Light,
        ThemeArg::Toggle => config.theme.toggled(),
    };
    let saved = match config_path {
        Some(path) => config.save_to(path),
        None => config.save(),
    };
    if let Err(e) = saved {
        return output.error(format!("Failed to save config: {:#}", e), ExitCode::Error);
    }

    match output.status(format!("Theme set to {}", config.theme)) {
        Ok(()) => ExitCode::Success,
        Err(e) => output.error(format!("Failed to serialize: {}", e), ExitCode::Error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_mapping() {
        let not_found = ApiError::Server {
            status: 404,
            message: Some("Movie not found".into()),
        };
        assert_eq!(exit_code_for(&not_found), ExitCode::NotFound);

        let conflict = ApiError::Server {
            status: 409,
            message: None,
        };
        assert_eq!(exit_code_for(&conflict), ExitCode::Rejected);
        assert_eq!(exit_code_for(&ApiError::Validation(Vec::new())), ExitCode::Rejected);
        assert_eq!(
            exit_code_for(&ApiError::InvalidResponse("bad".into())),
            ExitCode::Error
        );
    }

    #[test]
    fn test_failure_text_uses_server_message() {
        let err = ApiError::Server {
            status: 409,
            message: Some("Actor already linked".into()),
        };
        assert_eq!(failure_text(&err), "Actor already linked");

        let err = ApiError::Server {
            status: 500,
            message: None,
        };
        assert_eq!(failure_text(&err), crate::api::UNKNOWN_SERVER_ERROR);
    }

    #[test]
    fn test_format_movies() {
        assert_eq!(format_movies(&[]), "No movies");
        let movies = vec![
            MovieFile { id: 1, filename: "a.mp4".into() },
            MovieFile { id: 2, filename: "b.mkv".into() },
        ];
        assert_eq!(format_movies(&movies), "#1 a.mp4\n#2 b.mkv");
    }
}
