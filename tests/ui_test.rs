//! UI tests for MovieManager
//!
//! Renders the real [`App`] into a `TestBackend` and checks what ends up on
//! screen, including key-driven flows against a mocked backend.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use mockito::{Matcher, Server, ServerGuard};
use ratatui::{backend::TestBackend, Terminal};

use moviemanager::api::MovieManagerClient;
use moviemanager::app::{Action, App, AppState, Pane};
use moviemanager::config::Config;
use moviemanager::session::{Session, Transfer};
use moviemanager::store::ThemeMode;
use moviemanager::ui::{self, theme};

// =============================================================================
// Helpers
// =============================================================================

const SAW: &str = r#"{
    "id": 2,
    "filename": "[Twisted] {Saw 1} Saw (Danny Glover).mp4",
    "name": "Saw",
    "actors": [{"id": 5, "name": "Danny Glover"}],
    "categories": [{"id": 1, "name": "Horror"}],
    "series": {"id": 2, "name": "Saw"},
    "series_number": 1,
    "studio": {"id": 5, "name": "Twisted"}
}"#;

async fn backend() -> ServerGuard {
    let mut server = Server::new_async().await;
    let fixtures = [
        ("/movies", r#"[{"id": 1, "filename": "Heat.mkv"}, {"id": 2, "filename": "[Twisted] {Saw 1} Saw (Danny Glover).mp4"}]"#),
        ("/actors", r#"[{"id": 1, "name": "Al Pacino"}, {"id": 5, "name": "Danny Glover"}]"#),
        ("/categories", r#"[{"id": 1, "name": "Horror"}, {"id": 2, "name": "Crime"}]"#),
        ("/series", r#"[{"id": 2, "name": "Saw"}]"#),
        ("/studios", r#"[{"id": 1, "name": "Warner Bros"}, {"id": 5, "name": "Twisted"}]"#),
        ("/movies/2", SAW),
    ];
    for (path, body) in fixtures {
        server
            .mock("GET", path)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await;
    }
    server
}

fn offline_app() -> App {
    App::new(Session::default(), Config::default(), None)
}

async fn loaded_app(server: &ServerGuard) -> App {
    let session = Session::new(MovieManagerClient::new(server.url()));
    let mut app = App::new(session, Config::default(), None);
    app.dispatch(Action::Refresh).await;
    app
}

fn press(app: &mut App, code: KeyCode) -> Option<Action> {
    app.handle_key(KeyEvent::new(code, KeyModifiers::empty()))
}

/// Render the app and return the screen as one string
fn screen(app: &mut App, width: u16, height: u16) -> String {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    terminal.draw(|frame| ui::render(frame, app)).unwrap();
    let buffer = terminal.backend().buffer();
    buffer.content.iter().map(|c| c.symbol()).collect()
}

// =============================================================================
// Layout
// =============================================================================

#[test]
fn test_renders_at_minimum_size() {
    let mut app = offline_app();
    let text = screen(&mut app, 80, 24);
    assert!(text.contains("MOVIEMANAGER"));
    assert!(text.contains("Movies (0)"));
}

#[test]
fn test_renders_at_large_size() {
    let mut app = offline_app();
    let text = screen(&mut app, 200, 50);
    assert!(text.contains("Available Actors"));
    assert!(text.contains("Selected Actors"));
    assert!(text.contains("Categories"));
}

#[test]
fn test_tiny_terminal_does_not_panic() {
    let mut app = offline_app();
    app.set_error("Backend unreachable");
    app.confirm = Some("Really remove a.mp4?".into());
    screen(&mut app, 10, 4);
}

#[test]
fn test_admin_page() {
    let mut app = offline_app();
    app.navigate(AppState::Admin);
    let text = screen(&mut app, 160, 40);
    assert!(text.contains("Click to import movies"));
    assert!(text.contains("Action"));
    assert!(text.contains("Add"));
    assert!(text.contains("Actor"));
}

#[test]
fn test_popups() {
    let mut app = offline_app();
    app.confirm = Some("Really remove Heat.mkv?".into());
    assert!(screen(&mut app, 120, 40).contains("Really remove Heat.mkv?"));

    app.confirm = None;
    app.set_error("Movie not found (404)");
    let text = screen(&mut app, 120, 40);
    assert!(text.contains("ERROR"));
    assert!(text.contains("Movie not found (404)"));
}

#[test]
fn test_theme_background_follows_mode() {
    let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
    let mut app = offline_app();

    app.theme = ThemeMode::Dark;
    terminal.draw(|frame| ui::render(frame, &mut app)).unwrap();
    assert_eq!(terminal.backend().buffer().content[0].bg, theme::DARK.background);

    app.theme = ThemeMode::Light;
    terminal.draw(|frame| ui::render(frame, &mut app)).unwrap();
    assert_eq!(terminal.backend().buffer().content[0].bg, theme::LIGHT.background);
}

// =============================================================================
// Flows
// =============================================================================

#[tokio::test]
async fn test_disabled_until_movie_selected() {
    let server = backend().await;
    let mut app = loaded_app(&server).await;

    let text = screen(&mut app, 160, 40);
    assert!(text.contains("Heat.mkv"));
    assert!(text.contains("Movies (2)"));
    // Movie-dependent panes stay empty
    assert!(!text.contains("Al Pacino"));
    assert!(!text.contains("[x]"));
}

#[tokio::test]
async fn test_select_movie_with_keys() {
    let server = backend().await;
    let mut app = loaded_app(&server).await;

    press(&mut app, KeyCode::Down);
    let action = press(&mut app, KeyCode::Enter);
    assert_eq!(action, Some(Action::SelectMovie(Some(2))));
    app.dispatch(Action::SelectMovie(Some(2))).await;

    let text = screen(&mut app, 160, 40);
    assert!(text.contains("Movie Data: [Twisted] {Saw 1} Saw (Danny Glover).mp4"));
    assert!(text.contains("Twisted"));
    assert!(text.contains("[x] Horror"));
    assert!(text.contains("[ ] Crime"));
    assert!(text.contains("Al Pacino"));

    // Esc in the movie list deselects
    let action = press(&mut app, KeyCode::Esc);
    app.dispatch(action.unwrap()).await;
    assert!(!app.session.enabled());
}

#[tokio::test]
async fn test_add_actor_with_keys() {
    let mut server = backend().await;
    server
        .mock("POST", "/movie_actor")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(SAW.replace(
            r#"[{"id": 5, "name": "Danny Glover"}]"#,
            r#"[{"id": 5, "name": "Danny Glover"}, {"id": 1, "name": "Al Pacino"}]"#,
        ))
        .create_async()
        .await;
    let mut app = loaded_app(&server).await;
    app.dispatch(Action::SelectMovie(Some(2))).await;

    app.focus = Pane::AvailableActors;
    let action = press(&mut app, KeyCode::Enter);
    assert_eq!(action, Some(Action::Transfer(Transfer::Add)));
    app.dispatch(Action::Transfer(Transfer::Add)).await;

    assert_eq!(app.session.selected_actors().len(), 2);
    let text = screen(&mut app, 160, 40);
    assert!(text.contains("Successfully added Al Pacino to Saw"));
}

#[tokio::test]
async fn test_edit_movie_name_with_keys() {
    let mut server = backend().await;
    let update = server
        .mock("PUT", "/movies/2")
        .match_body(Matcher::PartialJsonString(r#"{"name": "Saw!"}"#.to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(SAW)
        .create_async()
        .await;
    let mut app = loaded_app(&server).await;
    app.dispatch(Action::SelectMovie(Some(2))).await;

    app.focus = Pane::MovieData;
    press(&mut app, KeyCode::Enter);
    press(&mut app, KeyCode::End);
    press(&mut app, KeyCode::Char('!'));
    let action = press(&mut app, KeyCode::Enter);
    assert_eq!(action, Some(Action::SubmitMovie));
    app.dispatch(Action::SubmitMovie).await;

    update.assert_async().await;
    assert_eq!(
        app.session.movie_status(),
        Some("Successfully updated movie Saw")
    );
}

#[tokio::test]
async fn test_remove_prompt_with_keys() {
    let server = backend().await;
    let mut app = loaded_app(&server).await;
    app.dispatch(Action::SelectMovie(Some(2))).await;

    app.focus = Pane::MovieData;
    press(&mut app, KeyCode::Char('x'));
    let text = screen(&mut app, 160, 40);
    assert!(text.contains("Really remove"));

    press(&mut app, KeyCode::Esc);
    assert!(app.confirm.is_none());
    assert_eq!(app.session.pending_remove(), None);
}

#[tokio::test]
async fn test_movie_list_keeps_scroll_position() {
    let mut server = Server::new_async().await;
    let listing: Vec<String> = (0..30)
        .map(|i| format!(r#"{{"id": {}, "filename": "movie{:02}.mkv"}}"#, i + 1, i))
        .collect();
    let listing = format!("[{}]", listing.join(","));
    for (path, body) in [
        ("/movies", listing.as_str()),
        ("/actors", "[]"),
        ("/categories", "[]"),
        ("/series", "[]"),
        ("/studios", "[]"),
    ] {
        server
            .mock("GET", path)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await;
    }
    let mut app = loaded_app(&server).await;

    // 80x24 leaves 18 visible rows in the movie list
    for _ in 0..25 {
        press(&mut app, KeyCode::Down);
        screen(&mut app, 80, 24);
    }
    assert_eq!(app.movies.selected, 25);
    assert_eq!(app.movies.offset, 8);

    // Moving up inside the window does not scroll it
    press(&mut app, KeyCode::Up);
    let text = screen(&mut app, 80, 24);
    assert_eq!(app.movies.offset, 8);
    assert!(text.contains("movie08.mkv"));
    assert!(!text.contains("movie07.mkv"));
    assert!(text.contains("movie25.mkv"));
}
