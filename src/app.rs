//! App state and core application logic
//!
//! Manages pages, pane focus, per-pane cursors and text editing, and turns
//! key presses into [`Action`]s that run against the [`Session`].

use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::api::ApiError;
use crate::config::Config;
use crate::forms::{PropertyAction, TextInput};
use crate::models::{Property, PropertyKind};
use crate::session::{Outcome, Session, Transfer};
use crate::store::ThemeMode;

// =============================================================================
// App State Enum
// =============================================================================

/// Page currently shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppState {
    /// Movie list, movie data, actors and categories
    #[default]
    Main,
    /// Reference data and import
    Admin,
}

/// Focusable pane
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Movies,
    MovieData,
    AvailableActors,
    SelectedActors,
    Categories,
    PropertyForm,
    Import,
}

impl AppState {
    /// Panes of this page in Tab order
    pub fn panes(self) -> &'static [Pane] {
        match self {
            AppState::Main => &[
                Pane::Movies,
                Pane::MovieData,
                Pane::AvailableActors,
                Pane::SelectedActors,
                Pane::Categories,
            ],
            AppState::Admin => &[Pane::PropertyForm, Pane::Import],
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            AppState::Main => "Main",
            AppState::Admin => "Admin",
        }
    }
}

/// Field of the movie data form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MovieField {
    #[default]
    Name,
    Studio,
    Series,
    SeriesNumber,
}

impl MovieField {
    pub const ALL: [MovieField; 4] = [
        MovieField::Name,
        MovieField::Studio,
        MovieField::Series,
        MovieField::SeriesNumber,
    ];
}

/// Field of the property form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PropertyField {
    #[default]
    Action,
    Kind,
    Entry,
    Name,
}

impl PropertyField {
    pub const ALL: [PropertyField; 4] = [
        PropertyField::Action,
        PropertyField::Kind,
        PropertyField::Entry,
        PropertyField::Name,
    ];

    /// Entry is only shown for update/remove, name only for add/update
    pub fn visible_for(self, action: PropertyAction) -> bool {
        match self {
            PropertyField::Entry => action.needs_selection(),
            PropertyField::Name => action.needs_name(),
            _ => true,
        }
    }
}

fn step<T: Copy + PartialEq>(all: &[T], current: T, forward: bool) -> T {
    let idx = all.iter().position(|x| *x == current).unwrap_or(0);
    let next = if forward {
        (idx + 1) % all.len()
    } else {
        (idx + all.len() - 1) % all.len()
    };
    all[next]
}

/// Next value of a "None or catalog entry" picker
fn cycle_option(current: Option<u64>, options: &[Property], forward: bool) -> Option<u64> {
    let mut ids: Vec<Option<u64>> = vec![None];
    ids.extend(options.iter().map(|p| Some(p.id)));
    step(&ids, current, forward)
}

// =============================================================================
// Input Mode
// =============================================================================

/// Current input mode for keyboard handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Normal navigation mode
    #[default]
    Normal,
    /// Text input mode
    Editing,
}

// =============================================================================
// Selection State (per-view)
// =============================================================================

/// Cursor state for list views
#[derive(Debug, Clone, Default)]
pub struct ListState {
    /// Index under the cursor
    pub selected: usize,
    /// Scroll offset for viewport
    pub offset: usize,
    /// Total number of items
    pub len: usize,
}

impl ListState {
    pub fn new(len: usize) -> Self {
        Self {
            selected: 0,
            offset: 0,
            len,
        }
    }

    pub fn up(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            if self.selected < self.offset {
                self.offset = self.selected;
            }
        }
    }

    pub fn down(&mut self) {
        if self.len > 0 && self.selected < self.len - 1 {
            self.selected += 1;
        }
    }

    pub fn page_up(&mut self, page_size: usize) {
        self.selected = self.selected.saturating_sub(page_size);
        if self.selected < self.offset {
            self.offset = self.selected;
        }
    }

    pub fn page_down(&mut self, page_size: usize) {
        if self.len > 0 {
            self.selected = (self.selected + page_size).min(self.len - 1);
        }
    }

    pub fn first(&mut self) {
        self.selected = 0;
        self.offset = 0;
    }

    pub fn last(&mut self) {
        if self.len > 0 {
            self.selected = self.len - 1;
        }
    }

    /// Update offset to keep selected item visible
    pub fn scroll_into_view(&mut self, visible_height: usize) {
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if visible_height > 0 && self.selected >= self.offset + visible_height {
            self.offset = self.selected - visible_height + 1;
        }
    }

    pub fn reset(&mut self) {
        self.selected = 0;
        self.offset = 0;
    }

    /// Update length (e.g., after a refetch)
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        if len == 0 {
            self.selected = 0;
            self.offset = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    /// Handle a navigation key; returns whether it was one
    pub fn handle_nav(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Up | KeyCode::Char('k') => self.up(),
            KeyCode::Down | KeyCode::Char('j') => self.down(),
            KeyCode::PageUp => self.page_up(10),
            KeyCode::PageDown => self.page_down(10),
            KeyCode::Home => self.first(),
            KeyCode::End => self.last(),
            _ => return false,
        }
        true
    }
}

// =============================================================================
// Actions
// =============================================================================

/// Work that needs the backend; produced by key handling, run by
/// [`App::dispatch`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Refresh,
    SelectMovie(Option<u64>),
    Transfer(Transfer),
    ToggleCategory(u64),
    SubmitMovie,
    ConfirmRemove,
    SetPropertyKind(PropertyKind),
    SubmitProperty,
    Import,
}

impl Action {
    /// Shown while the action is in flight
    pub fn label(self) -> &'static str {
        match self {
            Action::Refresh => "Refreshing...",
            Action::SelectMovie(_) => "Loading movie...",
            Action::Transfer(_) => "Updating actors...",
            Action::ToggleCategory(_) => "Updating categories...",
            Action::SubmitMovie => "Saving movie...",
            Action::ConfirmRemove => "Removing movie...",
            Action::SetPropertyKind(_) => "Loading...",
            Action::SubmitProperty => "Saving...",
            Action::Import => "Importing movies...",
        }
    }
}

// =============================================================================
// Main Application State
// =============================================================================

#[derive(Debug)]
pub struct App {
    /// Current page
    pub state: AppState,
    pub focus: Pane,
    /// Whether the app is running
    pub running: bool,
    pub input_mode: InputMode,
    /// Error popup for failed loads
    pub error: Option<String>,
    /// Removal prompt awaiting y/n
    pub confirm: Option<String>,
    /// Label of the action in flight
    pub working: Option<&'static str>,

    pub session: Session,
    pub theme: ThemeMode,
    config: Config,
    config_path: Option<PathBuf>,

    // Cursors
    pub movies: ListState,
    pub available: ListState,
    pub selected: ListState,
    pub categories: ListState,
    pub movie_field: MovieField,
    pub property_field: PropertyField,
}

impl App {
    pub fn new(session: Session, config: Config, config_path: Option<PathBuf>) -> Self {
        Self {
            state: AppState::Main,
            focus: Pane::Movies,
            running: true,
            input_mode: InputMode::Normal,
            error: None,
            confirm: None,
            working: None,
            session,
            theme: config.theme,
            config,
            config_path,
            movies: ListState::default(),
            available: ListState::default(),
            selected: ListState::default(),
            categories: ListState::default(),
            movie_field: MovieField::default(),
            property_field: PropertyField::default(),
        }
    }

    /// Switch page; focus moves to its first pane
    pub fn navigate(&mut self, state: AppState) {
        if self.state != state {
            self.state = state;
            self.focus = state.panes()[0];
        }
        self.input_mode = InputMode::Normal;
    }

    /// Move focus to the next/previous pane of the page
    pub fn cycle_focus(&mut self, forward: bool) {
        self.focus = step(self.state.panes(), self.focus, forward);
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.error = Some(msg.into());
    }

    fn report(&mut self, error: ApiError) {
        tracing::warn!(error = %error, "load failed");
        self.set_error(error.to_string());
    }

    /// Flip the color scheme and persist it
    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        self.config.theme = self.theme;
        let saved = match &self.config_path {
            Some(path) => self.config.save_to(path),
            None => self.config.save(),
        };
        if let Err(e) = saved {
            tracing::warn!(error = %e, "could not persist theme");
        }
    }

    /// Clamp every cursor to the current data
    pub fn sync_lists(&mut self) {
        self.movies.set_len(self.session.movies().len());
        self.available
            .set_len(self.session.catalog(PropertyKind::Actor).len());
        self.selected.set_len(self.session.selected_actors().len());
        self.categories
            .set_len(self.session.catalog(PropertyKind::Category).len());
    }

    fn cursor_movie_id(&self) -> Option<u64> {
        self.session.movies().get(self.movies.selected).map(|m| m.id)
    }

    fn cursor_available_id(&self) -> Option<u64> {
        self.session
            .catalog(PropertyKind::Actor)
            .get(self.available.selected)
            .map(|a| a.id)
    }

    fn cursor_selected_id(&self) -> Option<u64> {
        self.session
            .selected_actors()
            .get(self.selected.selected)
            .map(|a| a.id)
    }

    fn cursor_category_id(&self) -> Option<u64> {
        self.session
            .catalog(PropertyKind::Category)
            .get(self.categories.selected)
            .map(|c| c.id)
    }

    /// Text field currently being edited
    fn editing_input(&mut self) -> Option<&mut TextInput> {
        match (self.focus, self.movie_field, self.property_field) {
            (Pane::MovieData, MovieField::Name, _) => Some(&mut self.session.movie_form_mut().name),
            (Pane::MovieData, MovieField::SeriesNumber, _) => {
                Some(&mut self.session.movie_form_mut().series_number)
            }
            (Pane::PropertyForm, _, PropertyField::Name) => {
                Some(&mut self.session.property_form_mut().name)
            }
            _ => None,
        }
    }

    // -------------------------------------------------------------------------
    // Action Dispatch
    // -------------------------------------------------------------------------

    /// Run an action against the backend
    pub async fn dispatch(&mut self, action: Action) {
        tracing::debug!(?action, "dispatch");
        match action {
            Action::Refresh => {
                if let Err(e) = self.session.refresh().await {
                    self.report(e);
                }
            }
            Action::SelectMovie(id) => {
                if let Err(e) = self.session.select_movie(id).await {
                    self.report(e);
                }
                self.available.reset();
                self.selected.reset();
                self.categories.reset();
            }
            Action::Transfer(transfer) => {
                self.session.transfer_actor(transfer).await;
            }
            Action::ToggleCategory(id) => {
                self.session.toggle_category(id).await;
            }
            Action::SubmitMovie => {
                self.session.submit_movie_form().await;
            }
            Action::ConfirmRemove => {
                if let Outcome::Succeeded = self.session.confirm_remove().await {
                    self.focus = Pane::Movies;
                }
            }
            Action::SetPropertyKind(kind) => {
                if let Err(e) = self.session.set_property_kind(kind).await {
                    self.report(e);
                }
            }
            Action::SubmitProperty => {
                self.session.submit_property_form().await;
            }
            Action::Import => {
                self.session.import_movies().await;
            }
        }
        self.sync_lists();
    }

    // -------------------------------------------------------------------------
    // Keyboard Event Handling
    // -------------------------------------------------------------------------

    /// Handle keyboard event; returns the backend work it triggers
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        // Clear error on any keypress
        self.error = None;

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit();
            return None;
        }

        if self.confirm.is_some() {
            return self.handle_confirm_key(key);
        }

        if self.input_mode == InputMode::Editing {
            self.handle_editing_key(key)
        } else {
            self.handle_normal_key(key)
        }
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                self.confirm = None;
                Some(Action::ConfirmRemove)
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.confirm = None;
                self.session.cancel_remove();
                None
            }
            _ => None,
        }
    }

    fn handle_editing_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                return None;
            }
            KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
                return match self.focus {
                    Pane::MovieData => Some(Action::SubmitMovie),
                    Pane::PropertyForm => Some(Action::SubmitProperty),
                    _ => None,
                };
            }
            _ => {}
        }

        let Some(input) = self.editing_input() else {
            self.input_mode = InputMode::Normal;
            return None;
        };
        match key.code {
            KeyCode::Char(c) => input.insert(c),
            KeyCode::Backspace => input.backspace(),
            KeyCode::Delete => input.delete(),
            KeyCode::Left => input.cursor_left(),
            KeyCode::Right => input.cursor_right(),
            KeyCode::Home => input.cursor_home(),
            KeyCode::End => input.cursor_end(),
            _ => {}
        }
        None
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> Option<Action> {
        // Global shortcuts
        match key.code {
            KeyCode::Char('q') => {
                self.quit();
                return None;
            }
            KeyCode::Tab => {
                self.cycle_focus(true);
                return None;
            }
            KeyCode::BackTab => {
                self.cycle_focus(false);
                return None;
            }
            KeyCode::Char('1') | KeyCode::F(1) => {
                self.navigate(AppState::Main);
                return None;
            }
            KeyCode::Char('2') | KeyCode::F(2) => {
                self.navigate(AppState::Admin);
                return None;
            }
            KeyCode::Char('t') => {
                self.toggle_theme();
                return None;
            }
            KeyCode::Char('r') => return Some(Action::Refresh),
            _ => {}
        }

        match self.focus {
            Pane::Movies => self.handle_movies_key(key),
            Pane::MovieData => self.handle_movie_data_key(key),
            Pane::AvailableActors => self.handle_available_key(key),
            Pane::SelectedActors => self.handle_selected_key(key),
            Pane::Categories => self.handle_categories_key(key),
            Pane::PropertyForm => self.handle_property_key(key),
            Pane::Import => match key.code {
                KeyCode::Enter | KeyCode::Char('i') => Some(Action::Import),
                _ => None,
            },
        }
    }

    fn handle_movies_key(&mut self, key: KeyEvent) -> Option<Action> {
        if self.movies.handle_nav(key.code) {
            return None;
        }
        match key.code {
            KeyCode::Enter => self
                .cursor_movie_id()
                .map(|id| Action::SelectMovie(Some(id))),
            KeyCode::Esc if self.session.selection().has_movie() => {
                Some(Action::SelectMovie(None))
            }
            _ => None,
        }
    }

    fn handle_movie_data_key(&mut self, key: KeyEvent) -> Option<Action> {
        if !self.session.enabled() {
            return None;
        }
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.movie_field = step(&MovieField::ALL, self.movie_field, false);
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.movie_field = step(&MovieField::ALL, self.movie_field, true);
                None
            }
            KeyCode::Left | KeyCode::Right => {
                let forward = key.code == KeyCode::Right;
                let studios = self.session.catalog(PropertyKind::Studio).to_vec();
                let series = self.session.catalog(PropertyKind::Series).to_vec();
                let form = self.session.movie_form_mut();
                match self.movie_field {
                    MovieField::Studio => {
                        form.studio_id = cycle_option(form.studio_id, &studios, forward)
                    }
                    MovieField::Series => {
                        form.series_id = cycle_option(form.series_id, &series, forward)
                    }
                    _ => {}
                }
                None
            }
            KeyCode::Enter => match self.movie_field {
                MovieField::Name | MovieField::SeriesNumber => {
                    self.input_mode = InputMode::Editing;
                    None
                }
                _ => Some(Action::SubmitMovie),
            },
            KeyCode::Char('s') => Some(Action::SubmitMovie),
            KeyCode::Char('x') | KeyCode::Delete => {
                self.confirm = self.session.request_remove();
                None
            }
            _ => None,
        }
    }

    fn handle_available_key(&mut self, key: KeyEvent) -> Option<Action> {
        if !self.session.enabled() {
            return None;
        }
        if self.available.handle_nav(key.code) {
            if let Some(id) = self.cursor_available_id() {
                self.session.highlight_available(id);
            }
            return None;
        }
        match key.code {
            KeyCode::Enter | KeyCode::Char('a') => {
                let id = self.cursor_available_id()?;
                self.session.highlight_available(id);
                Some(Action::Transfer(Transfer::Add))
            }
            _ => None,
        }
    }

    fn handle_selected_key(&mut self, key: KeyEvent) -> Option<Action> {
        if !self.session.enabled() {
            return None;
        }
        if self.selected.handle_nav(key.code) {
            if let Some(id) = self.cursor_selected_id() {
                self.session.highlight_selected(id);
            }
            return None;
        }
        match key.code {
            KeyCode::Enter | KeyCode::Char('d') => {
                let id = self.cursor_selected_id()?;
                self.session.highlight_selected(id);
                Some(Action::Transfer(Transfer::Remove))
            }
            _ => None,
        }
    }

    fn handle_categories_key(&mut self, key: KeyEvent) -> Option<Action> {
        if !self.session.enabled() {
            return None;
        }
        if self.categories.handle_nav(key.code) {
            return None;
        }
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.cursor_category_id().map(Action::ToggleCategory)
            }
            _ => None,
        }
    }

    /// Move between property form fields, skipping the ones the current
    /// action hides
    fn step_property_field(&mut self, forward: bool) {
        let action = self.session.property_form().action;
        let mut field = self.property_field;
        loop {
            field = step(&PropertyField::ALL, field, forward);
            if field.visible_for(action) {
                break;
            }
        }
        self.property_field = field;
    }

    fn handle_property_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.step_property_field(false);
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.step_property_field(true);
                None
            }
            KeyCode::Left | KeyCode::Right => {
                let forward = key.code == KeyCode::Right;
                let form = self.session.property_form();
                match self.property_field {
                    PropertyField::Action => {
                        let action = if forward {
                            form.action.next()
                        } else {
                            form.action.prev()
                        };
                        self.session.property_form_mut().set_action(action);
                        None
                    }
                    PropertyField::Kind => {
                        let kind = if forward {
                            form.kind.next()
                        } else {
                            form.kind.prev()
                        };
                        Some(Action::SetPropertyKind(kind))
                    }
                    PropertyField::Entry => {
                        let catalog = self.session.catalog(form.kind);
                        let next = cycle_option(form.selection, catalog, forward);
                        self.session.select_property(next);
                        None
                    }
                    PropertyField::Name => None,
                }
            }
            KeyCode::Enter => {
                if self.property_field == PropertyField::Name
                    && self.session.property_form().action != PropertyAction::Remove
                {
                    self.input_mode = InputMode::Editing;
                    None
                } else {
                    Some(Action::SubmitProperty)
                }
            }
            KeyCode::Char('s') => Some(Action::SubmitProperty),
            _ => None,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
