//! Main page: movie list, movie data form, actor lists and categories
//!
//! Everything right of the movie list is disabled until a movie's detail
//! has been loaded.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
    Frame,
};

use super::{input_spans, pane_block, picker_spans, status_line, visible_offset, Theme};
use crate::app::{App, InputMode, ListState, MovieField, Pane};
use crate::forms::{FIELD_NAME, FIELD_SERIES_NUMBER};
use crate::models::{property_name, Property, PropertyKind};
use crate::session::StatusSlot;

pub fn render(frame: &mut Frame, area: Rect, app: &mut App, theme: &Theme) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(area);

    render_movies(frame, columns[0], app, theme);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(11), // Movie data
            Constraint::Min(6),     // Actors
            Constraint::Length(9),  // Categories
        ])
        .split(columns[1]);

    render_movie_data(frame, rows[0], app, theme);
    render_actors(frame, rows[1], app, theme);
    render_categories(frame, rows[2], app, theme);
}

// =============================================================================
// Movie List
// =============================================================================

fn render_movies(frame: &mut Frame, area: Rect, app: &mut App, theme: &Theme) {
    let movies = app.session.movies();
    let focused = app.focus == Pane::Movies;
    let title = format!("Movies ({})", movies.len());
    let block = pane_block(&title, focused, true, theme);

    if movies.is_empty() {
        let empty = Paragraph::new("No movies. Import some on the Admin page.")
            .style(theme.dimmed())
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let height = area.height.saturating_sub(2) as usize;
    let offset = visible_offset(&mut app.movies, height);
    let active = app.session.selection().movie_id;

    let items: Vec<ListItem> = movies
        .iter()
        .enumerate()
        .skip(offset)
        .take(height)
        .map(|(i, movie)| {
            let under_cursor = focused && i == app.movies.selected;
            let is_active = active == Some(movie.id);
            let marker = if is_active { "● " } else { "  " };
            let style = if under_cursor {
                theme.list_item_selected()
            } else if is_active {
                theme.list_item_active()
            } else {
                theme.list_item()
            };
            ListItem::new(Line::from(vec![
                Span::styled(marker, theme.accent()),
                Span::styled(movie.filename.clone(), style),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

// =============================================================================
// Movie Data Form
// =============================================================================

fn option_name(catalog: &[Property], id: Option<u64>) -> String {
    id.and_then(|id| property_name(catalog, id))
        .unwrap_or("None")
        .to_string()
}

fn render_movie_data(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let enabled = app.session.enabled();
    let focused = app.focus == Pane::MovieData;
    let title = match app.session.current_movie() {
        Some(movie) => format!("Movie Data: {}", movie.filename),
        None => "Movie Data".to_string(),
    };
    let block = pane_block(&title, focused, enabled, theme);

    let form = app.session.movie_form();
    let editing = focused && app.input_mode == InputMode::Editing;
    let label_style = if enabled {
        theme.label()
    } else {
        theme.disabled()
    };

    let mut lines = Vec::new();
    for field in MovieField::ALL {
        let current = focused && enabled && app.movie_field == field;
        let marker = if current { "▸ " } else { "  " };
        let (label, value) = match field {
            MovieField::Name => ("Name      ", input_spans(&form.name, editing && current, theme)),
            MovieField::Studio => (
                "Studio    ",
                picker_spans(
                    option_name(app.session.catalog(PropertyKind::Studio), form.studio_id),
                    current,
                    theme,
                ),
            ),
            MovieField::Series => (
                "Series    ",
                picker_spans(
                    option_name(app.session.catalog(PropertyKind::Series), form.series_id),
                    current,
                    theme,
                ),
            ),
            MovieField::SeriesNumber => (
                "Series #  ",
                input_spans(&form.series_number, editing && current, theme),
            ),
        };

        let mut spans = vec![
            Span::styled(marker, theme.accent()),
            Span::styled(label, label_style),
        ];
        if enabled {
            spans.extend(value);
        }
        lines.push(Line::from(spans));

        let error_key = match field {
            MovieField::Name => Some(FIELD_NAME),
            MovieField::SeriesNumber => Some(FIELD_SERIES_NUMBER),
            _ => None,
        };
        if let Some(message) = error_key.and_then(|key| form.errors.get(key)) {
            lines.push(Line::from(Span::styled(
                format!("            {}", message),
                theme.error(),
            )));
        }
    }

    lines.push(Line::from(""));
    lines.push(status_line(
        app.session.movie_status(),
        app.session.status_failed(StatusSlot::Movie),
        theme,
    ));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

// =============================================================================
// Actors
// =============================================================================

fn render_actors(frame: &mut Frame, area: Rect, app: &mut App, theme: &Theme) {
    let enabled = app.session.enabled();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);

    let selection = app.session.selection();
    render_actor_list(
        frame,
        columns[0],
        ActorList {
            title: "Available Actors",
            actors: app.session.catalog(PropertyKind::Actor),
            cursor: &mut app.available,
            highlighted: selection.available_id,
            focused: app.focus == Pane::AvailableActors,
            enabled,
        },
        theme,
    );
    render_actor_list(
        frame,
        columns[1],
        ActorList {
            title: "Selected Actors",
            actors: app.session.selected_actors(),
            cursor: &mut app.selected,
            highlighted: selection.selected_id,
            focused: app.focus == Pane::SelectedActors,
            enabled,
        },
        theme,
    );

    let status = Paragraph::new(status_line(
        app.session.actor_status(),
        app.session.status_failed(StatusSlot::Actors),
        theme,
    ));
    frame.render_widget(status, rows[1]);
}

struct ActorList<'a> {
    title: &'a str,
    actors: &'a [Property],
    cursor: &'a mut ListState,
    highlighted: Option<u64>,
    focused: bool,
    enabled: bool,
}

fn render_actor_list(frame: &mut Frame, area: Rect, list: ActorList<'_>, theme: &Theme) {
    let block = pane_block(list.title, list.focused, list.enabled, theme);
    if !list.enabled {
        frame.render_widget(Paragraph::new("").block(block), area);
        return;
    }

    let height = area.height.saturating_sub(2) as usize;
    let offset = visible_offset(list.cursor, height);
    let items: Vec<ListItem> = list
        .actors
        .iter()
        .enumerate()
        .skip(offset)
        .take(height)
        .map(|(i, actor)| {
            let style = if list.focused && i == list.cursor.selected {
                theme.list_item_selected()
            } else if list.highlighted == Some(actor.id) {
                theme.list_item_active()
            } else {
                theme.list_item()
            };
            ListItem::new(Span::styled(actor.name.clone(), style))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

// =============================================================================
// Categories
// =============================================================================

fn render_categories(frame: &mut Frame, area: Rect, app: &mut App, theme: &Theme) {
    let enabled = app.session.enabled();
    let focused = app.focus == Pane::Categories;
    let block = pane_block("Categories", focused, enabled, theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if !enabled {
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    let checked = &app.session.movie_form().categories;
    let height = rows[0].height as usize;
    let offset = visible_offset(&mut app.categories, height);
    let items: Vec<ListItem> = app
        .session
        .catalog(PropertyKind::Category)
        .iter()
        .enumerate()
        .skip(offset)
        .take(height)
        .map(|(i, category)| {
            let is_checked = checked.contains(&category.id);
            let mark = if is_checked { "[x] " } else { "[ ] " };
            let style = if focused && i == app.categories.selected {
                theme.list_item_selected()
            } else {
                theme.list_item()
            };
            let mark_style = if is_checked {
                theme.accent()
            } else {
                Style::default().fg(theme.palette.dim)
            };
            ListItem::new(Line::from(vec![
                Span::styled(mark, mark_style),
                Span::styled(category.name.clone(), style),
            ]))
        })
        .collect();
    frame.render_widget(List::new(items), rows[0]);

    let status = Paragraph::new(status_line(
        app.session.category_status(),
        app.session.status_failed(StatusSlot::Categories),
        theme,
    ));
    frame.render_widget(status, rows[1]);
}
