//! Terminal UI components
//!
//! Built with ratatui. Every pane is drawn from the [`App`] state; the only
//! thing written back is each list's scroll offset.

pub mod admin;
pub mod library;
pub mod theme;

pub use theme::Theme;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, AppState, InputMode, ListState, Pane};
use crate::forms::TextInput;

// =============================================================================
// Frame Layout
// =============================================================================

/// Draw the whole frame. List scroll offsets are stored back into the app.
pub fn render(frame: &mut Frame, app: &mut App) {
    let theme = Theme::new(app.theme);
    let area = frame.area();

    frame.render_widget(Clear, area);
    frame.render_widget(Block::default().style(theme.text()), area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(1),    // Page
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    render_header(frame, chunks[0], app, &theme);
    match app.state {
        AppState::Main => library::render(frame, chunks[1], app, &theme),
        AppState::Admin => admin::render(frame, chunks[1], app, &theme),
    }
    render_status_bar(frame, chunks[2], app, &theme);

    if let Some(prompt) = &app.confirm {
        render_confirm_popup(frame, area, prompt, &theme);
    }
    if let Some(error) = &app.error {
        render_error_popup(frame, area, error, &theme);
    }
}

/// Title and page tabs
fn render_header(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let mut spans = vec![
        Span::styled(" MOVIE", theme.title()),
        Span::styled("MANAGER ", theme.accent()),
        Span::raw("  "),
    ];
    for (i, page) in [AppState::Main, AppState::Admin].into_iter().enumerate() {
        let style = if page == app.state {
            theme.list_item_selected()
        } else {
            theme.dimmed()
        };
        spans.push(Span::styled(format!(" {} {} ", i + 1, page.title()), style));
        spans.push(Span::raw(" "));
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme.border()),
    );
    frame.render_widget(header, area);
}

/// Keybinding hints for the focused pane
fn hints(app: &App) -> &'static [(&'static str, &'static str)] {
    if app.input_mode == InputMode::Editing {
        return &[("Enter", "save"), ("Esc", "stop editing")];
    }
    match app.focus {
        Pane::Movies => &[("Enter", "select"), ("Esc", "deselect"), ("r", "refresh")],
        Pane::MovieData => &[
            ("↑↓", "field"),
            ("←→", "change"),
            ("Enter", "edit"),
            ("s", "save"),
            ("x", "remove"),
        ],
        Pane::AvailableActors => &[("Enter", "add actor")],
        Pane::SelectedActors => &[("Enter", "remove actor")],
        Pane::Categories => &[("Space", "toggle")],
        Pane::PropertyForm => &[
            ("↑↓", "field"),
            ("←→", "change"),
            ("Enter", "edit/submit"),
            ("s", "submit"),
        ],
        Pane::Import => &[("Enter", "import")],
    }
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let mode = match app.input_mode {
        InputMode::Normal => Span::styled(" NORMAL ", theme.list_item_selected()),
        InputMode::Editing => Span::styled(
            " INSERT ",
            Style::default()
                .fg(theme.palette.background)
                .bg(theme.palette.accent),
        ),
    };

    let mut spans = vec![mode, Span::raw(" ")];
    if let Some(label) = app.working {
        spans.push(Span::styled(label, theme.loading()));
        spans.push(Span::raw(" │ "));
    }
    for (key, desc) in hints(app) {
        spans.push(Span::styled(*key, theme.keybind()));
        spans.push(Span::styled(format!(":{}  ", desc), theme.keybind_desc()));
    }
    spans.push(Span::styled("Tab", theme.keybind()));
    spans.push(Span::styled(":pane  ", theme.keybind_desc()));
    spans.push(Span::styled("t", theme.keybind()));
    spans.push(Span::styled(":theme  ", theme.keybind_desc()));
    spans.push(Span::styled("q", theme.keybind()));
    spans.push(Span::styled(":quit", theme.keybind_desc()));

    let status = Paragraph::new(Line::from(spans)).style(theme.status_bar());
    frame.render_widget(status, area);
}

// =============================================================================
// Popups
// =============================================================================

fn popup_area(area: Rect, height: u16) -> Rect {
    let width = 60.min(area.width.saturating_sub(4));
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height: height.min(area.height),
    }
}

fn render_confirm_popup(frame: &mut Frame, area: Rect, prompt: &str, theme: &Theme) {
    let popup = popup_area(area, 6);
    frame.render_widget(Clear, popup);

    let body = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(prompt, theme.warning())),
        Line::from(vec![
            Span::styled("y", theme.keybind()),
            Span::styled(":yes  ", theme.keybind_desc()),
            Span::styled("n", theme.keybind()),
            Span::styled(":no", theme.keybind_desc()),
        ]),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(theme.warning())
            .title(Span::styled(" CONFIRM ", theme.warning()))
            .style(theme.text()),
    );
    frame.render_widget(body, popup);
}

fn render_error_popup(frame: &mut Frame, area: Rect, error: &str, theme: &Theme) {
    let popup = popup_area(area, 5);
    frame.render_widget(Clear, popup);

    let body = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(error, theme.error())),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(theme.error())
            .title(Span::styled(" ✗ ERROR ", theme.error()))
            .style(theme.text()),
    );
    frame.render_widget(body, popup);
}

// =============================================================================
// Shared Helpers
// =============================================================================

/// Bordered pane; the border shows focus, the title dims when disabled
pub(crate) fn pane_block<'a>(
    title: &'a str,
    focused: bool,
    enabled: bool,
    theme: &Theme,
) -> Block<'a> {
    let border = if focused {
        theme.border_focused()
    } else {
        theme.border()
    };
    let title_style = if enabled {
        theme.title()
    } else {
        theme.disabled()
    };
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border)
        .title(Span::styled(format!(" {} ", title), title_style))
}

/// Scroll the list so the cursor stays on screen; returns the first visible row
pub(crate) fn visible_offset(list: &mut ListState, height: usize) -> usize {
    list.scroll_into_view(height);
    list.offset
}

/// Text field contents, with a cursor bar while editing
pub(crate) fn input_spans(input: &TextInput, editing: bool, theme: &Theme) -> Vec<Span<'static>> {
    if editing {
        let (before, after) = input.split_at_cursor();
        vec![
            Span::styled(before.to_string(), theme.input()),
            Span::styled("│", theme.input_cursor()),
            Span::styled(after.to_string(), theme.input()),
        ]
    } else {
        vec![Span::styled(format!("{} ", input.value()), theme.input())]
    }
}

/// Value of a picker field, with arrows when it has focus
pub(crate) fn picker_spans(value: String, current: bool, theme: &Theme) -> Vec<Span<'static>> {
    if current {
        vec![
            Span::styled("◂ ", theme.keybind()),
            Span::styled(value, theme.input()),
            Span::styled(" ▸", theme.keybind()),
        ]
    } else {
        vec![Span::styled(value, theme.input())]
    }
}

/// Status line: errors in red, confirmations in green
pub(crate) fn status_line(message: Option<&str>, failed: bool, theme: &Theme) -> Line<'static> {
    match message {
        Some(text) => {
            let style = if failed { theme.error() } else { theme.success() };
            Line::from(Span::styled(text.to_string(), style))
        }
        None => Line::from(""),
    }
}
