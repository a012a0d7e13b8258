//! Admin page: reference data form and movie import

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use super::{input_spans, pane_block, picker_spans, status_line, Theme};
use crate::app::{App, InputMode, Pane, PropertyField};
use crate::forms::{PropertyAction, FIELD_NAME};
use crate::models::property_name;
use crate::session::StatusSlot;

pub fn render(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    render_property_form(frame, columns[0], app, theme);
    render_import(frame, columns[1], app, theme);
}

fn render_property_form(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let focused = app.focus == Pane::PropertyForm;
    let block = pane_block("Actors, Categories, Series & Studios", focused, true, theme);

    let form = app.session.property_form();
    let catalog = app.session.catalog(form.kind);
    let editing = focused && app.input_mode == InputMode::Editing;

    let mut lines = vec![Line::from("")];
    for field in PropertyField::ALL {
        if !field.visible_for(form.action) {
            continue;
        }

        let current = focused && app.property_field == field;
        let (label, value) = match field {
            PropertyField::Action => {
                let action = match form.action {
                    PropertyAction::Add => "Add",
                    PropertyAction::Update => "Update",
                    PropertyAction::Remove => "Remove",
                };
                ("Action  ", picker_spans(action.to_string(), current, theme))
            }
            PropertyField::Kind => (
                "Type    ",
                picker_spans(form.kind.title().to_string(), current, theme),
            ),
            PropertyField::Entry => {
                let name = form
                    .selection
                    .and_then(|id| property_name(catalog, id))
                    .unwrap_or("Choose one")
                    .to_string();
                ("Entry   ", picker_spans(name, current, theme))
            }
            PropertyField::Name => ("Name    ", input_spans(&form.name, editing && current, theme)),
        };

        let mut spans = vec![
            Span::styled(if current { "▸ " } else { "  " }, theme.accent()),
            Span::styled(label, theme.label()),
        ];
        spans.extend(value);
        lines.push(Line::from(spans));

        if field == PropertyField::Name {
            if let Some(message) = form.errors.get(FIELD_NAME) {
                lines.push(Line::from(Span::styled(
                    format!("          {}", message),
                    theme.error(),
                )));
            }
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("{} {} ({} total)", form.action, form.kind, catalog.len()),
        theme.dimmed(),
    )));
    lines.push(status_line(
        app.session.property_status(),
        app.session.status_failed(StatusSlot::Property),
        theme,
    ));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_import(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let focused = app.focus == Pane::Import;
    let block = pane_block("Import", focused, true, theme);

    let status_style = if app.session.status_failed(StatusSlot::Import) {
        theme.error()
    } else {
        theme.text()
    };
    let lines = vec![
        Line::from(""),
        Line::from("Scan the backend's movie folder for new files."),
        Line::from(""),
        Line::from(Span::styled(app.session.import_status().to_string(), status_style)),
        Line::from(""),
        Line::from(vec![
            Span::styled("Enter", theme.keybind()),
            Span::styled(": import", theme.keybind_desc()),
        ]),
    ];

    let body = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(block);
    frame.render_widget(body, area);
}
