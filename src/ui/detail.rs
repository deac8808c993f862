//! Facility detail screen rendering
//!
//! Shows every field of a facility record, its amenities and how long ago the
//! record was fetched.

use std::time::Duration;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::{colors, key_hint};
use crate::app::App;
use crate::data::FacilityDetail;

/// Formats the age of a cached record for display
pub fn age_display(age: Duration) -> String {
    let secs = age.as_secs();
    if secs < 60 {
        "Updated just now".to_string()
    } else if secs < 3600 {
        format!("Updated {}m ago", secs / 60)
    } else {
        format!("Updated {}h ago", secs / 3600)
    }
}

/// Renders the facility detail screen
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Record
            Constraint::Length(1), // Hints and age
        ])
        .split(area);

    match app.detail.as_deref() {
        Some(detail) => render_record(frame, chunks[0], detail, app.detail_scroll_offset),
        None => render_not_found(frame, chunks[0]),
    }
    render_help_text(frame, chunks[1], app.detail_age());
}

fn render_record(frame: &mut Frame, area: Rect, detail: &FacilityDetail, scroll_offset: u16) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::HEADER))
        .title(Span::styled(
            format!(" {} ", detail.facility.name),
            Style::default()
                .fg(colors::PRIMARY)
                .add_modifier(Modifier::BOLD),
        ));

    let paragraph = Paragraph::new(build_detail_lines(detail))
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((scroll_offset, 0));

    frame.render_widget(paragraph, area);
}

/// Builds the lines of a facility record, skipping fields it does not have
pub(crate) fn build_detail_lines(detail: &FacilityDetail) -> Vec<Line<'static>> {
    let facility = &detail.facility;
    let fields = [
        ("Type", detail.category.as_deref()),
        ("Airport", detail.airport_name.as_deref()),
        ("Location", facility.location.as_deref()),
        ("Hours", facility.hours.as_deref()),
        ("Contact", detail.contact.as_deref()),
        ("Access", detail.access_info.as_deref()),
        ("Rates", detail.rates.as_deref()),
    ];

    let mut lines: Vec<Line<'static>> = fields
        .into_iter()
        .filter_map(|(label, value)| value.map(|value| field_line(label, value)))
        .collect();

    if let Some(ref description) = detail.description {
        lines.push(Line::default());
        lines.push(section_header("About"));
        lines.push(Line::from(Span::styled(
            description.clone(),
            Style::default().fg(colors::PRIMARY),
        )));
    }

    if !detail.amenities.is_empty() {
        lines.push(Line::default());
        lines.push(section_header("Amenities"));
        lines.extend(detail.amenities.iter().map(|amenity| {
            Line::from(vec![
                Span::styled("  \u{2022} ", Style::default().fg(colors::HEADER)), // •
                Span::styled(amenity.clone(), Style::default().fg(colors::PRIMARY)),
            ])
        }));
    }

    lines
}

fn field_line(label: &str, value: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<10}", label), Style::default().fg(colors::SECONDARY)),
        Span::styled(value.to_string(), Style::default().fg(colors::PRIMARY)),
    ])
}

fn section_header(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        title.to_string(),
        Style::default()
            .fg(colors::HEADER)
            .add_modifier(Modifier::BOLD),
    ))
}

/// Renders the empty state for a facility that could not be loaded
fn render_not_found(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::HEADER));

    let message = Paragraph::new(vec![
        Line::default(),
        Line::from(Span::styled(
            "  Facility not found",
            Style::default().fg(colors::UNKNOWN),
        )),
    ])
    .block(block);

    frame.render_widget(message, area);
}

fn render_help_text(frame: &mut Frame, area: Rect, age: Option<Duration>) {
    let mut spans = Vec::new();
    spans.extend(key_hint("Esc", "Back"));
    spans.extend(key_hint("j/k", "Scroll"));
    spans.extend(key_hint("r", "Refresh"));
    spans.extend(key_hint("q", "Quit"));
    if let Some(age) = age {
        spans.push(Span::styled(age_display(age), Style::default().fg(colors::UNKNOWN)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
