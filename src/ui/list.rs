//! List screen rendering
//!
//! Renders the airport, category and facility lists. All three share one layout:
//! a header with the title and search term, the current page of rows, and a
//! footer with the page indicator and key hints.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{colors, key_hint};
use crate::app::App;
use crate::data::{Airport, Category, Facility};
use crate::listing::Page;

/// Category name fragment to icon mapping, first match wins
const CATEGORY_ICONS: [(&str, &str); 9] = [
    ("restaurants", "\u{1F37D}\u{FE0F}"), // 🍽️
    ("shops", "\u{1F6CD}\u{FE0F}"),       // 🛍️
    ("lounges", "\u{1F6CB}\u{FE0F}"),     // 🛋️
    ("restrooms", "\u{1F6BB}"),           // 🚻
    ("information", "\u{2139}\u{FE0F}"),  // ℹ️
    ("gates", "\u{1F6AA}"),               // 🚪
    ("security", "\u{1F512}"),            // 🔒
    ("parking", "\u{1F17F}\u{FE0F}"),     // 🅿️
    ("baggage", "\u{1F9F3}"),             // 🧳
];

/// Icon used for categories without a dedicated one
const DEFAULT_CATEGORY_ICON: &str = "\u{1F4CD}"; // 📍

/// Picks the icon for a category by looking for a known fragment in its name
pub fn category_icon(name: &str) -> &'static str {
    let name = name.to_lowercase();
    CATEGORY_ICONS
        .iter()
        .find(|(fragment, _)| name.contains(fragment))
        .map(|(_, icon)| *icon)
        .unwrap_or(DEFAULT_CATEGORY_ICON)
}

/// What a list screen needs besides its rows
struct ListScreen<'a> {
    title: String,
    subtitle: Option<String>,
    empty_message: &'a str,
    /// Label for the Enter hint
    open_label: &'a str,
}

/// Renders the airport list
pub fn render_airports(frame: &mut Frame, app: &App) {
    let airports = app.airports.as_deref().map(Vec::as_slice).unwrap_or_default();
    let page = app.view.page_of(airports, app.page_size);
    let rows = page
        .items
        .iter()
        .enumerate()
        .map(|(i, airport)| airport_row(airport, i == app.view.selected))
        .collect();

    let screen = ListScreen {
        title: "Airports".to_string(),
        subtitle: Some(format!("{} airports", airports.len())),
        empty_message: "No airports found",
        open_label: "Categories",
    };
    render_list_screen(frame, app, &screen, rows, &page);
}

/// Renders the facility categories of an airport
pub fn render_categories(frame: &mut Frame, app: &App, airport: &Airport) {
    let categories = app.categories.as_deref().map(Vec::as_slice).unwrap_or_default();
    let page = app.view.page_of(categories, app.page_size);
    let rows = page
        .items
        .iter()
        .enumerate()
        .map(|(i, category)| category_row(category, i == app.view.selected))
        .collect();

    let screen = ListScreen {
        title: format!("{} ({})", airport.name, airport.code),
        subtitle: Some(airport_location(airport)),
        empty_message: "No facility categories found",
        open_label: "Facilities",
    };
    render_list_screen(frame, app, &screen, rows, &page);
}

/// Renders the facilities of one category
pub fn render_facilities(frame: &mut Frame, app: &App, airport: &Airport, category: &Category) {
    let facilities = app.facilities.as_deref().map(Vec::as_slice).unwrap_or_default();
    let page = app.view.page_of(facilities, app.page_size);
    let rows = page
        .items
        .iter()
        .enumerate()
        .map(|(i, facility)| facility_row(facility, i == app.view.selected))
        .collect();

    let screen = ListScreen {
        title: format!("{} {}", category_icon(&category.name), category.name),
        subtitle: Some(format!("{} ({})", airport.name, airport.code)),
        empty_message: "No facilities found",
        open_label: "Details",
    };
    render_list_screen(frame, app, &screen, rows, &page);
}

fn render_list_screen<T>(
    frame: &mut Frame,
    app: &App,
    screen: &ListScreen<'_>,
    rows: Vec<Vec<Line<'static>>>,
    page: &Page<'_, T>,
) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title and search
            Constraint::Min(3),    // Rows
            Constraint::Length(1), // Page indicator and hints
        ])
        .split(area);

    render_header(frame, app, screen, chunks[0]);
    render_rows(frame, screen, rows, chunks[1]);
    render_footer(frame, app, screen, page, chunks[2]);
}

fn render_header(frame: &mut Frame, app: &App, screen: &ListScreen<'_>, area: Rect) {
    let mut title = vec![Span::styled(
        screen.title.clone(),
        Style::default()
            .fg(colors::HEADER)
            .add_modifier(Modifier::BOLD),
    )];
    if let Some(ref subtitle) = screen.subtitle {
        title.push(Span::raw("  "));
        title.push(Span::styled(
            subtitle.clone(),
            Style::default().fg(colors::SECONDARY),
        ));
    }

    let search = if app.view.searching {
        Line::from(vec![
            Span::styled("Search: ", Style::default().fg(colors::KEY)),
            Span::styled(app.view.search.clone(), Style::default().fg(colors::PRIMARY)),
            Span::styled("_", Style::default().fg(colors::SELECTED)),
        ])
    } else if !app.view.search.is_empty() {
        Line::from(vec![
            Span::styled("Filter: ", Style::default().fg(colors::SECONDARY)),
            Span::styled(app.view.search.clone(), Style::default().fg(colors::PRIMARY)),
        ])
    } else {
        Line::from(Span::styled(
            "Press / to search",
            Style::default().fg(colors::UNKNOWN),
        ))
    };

    let paragraph = Paragraph::new(vec![Line::from(title), search, Line::default()]);
    frame.render_widget(paragraph, area);
}

fn render_rows(frame: &mut Frame, screen: &ListScreen<'_>, rows: Vec<Vec<Line<'static>>>, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::HEADER));

    let lines: Vec<Line> = if rows.is_empty() {
        vec![
            Line::default(),
            Line::from(Span::styled(
                format!("  {}", screen.empty_message),
                Style::default().fg(colors::UNKNOWN),
            )),
        ]
    } else {
        rows.into_iter().flatten().collect()
    };

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_footer<T>(
    frame: &mut Frame,
    app: &App,
    screen: &ListScreen<'_>,
    page: &Page<'_, T>,
    area: Rect,
) {
    let mut spans = Vec::new();
    if page.is_paginated() {
        spans.push(Span::styled(
            format!("Page {}/{}  ", page.number, page.total_pages),
            Style::default().fg(colors::PRIMARY),
        ));
    }

    if app.view.searching {
        spans.extend(key_hint("Enter", "Keep"));
        spans.extend(key_hint("Esc", "Clear"));
    } else {
        spans.extend(key_hint("Enter", screen.open_label));
        if page.is_paginated() {
            spans.extend(key_hint("n/p", "Page"));
        }
        spans.extend(key_hint("/", "Search"));
        spans.extend(key_hint("Esc", "Back"));
        spans.extend(key_hint("?", "Help"));
    }
    spans.push(Span::styled(
        format!("[{}]", app.source_name()),
        Style::default().fg(colors::UNKNOWN),
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Cursor indicator and colors for a row
fn row_style(is_selected: bool) -> (&'static str, Style, Style) {
    if is_selected {
        (
            "\u{25B8} ", // ▸
            Style::default()
                .fg(colors::SELECTED)
                .add_modifier(Modifier::BOLD),
            Style::default().fg(colors::PRIMARY),
        )
    } else {
        (
            "  ",
            Style::default().fg(colors::PRIMARY),
            Style::default().fg(colors::SECONDARY),
        )
    }
}

fn airport_location(airport: &Airport) -> String {
    let mut location = format!("{}, {}", airport.city, airport.country);
    match airport.terminals {
        0 => {}
        1 => location.push_str(" · 1 terminal"),
        n => location.push_str(&format!(" · {} terminals", n)),
    }
    location
}

fn airport_row(airport: &Airport, is_selected: bool) -> Vec<Line<'static>> {
    let (cursor, name_style, detail_style) = row_style(is_selected);
    vec![Line::from(vec![
        Span::styled(cursor, name_style),
        Span::styled(format!("{:<4}", airport.code), name_style),
        Span::styled(airport.name.clone(), name_style),
        Span::raw("  "),
        Span::styled(airport_location(airport), detail_style),
    ])]
}

fn category_row(category: &Category, is_selected: bool) -> Vec<Line<'static>> {
    let (cursor, name_style, detail_style) = row_style(is_selected);
    let count = match category.count {
        1 => "1 facility".to_string(),
        n => format!("{} facilities", n),
    };
    vec![Line::from(vec![
        Span::styled(cursor, name_style),
        Span::raw(format!("{} ", category_icon(&category.name))),
        Span::styled(category.name.clone(), name_style),
        Span::raw("  "),
        Span::styled(count, detail_style),
    ])]
}

/// Facilities take two lines: name, then location and hours
fn facility_row(facility: &Facility, is_selected: bool) -> Vec<Line<'static>> {
    let (cursor, name_style, detail_style) = row_style(is_selected);
    let details: Vec<&str> = [facility.location.as_deref(), facility.hours.as_deref()]
        .into_iter()
        .flatten()
        .collect();

    let mut lines = vec![Line::from(vec![
        Span::styled(cursor, name_style),
        Span::styled(facility.name.clone(), name_style),
    ])];
    if !details.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("    {}", details.join(" · ")),
            detail_style,
        )));
    }
    lines
}
