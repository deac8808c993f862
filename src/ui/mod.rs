//! UI rendering module for the airport directory
//!
//! This module contains all the rendering logic for the terminal user interface,
//! using the ratatui library for TUI components.

pub mod detail;
pub mod help_overlay;
pub mod list;
pub mod toast;

pub use detail::render as render_facility_detail;
pub use help_overlay::render as render_help_overlay;
pub use toast::render as render_toasts;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::Style,
    text::Span,
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, LoadState, Screen};

/// Color palette shared by every screen
pub(crate) mod colors {
    use ratatui::style::Color;

    /// Titles and section headers
    pub const HEADER: Color = Color::Cyan;
    /// Primary text
    pub const PRIMARY: Color = Color::White;
    /// Secondary/dimmed text
    pub const SECONDARY: Color = Color::Gray;
    /// Key names in hint lines
    pub const KEY: Color = Color::Cyan;
    /// Selected row
    pub const SELECTED: Color = Color::Yellow;
    /// Placeholder and empty-state text
    pub const UNKNOWN: Color = Color::DarkGray;
}

/// Renders the whole frame for the current application state
pub fn render(frame: &mut Frame, app: &App) {
    if app.load_state == LoadState::Loading {
        render_loading(frame, loading_message(&app.screen));
    } else {
        match &app.screen {
            Screen::Airports => list::render_airports(frame, app),
            Screen::Categories(airport) => list::render_categories(frame, app, airport),
            Screen::Facilities(airport, category) => {
                list::render_facilities(frame, app, airport, category)
            }
            Screen::FacilityDetail(_) => render_facility_detail(frame, app),
        }
    }

    if !app.toasts.is_empty() {
        render_toasts(frame, app.toasts.active());
    }

    if app.show_help {
        render_help_overlay(frame);
    }
}

fn loading_message(screen: &Screen) -> &'static str {
    match screen {
        Screen::Airports => "Loading airports...",
        Screen::Categories(_) => "Loading facility categories...",
        Screen::Facilities(..) => "Loading facilities...",
        Screen::FacilityDetail(_) => "Loading facility details...",
    }
}

/// Renders a loading message while data is being fetched
fn render_loading(frame: &mut Frame, message: &str) {
    let area = frame.area();

    // Center the loading message vertically
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Length(3),
            Constraint::Percentage(45),
        ])
        .split(area);

    let loading_text = Paragraph::new(message.to_string())
        .style(Style::default().fg(colors::HEADER))
        .alignment(Alignment::Center);

    frame.render_widget(loading_text, chunks[1]);
}

/// A `key label` pair for the hint lines at the bottom of a screen
pub(crate) fn key_hint(key: &str, label: &str) -> Vec<Span<'static>> {
    vec![
        Span::styled(key.to_string(), Style::default().fg(colors::KEY)),
        Span::styled(format!(" {}  ", label), Style::default().fg(colors::SECONDARY)),
    ]
}
