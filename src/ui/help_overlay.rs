//! Help overlay showing all keybindings
//!
//! Renders a centered modal overlay with keyboard shortcuts.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Renders the help overlay on top of the current view
pub fn render(frame: &mut Frame) {
    let area = frame.area();

    // Calculate centered overlay area
    let overlay_width = 52;
    let overlay_height = 24;
    let overlay_area = centered_rect(overlay_width, overlay_height, area);

    // Clear the area behind the overlay
    frame.render_widget(Clear, overlay_area);

    // Build help content
    let lines = vec![
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        section("Navigation"),
        help_line("↑/k, ↓/j", "Move selection up/down"),
        help_line("Enter", "Open selected entry"),
        help_line("Esc", "Go back (quits from airports)"),
        help_line("→/n, ←/p", "Next / previous page"),
        Line::from(""),
        section("Search"),
        help_line("/", "Search the current list"),
        help_line("Enter", "Keep the search term"),
        help_line("Esc", "Clear the search term"),
        Line::from(""),
        section("Other"),
        help_line("j/k, g", "Scroll details / back to top"),
        help_line("r", "Reload current screen"),
        help_line("x", "Dismiss notification"),
        help_line("?", "Toggle this help"),
        help_line("q", "Quit application"),
        Line::from(""),
        Line::from(Span::styled(
            "Press Esc or ? to close",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Left);

    frame.render_widget(paragraph, overlay_area);
}

fn section(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        title.to_string(),
        Style::default().add_modifier(Modifier::BOLD),
    ))
}

/// Creates a help line with key and description
fn help_line(key: &str, description: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<14}", key), Style::default().fg(Color::Yellow)),
        Span::raw(description.to_string()),
    ])
}

/// Helper function to create a centered rect
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height.saturating_sub(height)) / 2),
            Constraint::Length(height),
            Constraint::Length((area.height.saturating_sub(height)) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((area.width.saturating_sub(width)) / 2),
            Constraint::Length(width),
            Constraint::Length((area.width.saturating_sub(width)) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
