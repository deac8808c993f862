//! Toast notifications drawn in the bottom-right corner

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::toast::{Toast, ToastKind};

const TOAST_WIDTH: u16 = 60;

/// Rows left free at the bottom for the hint line
const BOTTOM_MARGIN: u16 = 1;

fn kind_style(kind: ToastKind) -> (&'static str, Color) {
    match kind {
        ToastKind::Success => ("\u{2714}", Color::Green), // ✔
        ToastKind::Error => ("\u{2716}", Color::Red),     // ✖
        ToastKind::Info => ("\u{2139}", Color::Cyan),     // ℹ
        ToastKind::Warning => ("\u{26A0}", Color::Yellow), // ⚠
    }
}

/// Stacks the active toasts upwards from the bottom, newest at the bottom
pub fn render(frame: &mut Frame, toasts: &[Toast]) {
    let area = frame.area();
    let width = TOAST_WIDTH.min(area.width);
    let mut bottom = area.height.saturating_sub(BOTTOM_MARGIN);

    for toast in toasts.iter().rev() {
        let height = 3;
        if bottom < area.y + height {
            break;
        }
        let toast_area = Rect::new(area.x + area.width - width, bottom - height, width, height);
        render_toast(frame, toast, toast_area);
        bottom -= height;
    }
}

fn render_toast(frame: &mut Frame, toast: &Toast, area: Rect) {
    let (icon, color) = kind_style(toast.kind);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));

    let paragraph = Paragraph::new(Line::from(vec![
        Span::styled(format!("{} ", icon), Style::default().fg(color)),
        Span::raw(toast.message.clone()),
    ]))
    .block(block)
    .wrap(Wrap { trim: true });

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}
