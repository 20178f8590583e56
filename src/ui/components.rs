//! Shared UI components (status bar, modal helpers).
//!
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::AppState;

/// Render the bottom status bar with the current screen and data paths.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let msg = format!(
        "screen: {}  books: {}  borrowers: {}",
        app.screen.name(),
        app.library.files.books.display(),
        app.library.files.borrowers.display(),
    );
    let p = Paragraph::new(msg).style(Style::default().fg(Color::Black).bg(Color::Gray));
    f.render_widget(p, area);
}

/// Compute a rectangle centered within `area` with a maximum size.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Width and height of the info dialog for `message` inside `area`.
fn info_modal_size(message: &str, area: Rect) -> (u16, u16) {
    let max_w = area.width.saturating_sub(6).max(30);
    let width = 50u16.min(max_w);
    let text_w = width.saturating_sub(4).max(10);
    let len = u16::try_from(message.chars().count()).unwrap_or(u16::MAX);
    // Message, a blank line and the hint, plus borders
    let text_lines = (len / text_w).saturating_add(1);
    let max_h = area.height.saturating_sub(6).max(5);
    let height = text_lines.saturating_add(4).min(max_h).max(5);
    (width, height)
}

/// Render a generic informational modal dialog.
pub fn render_info_modal(f: &mut Frame, area: Rect, message: &str) {
    let (width, height) = info_modal_size(message, area);
    let rect = centered_rect(width, height, area);
    let p = Paragraph::new(format!("{message}\n\nPress Enter to continue"))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title("Info")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}
