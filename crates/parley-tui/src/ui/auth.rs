//! Authentication screen.
//!
//! Centered panel showing the backend's challenge code while the session is
//! not yet ready. Re-rendered as-is when the backend re-issues a challenge.

use parley_app::Session;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph},
};

const PROMPT: &str = "Scan the code to log in!";
const WAITING: &str = "Waiting for the messaging backend...";
const BORDER_SIZE: u16 = 2;

/// Render the authentication panel.
pub fn render(frame: &mut Frame, session: &Session) {
    let mut lines = vec![Line::from(PROMPT), Line::from("")];
    match session.challenge() {
        Some(code) => lines.extend(code.lines().map(Line::from)),
        None => lines.push(Line::from(WAITING)),
    }

    #[allow(clippy::cast_possible_truncation)]
    let content_width = lines.iter().map(Line::width).max().unwrap_or(0) as u16;
    #[allow(clippy::cast_possible_truncation)]
    let content_height = lines.len() as u16;

    let area = centered(
        frame.area(),
        content_width.saturating_add(BORDER_SIZE + 2),
        content_height.saturating_add(BORDER_SIZE),
    );

    let block =
        Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Green));
    let panel = Paragraph::new(lines).centered().block(block);

    frame.render_widget(Clear, area);
    frame.render_widget(panel, area);
}

/// Rect of at most `width` x `height`, centered within `area`.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
