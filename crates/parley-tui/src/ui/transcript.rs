//! Transcript pane.
//!
//! Displays the formatted lines of the active chat, pinned to the tail.

use parley_app::{Session, emoji};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};

const BORDER_SIZE: u16 = 2;

/// Render the transcript pane.
pub fn render(frame: &mut Frame, session: &Session, area: Rect) {
    let title = session
        .active_chat_entry()
        .map_or_else(|| " Messages ".to_string(), |chat| format!(" {} ", emoji::normalize(chat.label())));

    let block = Block::default().borders(Borders::ALL).title(title);

    let items: Vec<ListItem> = if session.active_chat().is_none() {
        vec![ListItem::new(Line::from(Span::styled(
            "Select a chat to start messaging",
            Style::default().fg(Color::DarkGray),
        )))]
    } else {
        session
            .transcript()
            .lines()
            .iter()
            .map(|line| ListItem::new(Line::from(line.as_str())))
            .collect()
    };

    // Keep the most recent lines visible.
    let visible_height = area.height.saturating_sub(BORDER_SIZE) as usize;
    let skip = items.len().saturating_sub(visible_height);
    let visible_items: Vec<_> = items.into_iter().skip(skip).collect();

    frame.render_widget(List::new(visible_items).block(block), area);
}
