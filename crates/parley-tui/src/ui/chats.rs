//! Chat list sidebar.
//!
//! Displays the directory snapshot with the active chat marked and the
//! keyboard highlight tracked separately.

use parley_app::{Session, emoji};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
};

use crate::input::{Focus, InputRouter};

const ACTIVE_PREFIX: &str = "> ";
const INACTIVE_PREFIX: &str = "  ";

/// Render the chat list.
pub fn render(frame: &mut Frame, session: &Session, router: &InputRouter, area: Rect) {
    let items: Vec<ListItem> = session
        .directory()
        .iter()
        .map(|chat| {
            let is_active = session.active_chat() == Some(&chat.id);
            let (prefix, style) = if is_active {
                (ACTIVE_PREFIX, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
            } else {
                (INACTIVE_PREFIX, Style::default())
            };

            ListItem::new(Line::from(vec![
                Span::raw(prefix),
                Span::styled(emoji::normalize(chat.label()), style),
            ]))
        })
        .collect();

    let border_style = if router.focus() == Focus::ChatList {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let block =
        Block::default().borders(Borders::ALL).border_style(border_style).title(" Chats ");

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut state = ListState::default();
    if !session.directory().is_empty() {
        state.select(Some(router.list_cursor()));
    }

    frame.render_stateful_widget(list, area, &mut state);
}
