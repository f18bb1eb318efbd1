//! Status bar.
//!
//! Displays the session phase, the active chat, and transient notices such
//! as a failed directory refresh.

use parley_app::{Session, SessionPhase, emoji};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

/// Render the status bar.
pub fn render(frame: &mut Frame, session: &Session, area: Rect) {
    let phase = match session.phase() {
        SessionPhase::Unauthenticated => {
            Span::styled("Starting", Style::default().fg(Color::Red))
        },
        SessionPhase::Authenticating => {
            Span::styled("Authenticating...", Style::default().fg(Color::Yellow))
        },
        SessionPhase::Ready => Span::styled(
            "Ready",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
    };

    let chat_info = session.active_chat_entry().map_or_else(String::new, |chat| {
        format!(" | Chat: {} | Chats: {}", emoji::normalize(chat.label()), session.directory().len())
    });

    let mut spans = vec![
        Span::raw(" "),
        phase,
        Span::styled(chat_info, Style::default().fg(Color::DarkGray)),
    ];
    if let Some(notice) = session.status_message() {
        spans.push(Span::styled(format!(" | {notice}"), Style::default().fg(Color::Red)));
    }

    let paragraph = Paragraph::new(Line::from(spans))
        .style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(paragraph, area);
}
