//! UI rendering.
//!
//! Rendering functions that convert session state into terminal output using
//! ratatui widgets. All functions are pure (no I/O), taking state and
//! emitting widgets; redraw scheduling belongs to the runtime.

mod auth;
mod chats;
mod input;
mod status;
mod transcript;

use parley_app::{Session, SessionPhase};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
};

use crate::input::InputRouter;

/// Render the entire UI.
pub fn render(frame: &mut Frame, session: &Session, router: &InputRouter) {
    if session.phase() != SessionPhase::Ready {
        auth::render(frame, session);
        return;
    }

    const MAIN_AREA_MIN_HEIGHT: u16 = 3;
    const STATUS_HEIGHT: u16 = 1;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(MAIN_AREA_MIN_HEIGHT), Constraint::Length(STATUS_HEIGHT)])
        .split(frame.area());

    let [main_area, status_area] = chunks.as_ref() else {
        return;
    };

    render_main_area(frame, session, router, *main_area);
    status::render(frame, session, *status_area);
}

/// Render the main area (chat list sidebar + transcript + input field).
fn render_main_area(frame: &mut Frame, session: &Session, router: &InputRouter, area: Rect) {
    const CHAT_LIST_PERCENT: u16 = 30;
    const TRANSCRIPT_MIN_HEIGHT: u16 = 3;
    const INPUT_HEIGHT: u16 = 3;

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(CHAT_LIST_PERCENT),
            Constraint::Percentage(100 - CHAT_LIST_PERCENT),
        ])
        .split(area);

    let [list_area, right_area] = chunks.as_ref() else {
        return;
    };

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(TRANSCRIPT_MIN_HEIGHT), Constraint::Length(INPUT_HEIGHT)])
        .split(*right_area);

    let [transcript_area, input_area] = right.as_ref() else {
        return;
    };

    chats::render(frame, session, router, *list_area);
    transcript::render(frame, session, *transcript_area);
    input::render(frame, router, *input_area);
}
