//! Focus and input routing.
//!
//! Owns the binary focus state (chat list vs. input field), the text input
//! buffer with its cursor, and the highlighted row of the chat list. Key
//! events are translated into [`parley_app::Session`] calls; the resulting
//! actions are handed back to the runtime.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use parley_app::{Session, SessionAction};

/// Which pane owns the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    /// The chat list pane; Up/Down move the highlight, Enter selects.
    #[default]
    ChatList,
    /// The message input field; characters edit, Enter submits.
    Input,
}

/// Focus state, input buffer, and chat-list highlight.
#[derive(Debug, Default)]
pub struct InputRouter {
    focus: Focus,
    /// Text buffer for the message input field.
    buffer: String,
    /// Cursor position within the buffer.
    cursor: usize,
    /// Highlighted row in the chat list.
    list_cursor: usize,
}

impl InputRouter {
    /// Create a router with focus on the chat list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current focus.
    pub fn focus(&self) -> Focus {
        self.focus
    }

    /// Current text in the input buffer.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Cursor position in the input buffer.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Highlighted row in the chat list.
    pub fn list_cursor(&self) -> usize {
        self.list_cursor
    }

    /// Put text back into the input field (after a failed send) and focus it.
    pub fn restore(&mut self, text: String) {
        self.cursor = text.len();
        self.buffer = text;
        self.focus = Focus::Input;
    }

    /// Keep the list highlight inside the directory after a refresh.
    pub fn clamp_list_cursor(&mut self, len: usize) {
        self.list_cursor = self.list_cursor.min(len.saturating_sub(1));
    }

    /// Handle a key press and return actions to process.
    pub fn handle_key(&mut self, key: KeyEvent, session: &mut Session) -> Vec<SessionAction> {
        // Interrupt quits from anywhere.
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return session.quit();
        }

        match self.focus {
            Focus::ChatList => self.handle_list_key(key.code, session),
            Focus::Input => self.handle_input_key(key.code, session),
        }
    }

    fn handle_list_key(&mut self, code: KeyCode, session: &mut Session) -> Vec<SessionAction> {
        match code {
            KeyCode::Tab => {
                self.focus = Focus::Input;
                vec![SessionAction::Render]
            },
            KeyCode::Up | KeyCode::Char('k') => {
                self.list_cursor = self.list_cursor.saturating_sub(1);
                vec![SessionAction::Render]
            },
            KeyCode::Down | KeyCode::Char('j') => {
                let last = session.directory().len().saturating_sub(1);
                self.list_cursor = self.list_cursor.saturating_add(1).min(last);
                vec![SessionAction::Render]
            },
            KeyCode::Enter => {
                let actions = session.select_chat(self.list_cursor);
                if !actions.is_empty() {
                    // Move focus to the input so the user can reply at once.
                    self.focus = Focus::Input;
                }
                actions
            },
            KeyCode::Char('q') | KeyCode::Esc => session.quit(),
            _ => vec![],
        }
    }

    fn handle_input_key(&mut self, code: KeyCode, session: &mut Session) -> Vec<SessionAction> {
        match code {
            KeyCode::Tab => {
                self.focus = Focus::ChatList;
                vec![SessionAction::Render]
            },
            KeyCode::Esc => {
                self.focus = Focus::ChatList;
                vec![SessionAction::Render]
            },
            KeyCode::Char(c) => {
                self.buffer.insert(self.cursor, c);
                self.cursor = self.cursor.saturating_add(c.len_utf8());
                vec![SessionAction::Render]
            },
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    let prev = previous_boundary(&self.buffer, self.cursor);
                    self.buffer.remove(prev);
                    self.cursor = prev;
                }
                vec![SessionAction::Render]
            },
            KeyCode::Delete => {
                if self.cursor < self.buffer.len() {
                    self.buffer.remove(self.cursor);
                }
                vec![SessionAction::Render]
            },
            KeyCode::Left => {
                if self.cursor > 0 {
                    self.cursor = previous_boundary(&self.buffer, self.cursor);
                }
                vec![SessionAction::Render]
            },
            KeyCode::Right => {
                if self.cursor < self.buffer.len() {
                    self.cursor = next_boundary(&self.buffer, self.cursor);
                }
                vec![SessionAction::Render]
            },
            KeyCode::Home => {
                self.cursor = 0;
                vec![SessionAction::Render]
            },
            KeyCode::End => {
                self.cursor = self.buffer.len();
                vec![SessionAction::Render]
            },
            KeyCode::Enter => self.handle_submit(session),
            _ => vec![],
        }
    }

    /// Submit the buffer. The input field is cleared regardless of the send
    /// outcome; focus stays on the input.
    fn handle_submit(&mut self, session: &mut Session) -> Vec<SessionAction> {
        let text = std::mem::take(&mut self.buffer);
        self.cursor = 0;

        if text.is_empty() {
            return vec![];
        }
        session.send(&text)
    }
}

/// Byte index of the char boundary before `index`.
fn previous_boundary(s: &str, index: usize) -> usize {
    s[..index].char_indices().next_back().map_or(0, |(i, _)| i)
}

/// Byte index of the char boundary after `index`.
fn next_boundary(s: &str, index: usize) -> usize {
    s[index..].chars().next().map_or(index, |c| index + c.len_utf8())
}
