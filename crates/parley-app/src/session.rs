//! Session state machine.
//!
//! The [`Session`] is the single authority for "which chat is active" and the
//! single writer of the visible transcript. It is a pure state machine in the
//! event/action style: backend events and call completions come in as
//! [`SessionEvent`]s, instructions for the runtime go out as
//! [`SessionAction`]s. No I/O dependencies, fully testable synchronously.
//!
//! Ordering rule: redraws reflect the most recently *completed* state
//! mutation. A history fetch issued for chat A that completes after chat B
//! became active is discarded here, by comparing the completion's chat tag
//! against the active chat ("last call to start wins").

use crate::{ChatId, Directory, RemoteMessage, SessionAction, SessionEvent, Transcript, emoji};

/// How many recent messages a chat switch fetches.
pub const HISTORY_WINDOW: usize = 20;

/// Authentication phase of the session.
///
/// Transitions only move forward within a run:
/// `Unauthenticated -> Authenticating -> Ready`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SessionPhase {
    /// Backend connection not yet challenged.
    Unauthenticated,
    /// Challenge shown, waiting for the user to complete it.
    Authenticating,
    /// Authenticated; chat data available.
    Ready,
}

impl Default for SessionPhase {
    fn default() -> Self {
        Self::Unauthenticated
    }
}

/// Session state machine.
///
/// Owns the active-chat reference (by identity, not by value) and the
/// transcript buffer for the active chat. No other component writes either.
#[derive(Debug, Clone, Default)]
pub struct Session {
    phase: SessionPhase,
    /// Current challenge to display while authenticating.
    challenge: Option<String>,
    directory: Directory,
    /// Active chat identity. `None` until the directory has an entry.
    active: Option<ChatId>,
    transcript: Transcript,
    /// Transient status notice. `None` if nothing to report.
    status: Option<String>,
}

impl Session {
    /// Create a session in the unauthenticated phase.
    pub fn new() -> Self {
        Self::default()
    }

    /// Process an event and return actions for the runtime.
    pub fn handle(&mut self, event: SessionEvent) -> Vec<SessionAction> {
        match event {
            SessionEvent::AuthChallenge { code } => self.on_challenge(code),
            SessionEvent::Ready => self.on_ready(),
            SessionEvent::DirectoryLoaded { chats } => self.on_directory_loaded(chats),
            SessionEvent::DirectoryFailed { reason } => {
                // Prior snapshot stays in place; surface a notice instead of
                // an unchanged list with no explanation.
                self.status = Some(format!("chat list refresh failed: {reason}"));
                vec![SessionAction::Render]
            },
            SessionEvent::HistoryLoaded { chat, messages } => {
                self.on_history_loaded(&chat, messages)
            },
            SessionEvent::HistoryFailed { chat, reason } => {
                if self.active.as_ref() != Some(&chat) {
                    tracing::debug!(%chat, "discarding failure of superseded history fetch");
                    return vec![];
                }
                self.transcript.show_error(format!("Error: failed to load messages: {reason}"));
                vec![SessionAction::Render]
            },
            SessionEvent::MessageReceived(message) => self.on_message(message),
            SessionEvent::SendCompleted { chat, body } => {
                if self.active.as_ref() != Some(&chat) {
                    tracing::debug!(%chat, "dropping send echo for inactive chat");
                    return vec![];
                }
                self.transcript.append(format!("You: {body}"));
                vec![SessionAction::Render]
            },
            SessionEvent::SendFailed { chat, body, reason } => self.on_send_failed(chat, body, reason),
        }
    }

    /// Set the chat at a directory position active and start loading its
    /// recent messages.
    ///
    /// A stale index (directory changed between render and selection) is
    /// ignored rather than crashing the session.
    pub fn select_chat(&mut self, index: usize) -> Vec<SessionAction> {
        let chat = match self.directory.at(index) {
            Ok(chat) => chat.id.clone(),
            Err(err) => {
                tracing::debug!(%err, "ignoring stale chat selection");
                return vec![];
            },
        };
        self.activate(chat)
    }

    /// Request delivery of `text` to the active chat.
    ///
    /// With no active chat this is a no-op beyond a redraw (the caller has
    /// already cleared the input field either way).
    pub fn send(&mut self, text: &str) -> Vec<SessionAction> {
        let Some(chat) = self.active.clone() else {
            return vec![SessionAction::Render];
        };
        let body = emoji::normalize(text);
        vec![SessionAction::Send { chat, body }, SessionAction::Render]
    }

    /// Quit the application.
    pub fn quit(&self) -> Vec<SessionAction> {
        vec![SessionAction::Quit]
    }

    fn on_challenge(&mut self, code: String) -> Vec<SessionAction> {
        if self.phase == SessionPhase::Ready {
            // Phase never reverts within a run.
            tracing::warn!("ignoring auth challenge after session became ready");
            return vec![];
        }
        self.phase = SessionPhase::Authenticating;
        self.challenge = Some(code);
        vec![SessionAction::Render]
    }

    fn on_ready(&mut self) -> Vec<SessionAction> {
        if self.phase == SessionPhase::Ready {
            tracing::debug!("duplicate ready event");
            return vec![];
        }
        self.phase = SessionPhase::Ready;
        self.challenge = None;
        vec![SessionAction::RefreshDirectory, SessionAction::Render]
    }

    fn on_directory_loaded(&mut self, chats: Vec<crate::Chat>) -> Vec<SessionAction> {
        let active_survives =
            self.active.as_ref().is_some_and(|id| chats.iter().any(|chat| &chat.id == id));
        self.directory.replace(chats);
        self.status = None;

        if active_survives {
            // Selection survives by identity; no refetch needed.
            return vec![SessionAction::Render];
        }

        match self.directory.first() {
            Some(chat) => {
                let id = chat.id.clone();
                self.activate(id)
            },
            None => {
                self.active = None;
                self.transcript.reset();
                vec![SessionAction::Render]
            },
        }
    }

    fn on_history_loaded(
        &mut self,
        chat: &ChatId,
        messages: Vec<RemoteMessage>,
    ) -> Vec<SessionAction> {
        if self.active.as_ref() != Some(chat) {
            tracing::debug!(%chat, "discarding superseded history fetch");
            return vec![];
        }
        self.transcript.reset();
        for message in messages {
            let line = self.format_line(&message);
            self.transcript.append(line);
        }
        vec![SessionAction::Render]
    }

    fn on_message(&mut self, message: RemoteMessage) -> Vec<SessionAction> {
        if self.active.as_ref() != Some(&message.chat) {
            // No buffering or unread badge for inactive chats; a later
            // selection re-fetches the window instead.
            tracing::debug!(chat = %message.chat, "dropping message for inactive chat");
            return vec![];
        }
        let line = self.format_line(&message);
        self.transcript.append(line);
        vec![SessionAction::Render]
    }

    fn on_send_failed(
        &mut self,
        chat: ChatId,
        body: String,
        reason: String,
    ) -> Vec<SessionAction> {
        if self.active.as_ref() == Some(&chat) {
            self.transcript.append(format!("[!] send failed: {reason}"));
            vec![SessionAction::RestoreInput { text: body }, SessionAction::Render]
        } else {
            // The user has moved on; don't clobber whatever they are typing.
            self.status = Some(format!("send to {chat} failed: {reason}"));
            vec![SessionAction::Render]
        }
    }

    /// Switch the active chat and start loading its window.
    fn activate(&mut self, chat: ChatId) -> Vec<SessionAction> {
        self.active = Some(chat.clone());
        self.transcript.reset();
        vec![SessionAction::FetchHistory { chat }, SessionAction::Render]
    }

    /// Format a message as `sender label: normalized body`.
    fn format_line(&self, message: &RemoteMessage) -> String {
        let body = emoji::normalize(&message.body);
        format!("{}: {body}", self.sender_label(message))
    }

    /// Resolve the sender label: self, resolved display name, or unknown.
    fn sender_label(&self, message: &RemoteMessage) -> String {
        if message.from_me {
            return "You".to_string();
        }
        if let Some(sender) = &message.sender {
            return sender.clone();
        }
        self.directory
            .by_id(&message.chat)
            .map_or_else(|| "Unknown".to_string(), |chat| chat.label().to_string())
    }

    /// Current authentication phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Challenge to display while authenticating. `None` otherwise.
    pub fn challenge(&self) -> Option<&str> {
        self.challenge.as_deref()
    }

    /// The chat directory snapshot.
    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    /// Active chat identity. `None` if no chat is selected.
    pub fn active_chat(&self) -> Option<&ChatId> {
        self.active.as_ref()
    }

    /// Directory entry of the active chat, re-resolved by identity.
    pub fn active_chat_entry(&self) -> Option<&crate::Chat> {
        self.active.as_ref().and_then(|id| self.directory.by_id(id))
    }

    /// Transcript of the active chat.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Transient status notice. `None` if nothing to report.
    pub fn status_message(&self) -> Option<&str> {
        self.status.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Chat;

    fn chat(id: &str, name: &str) -> Chat {
        Chat::new(ChatId::from(id), Some(name.to_string()), "+000")
    }

    fn ready_session(chats: Vec<Chat>) -> Session {
        let mut session = Session::new();
        let _ = session.handle(SessionEvent::Ready);
        let _ = session.handle(SessionEvent::DirectoryLoaded { chats });
        session
    }

    #[test]
    fn challenge_moves_to_authenticating_and_is_idempotent() {
        let mut session = Session::new();

        let actions = session.handle(SessionEvent::AuthChallenge { code: "code-1".into() });
        assert_eq!(actions, [SessionAction::Render]);
        assert_eq!(session.phase(), SessionPhase::Authenticating);

        // Re-issued challenge re-renders without changing phase.
        let actions = session.handle(SessionEvent::AuthChallenge { code: "code-2".into() });
        assert_eq!(actions, [SessionAction::Render]);
        assert_eq!(session.phase(), SessionPhase::Authenticating);
        assert_eq!(session.challenge(), Some("code-2"));
    }

    #[test]
    fn ready_triggers_directory_refresh() {
        let mut session = Session::new();
        let _ = session.handle(SessionEvent::AuthChallenge { code: "code".into() });

        let actions = session.handle(SessionEvent::Ready);
        assert_eq!(actions, [SessionAction::RefreshDirectory, SessionAction::Render]);
        assert_eq!(session.phase(), SessionPhase::Ready);
        assert_eq!(session.challenge(), None);
    }

    #[test]
    fn phase_never_reverts_after_ready() {
        let mut session = Session::new();
        let _ = session.handle(SessionEvent::Ready);

        let actions = session.handle(SessionEvent::AuthChallenge { code: "late".into() });
        assert!(actions.is_empty());
        assert_eq!(session.phase(), SessionPhase::Ready);
    }

    #[test]
    fn first_directory_load_selects_first_chat() {
        let session = ready_session(vec![chat("a", "Ada"), chat("b", "Bea")]);
        assert_eq!(session.active_chat(), Some(&ChatId::from("a")));
    }

    #[test]
    fn empty_directory_leaves_no_active_chat() {
        let mut session = ready_session(vec![]);
        assert_eq!(session.active_chat(), None);

        // Sends with no active chat still redraw (input was cleared).
        let actions = session.send("hello");
        assert_eq!(actions, [SessionAction::Render]);
    }

    #[test]
    fn select_chat_clears_transcript_and_fetches() {
        let mut session = ready_session(vec![chat("a", "Ada"), chat("b", "Bea")]);
        session.transcript.append("leftover");

        let actions = session.select_chat(1);
        assert_eq!(actions, [
            SessionAction::FetchHistory { chat: ChatId::from("b") },
            SessionAction::Render
        ]);
        assert_eq!(session.active_chat(), Some(&ChatId::from("b")));
        assert!(session.transcript().is_empty());
    }

    #[test]
    fn stale_selection_is_ignored() {
        let mut session = ready_session(vec![chat("a", "Ada")]);

        let actions = session.select_chat(7);
        assert!(actions.is_empty());
        assert_eq!(session.active_chat(), Some(&ChatId::from("a")));
    }

    #[test]
    fn send_normalizes_before_dispatch() {
        let mut session = ready_session(vec![chat("a", "Ada")]);

        let actions = session.send("hi :smile:");
        assert_eq!(actions, [
            SessionAction::Send { chat: ChatId::from("a"), body: "hi \u{1f604}".into() },
            SessionAction::Render
        ]);
    }

    #[test]
    fn sender_label_resolution() {
        let session = ready_session(vec![chat("a", "Ada")]);

        let mine = RemoteMessage {
            chat: ChatId::from("a"),
            sender: None,
            body: "x".into(),
            from_me: true,
        };
        assert_eq!(session.format_line(&mine), "You: x");

        let named = RemoteMessage {
            chat: ChatId::from("a"),
            sender: Some("Ada L.".into()),
            body: "x".into(),
            from_me: false,
        };
        assert_eq!(session.format_line(&named), "Ada L.: x");

        let unnamed = RemoteMessage {
            chat: ChatId::from("a"),
            sender: None,
            body: "x".into(),
            from_me: false,
        };
        assert_eq!(session.format_line(&unnamed), "Ada: x");

        let stranger = RemoteMessage {
            chat: ChatId::from("ghost"),
            sender: None,
            body: "x".into(),
            from_me: false,
        };
        assert_eq!(session.format_line(&stranger), "Unknown: x");
    }
}
