//! Session events.
//!
//! Events fed into the [`crate::Session`] state machine: backend lifecycle
//! notifications, incoming messages, and completions of backend calls the
//! runtime issued on the session's behalf.

use crate::{Chat, ChatId, RemoteMessage};

/// Events processed by the session state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Backend issued (or re-issued) an authentication challenge.
    AuthChallenge {
        /// Scannable code to display to the user.
        code: String,
    },

    /// Backend finished authenticating; chat data is now available.
    Ready,

    /// Directory refresh completed.
    DirectoryLoaded {
        /// Fresh ordered snapshot, replaces the previous one wholesale.
        chats: Vec<Chat>,
    },

    /// Directory refresh failed; the previous snapshot stays in place.
    DirectoryFailed {
        /// Human-readable failure description.
        reason: String,
    },

    /// Recent-message fetch completed for a chat.
    HistoryLoaded {
        /// Chat the fetch was issued for. Stale results are discarded when
        /// this no longer matches the active chat.
        chat: ChatId,
        /// Bounded window of recent messages, oldest first.
        messages: Vec<RemoteMessage>,
    },

    /// Recent-message fetch failed for a chat.
    HistoryFailed {
        /// Chat the fetch was issued for.
        chat: ChatId,
        /// Human-readable failure description.
        reason: String,
    },

    /// A message arrived from the backend.
    MessageReceived(RemoteMessage),

    /// Outbound send was delivered.
    SendCompleted {
        /// Chat the message was sent to.
        chat: ChatId,
        /// Normalized body, echoed locally.
        body: String,
    },

    /// Outbound send failed.
    SendFailed {
        /// Chat the message was sent to.
        chat: ChatId,
        /// Normalized body, handed back so the input is recoverable.
        body: String,
        /// Human-readable failure description.
        reason: String,
    },
}
