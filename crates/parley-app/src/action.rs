//! Session actions.
//!
//! Actions produced by the [`crate::Session`] state machine for the runtime
//! to execute. Backend calls are asynchronous; their completions re-enter the
//! state machine as [`crate::SessionEvent`]s.

use crate::ChatId;

/// Actions produced by the session state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// Redraw the UI.
    Render,

    /// Quit the application.
    Quit,

    /// Reload the chat directory from the backend.
    RefreshDirectory,

    /// Fetch the recent-message window for a chat.
    FetchHistory {
        /// Chat to fetch; tags the in-flight call so a superseded completion
        /// can be discarded.
        chat: ChatId,
    },

    /// Deliver a text message to a chat.
    Send {
        /// Destination chat.
        chat: ChatId,
        /// Normalized body.
        body: String,
    },

    /// Put text back into the input field after a failed send.
    RestoreInput {
        /// Text to restore.
        text: String,
    },
}
