//! Backend trait for the messaging service.
//!
//! The [`Backend`] trait is the boundary to the externally supplied messaging
//! backend: authentication lifecycle, chat listing, bounded history fetches,
//! and outbound sends. The session layer never talks to a backend directly;
//! the runtime executes [`crate::SessionAction`]s against a backend handle
//! and feeds outcomes back as [`crate::SessionEvent`]s.

use std::future::Future;

use tokio::sync::mpsc;

use crate::{Chat, ChatId, RemoteMessage};

/// Events pushed by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendEvent {
    /// Authentication challenge issued (or re-issued).
    AuthChallenge {
        /// Scannable code to display.
        code: String,
    },

    /// Authentication completed; chat operations may now be used.
    Ready,

    /// Incoming message.
    Message(RemoteMessage),
}

/// Handle to a messaging backend.
///
/// Handles are cheap to clone so the runtime can spawn each call as its own
/// task; between issuing a call and its completion the event loop stays free
/// to process other events.
pub trait Backend: Clone + Send + Sync + 'static {
    /// Backend-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Take the backend's event stream.
    ///
    /// Lifecycle and message events are delivered to the first subscriber;
    /// later calls receive an already-closed channel.
    fn subscribe(&self) -> mpsc::Receiver<BackendEvent>;

    /// List all known chats in display order.
    fn list_chats(&self) -> impl Future<Output = Result<Vec<Chat>, Self::Error>> + Send;

    /// Fetch the `limit` most recent messages for a chat, oldest first.
    fn recent_messages(
        &self,
        chat: ChatId,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<RemoteMessage>, Self::Error>> + Send;

    /// Deliver a text message to a chat.
    fn send_text(
        &self,
        chat: ChatId,
        body: String,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;
}
