//! Model types shared between the session layer and backends.

use std::fmt;

/// Opaque stable identifier for a chat.
///
/// The session stores the active chat by identity rather than by holding a
/// [`Chat`] value, so a directory refresh can replace chat values without
/// invalidating the selection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChatId(String);

impl ChatId {
    /// Create an identifier from its backend-serialized form.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The serialized identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChatId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A chat known to the backend.
///
/// Created wholesale when the directory is (re)loaded; never mutated in
/// place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chat {
    /// Stable identity.
    pub id: ChatId,
    /// Display name. `None` for chats the backend has no name for.
    pub name: Option<String>,
    /// Secondary identifier shown when no name is set (a phone number).
    pub handle: String,
}

impl Chat {
    /// Create a chat entry.
    pub fn new(id: ChatId, name: Option<String>, handle: impl Into<String>) -> Self {
        Self { id, name, handle: handle.into() }
    }

    /// Display label: the name, falling back to the handle.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.handle)
    }
}

/// A message as delivered by the backend.
///
/// Transient: only ever formatted into transcript lines, never stored beyond
/// the in-memory transcript buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteMessage {
    /// Chat the message belongs to.
    pub chat: ChatId,
    /// Sender display name, if the backend resolved one.
    pub sender: Option<String>,
    /// Raw body text, pre-normalization.
    pub body: String,
    /// Whether the message was sent by this account.
    pub from_me: bool,
}
