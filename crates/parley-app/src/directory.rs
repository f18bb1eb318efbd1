//! Chat directory.
//!
//! Ordered snapshot of the chats known to the backend. The snapshot is only
//! ever replaced wholesale; readers either see the previous set fully or the
//! new one fully.

use thiserror::Error;

use crate::{Chat, ChatId};

/// Errors from directory lookups.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    /// A list selection referenced a position outside the current snapshot
    /// (the directory changed between render and selection).
    #[error("chat index {index} out of range for {len} chats")]
    OutOfRange {
        /// Requested position.
        index: usize,
        /// Size of the current snapshot.
        len: usize,
    },
}

/// Ordered snapshot of known chats.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    chats: Vec<Chat>,
}

impl Directory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the entire snapshot with a freshly loaded set.
    pub fn replace(&mut self, chats: Vec<Chat>) {
        self.chats = chats;
    }

    /// Chat at a list position.
    pub fn at(&self, index: usize) -> Result<&Chat, DirectoryError> {
        self.chats
            .get(index)
            .ok_or(DirectoryError::OutOfRange { index, len: self.chats.len() })
    }

    /// Resolve a chat by identity. `None` if it is not in the snapshot.
    pub fn by_id(&self, id: &ChatId) -> Option<&Chat> {
        self.chats.iter().find(|chat| &chat.id == id)
    }

    /// List position of a chat identity within the snapshot.
    pub fn position(&self, id: &ChatId) -> Option<usize> {
        self.chats.iter().position(|chat| &chat.id == id)
    }

    /// First entry of the snapshot.
    pub fn first(&self) -> Option<&Chat> {
        self.chats.first()
    }

    /// Iterate over the snapshot in display order.
    pub fn iter(&self) -> impl Iterator<Item = &Chat> {
        self.chats.iter()
    }

    /// Number of chats in the snapshot.
    pub fn len(&self) -> usize {
        self.chats.len()
    }

    /// Whether the snapshot is empty.
    pub fn is_empty(&self) -> bool {
        self.chats.is_empty()
    }
}
