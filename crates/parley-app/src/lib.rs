//! Session layer for Parley
//!
//! Pure state machines and model types for the terminal messenger, completely
//! decoupled from terminal I/O and from any concrete messaging backend.
//!
//! # Components
//!
//! - [`Session`]: session state machine (auth phase, active chat, transcript)
//! - [`Directory`]: ordered snapshot of known chats
//! - [`Transcript`]: append-only line buffer for the active chat
//! - [`Backend`]: trait for the externally supplied messaging backend
//! - [`emoji`]: shorthand-to-glyph normalization

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod backend;
mod chat;
mod directory;
pub mod emoji;
mod event;
mod session;
mod transcript;

pub use action::SessionAction;
pub use backend::{Backend, BackendEvent};
pub use chat::{Chat, ChatId, RemoteMessage};
pub use directory::{Directory, DirectoryError};
pub use event::SessionEvent;
pub use session::{HISTORY_WINDOW, Session, SessionPhase};
pub use transcript::Transcript;
