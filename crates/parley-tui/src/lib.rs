//! Terminal UI for Parley
//!
//! A thin shell over [`parley_app`] that provides terminal-specific I/O:
//! crossterm input, ratatui rendering, and a tokio event loop that executes
//! session actions against a messaging backend. All coordination logic lives
//! in [`parley_app::Session`].

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod input;
pub mod runtime;
pub mod sim;
pub mod ui;

pub use input::{Focus, InputRouter};
pub use runtime::{Runtime, RuntimeError};
pub use sim::SimBackend;
