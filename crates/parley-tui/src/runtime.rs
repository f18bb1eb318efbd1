//! Async runtime.
//!
//! Event loop that drives terminal I/O and executes session actions against
//! the messaging backend. Uses `tokio::select!` over three sources: terminal
//! events, backend lifecycle/message events, and completions of backend
//! calls issued earlier.
//!
//! Backend calls are spawned as tasks; between issuing a call and its
//! completion the loop stays free to process other events. There is no
//! cancellation of in-flight calls: a completion that no longer matches the
//! active chat is discarded inside [`Session`].

use std::io::{self, stdout};

use crossterm::{
    ExecutableCommand,
    event::{Event, EventStream, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use parley_app::{
    Backend, BackendEvent, ChatId, HISTORY_WINDOW, Session, SessionAction, SessionEvent,
};
use ratatui::{Terminal, backend::CrosstermBackend};
use thiserror::Error;
use tokio::sync::mpsc;

use crate::{input::InputRouter, ui};

/// Runtime errors.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// I/O error from terminal operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Async runtime for the TUI.
///
/// Manages terminal setup/teardown and the main event loop coordinating the
/// [`Session`] state machine, the [`InputRouter`], and the backend.
pub struct Runtime<B: Backend> {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    session: Session,
    router: InputRouter,
    backend: B,
    backend_events: mpsc::Receiver<BackendEvent>,
    completions_tx: mpsc::Sender<SessionEvent>,
    completions_rx: mpsc::Receiver<SessionEvent>,
}

impl<B: Backend> Runtime<B> {
    /// Create a runtime over a backend, entering the alternate screen.
    pub fn new(backend: B) -> Result<Self, RuntimeError> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;

        let terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
        let backend_events = backend.subscribe();
        let (completions_tx, completions_rx) = mpsc::channel(32);

        Ok(Self {
            terminal,
            session: Session::new(),
            router: InputRouter::new(),
            backend,
            backend_events,
            completions_tx,
            completions_rx,
        })
    }

    /// Run the main event loop until quit.
    pub async fn run(mut self) -> Result<(), RuntimeError> {
        self.render()?;

        let mut terminal_events = EventStream::new();

        loop {
            let event = tokio::select! {
                maybe_event = terminal_events.next() => {
                    match maybe_event {
                        Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                            let actions = self.router.handle_key(key, &mut self.session);
                            if self.process_actions(actions)? {
                                break;
                            }
                            continue;
                        },
                        Some(Ok(Event::Resize(_, _))) => {
                            self.render()?;
                            continue;
                        },
                        Some(Ok(_)) => continue,
                        Some(Err(e)) => return Err(RuntimeError::Io(e)),
                        None => break,
                    }
                },

                Some(event) = self.backend_events.recv() => lift(event),

                Some(event) = self.completions_rx.recv() => event,
            };

            let actions = self.session.handle(event);
            self.router.clamp_list_cursor(self.session.directory().len());
            if self.process_actions(actions)? {
                break;
            }
        }

        Ok(())
    }

    /// Execute actions returned by the session. Returns `true` on quit.
    fn process_actions(&mut self, actions: Vec<SessionAction>) -> Result<bool, RuntimeError> {
        for action in actions {
            match action {
                SessionAction::Render => self.render()?,
                SessionAction::Quit => return Ok(true),
                SessionAction::RefreshDirectory => self.spawn_directory_refresh(),
                SessionAction::FetchHistory { chat } => self.spawn_history_fetch(chat),
                SessionAction::Send { chat, body } => self.spawn_send(chat, body),
                SessionAction::RestoreInput { text } => self.router.restore(text),
            }
        }
        Ok(false)
    }

    fn spawn_directory_refresh(&self) {
        let backend = self.backend.clone();
        let tx = self.completions_tx.clone();
        tokio::spawn(async move {
            let event = match backend.list_chats().await {
                Ok(chats) => SessionEvent::DirectoryLoaded { chats },
                Err(err) => SessionEvent::DirectoryFailed { reason: err.to_string() },
            };
            if tx.send(event).await.is_err() {
                tracing::debug!("runtime gone before directory refresh completed");
            }
        });
    }

    fn spawn_history_fetch(&self, chat: ChatId) {
        let backend = self.backend.clone();
        let tx = self.completions_tx.clone();
        tokio::spawn(async move {
            let event = match backend.recent_messages(chat.clone(), HISTORY_WINDOW).await {
                Ok(messages) => SessionEvent::HistoryLoaded { chat, messages },
                Err(err) => SessionEvent::HistoryFailed { chat, reason: err.to_string() },
            };
            if tx.send(event).await.is_err() {
                tracing::debug!("runtime gone before history fetch completed");
            }
        });
    }

    fn spawn_send(&self, chat: ChatId, body: String) {
        let backend = self.backend.clone();
        let tx = self.completions_tx.clone();
        tokio::spawn(async move {
            let event = match backend.send_text(chat.clone(), body.clone()).await {
                Ok(()) => SessionEvent::SendCompleted { chat, body },
                Err(err) => SessionEvent::SendFailed { chat, body, reason: err.to_string() },
            };
            if tx.send(event).await.is_err() {
                tracing::debug!("runtime gone before send completed");
            }
        });
    }

    /// Render the UI.
    fn render(&mut self) -> Result<(), RuntimeError> {
        self.terminal.draw(|frame| {
            ui::render(frame, &self.session, &self.router);
        })?;
        Ok(())
    }
}

/// Translate a backend event into a session event.
fn lift(event: BackendEvent) -> SessionEvent {
    match event {
        BackendEvent::AuthChallenge { code } => SessionEvent::AuthChallenge { code },
        BackendEvent::Ready => SessionEvent::Ready,
        BackendEvent::Message(message) => SessionEvent::MessageReceived(message),
    }
}

impl<B: Backend> Drop for Runtime<B> {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = stdout().execute(LeaveAlternateScreen);
    }
}
