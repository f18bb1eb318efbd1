//! In-process simulated backend.
//!
//! Scripted stand-in for a real messaging service: no network, events flow
//! through mpsc channels. Emits an authentication challenge followed by
//! ready, owns a canned chat directory with per-chat history, acknowledges
//! sends, and periodically delivers scripted incoming messages.
//!
//! Used by the binary (the real backend is out of scope) and by tests, which
//! can also inject failures per operation.

use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex, MutexGuard, atomic::AtomicBool, atomic::Ordering},
    time::Duration,
};

use parley_app::{Backend, BackendEvent, Chat, ChatId, RemoteMessage};
use rand::Rng;
use thiserror::Error;
use tokio::sync::mpsc;

/// Pseudo scan code shown on the authentication screen.
const CHALLENGE_CODE: &str = "\
█▀▀▀▀▀█ ▀▄█▄▀ █▀▀▀▀▀█\n\
█ ███ █ ▄▀▄▄▄ █ ███ █\n\
█ ▀▀▀ █ █▄▀ ▄ █ ▀▀▀ █\n\
▀▀▀▀▀▀▀ █▄▀▄█ ▀▀▀▀▀▀▀\n\
▄█▀▄▀▀▄▀▄▄██▄▀█▄▄█▀▄▀\n\
▀▄▄▀▀█▄█▀▄▀▀▄▀▄▄▀█▄▄█";

/// Lines the scripted contacts send while the app runs.
const SCRIPTED_LINES: &[&str] = &[
    "are you seeing this? :eyes:",
    "ship it :rocket:",
    "lunch at 12? :pizza:",
    "ok :+1:",
    "that fix worked, thanks! :tada:",
];

/// Delay between the challenge and the ready event.
const AUTH_DELAY: Duration = Duration::from_millis(800);

/// Errors from the simulated backend.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimError {
    /// Operation targeted a chat the backend does not know.
    #[error("chat {0} is not known to the backend")]
    UnknownChat(ChatId),

    /// A test injected a failure for this operation.
    #[error("simulated {0} failure")]
    Injected(&'static str),
}

struct SimInner {
    chats: Vec<Chat>,
    histories: Mutex<HashMap<ChatId, Vec<RemoteMessage>>>,
    events: Mutex<Option<mpsc::Receiver<BackendEvent>>>,
    fail_history: Mutex<HashSet<ChatId>>,
    fail_sends: AtomicBool,
}

/// Handle to the simulated backend.
#[derive(Clone)]
pub struct SimBackend {
    inner: Arc<SimInner>,
}

impl SimBackend {
    /// Spawn a simulated backend.
    ///
    /// `cadence` is the interval between scripted incoming messages; the
    /// driving task stops when the last handle is dropped.
    pub fn spawn(cadence: Duration) -> Self {
        let backend = Self::with_directory(seed_chats(), seed_histories());
        backend.spawn_script(cadence);
        backend
    }

    /// Create a backend over an explicit directory and history, without the
    /// scripted message task. Tests drive lifecycle events via
    /// [`SimBackend::spawn_script`] or use the data operations directly.
    pub fn with_directory(
        chats: Vec<Chat>,
        histories: HashMap<ChatId, Vec<RemoteMessage>>,
    ) -> Self {
        Self {
            inner: Arc::new(SimInner {
                chats,
                histories: Mutex::new(histories),
                events: Mutex::new(None),
                fail_history: Mutex::new(HashSet::new()),
                fail_sends: AtomicBool::new(false),
            }),
        }
    }

    /// Start the lifecycle script: challenge, ready, then scripted incoming
    /// messages every `cadence`.
    pub fn spawn_script(&self, cadence: Duration) {
        let (tx, rx) = mpsc::channel(32);
        *lock(&self.inner.events) = Some(rx);

        let inner = Arc::downgrade(&self.inner);
        tokio::spawn(async move {
            if tx
                .send(BackendEvent::AuthChallenge { code: CHALLENGE_CODE.to_string() })
                .await
                .is_err()
            {
                return;
            }
            tokio::time::sleep(AUTH_DELAY).await;
            if tx.send(BackendEvent::Ready).await.is_err() {
                return;
            }

            let mut line = 0usize;
            loop {
                tokio::time::sleep(cadence).await;
                let Some(inner) = inner.upgrade() else {
                    return;
                };
                if inner.chats.is_empty() {
                    return;
                }

                let index = rand::rng().random_range(0..inner.chats.len());
                let chat = &inner.chats[index];
                let message = RemoteMessage {
                    chat: chat.id.clone(),
                    sender: chat.name.clone(),
                    body: SCRIPTED_LINES[line % SCRIPTED_LINES.len()].to_string(),
                    from_me: false,
                };
                line = line.wrapping_add(1);

                lock(&inner.histories).entry(chat.id.clone()).or_default().push(message.clone());
                if tx.send(BackendEvent::Message(message)).await.is_err() {
                    return;
                }
            }
        });
    }

    /// Make history fetches fail for `chat` until cleared.
    pub fn fail_history_for(&self, chat: ChatId) {
        lock(&self.inner.fail_history).insert(chat);
    }

    /// Make all outbound sends fail (or succeed again).
    pub fn fail_sends(&self, fail: bool) {
        self.inner.fail_sends.store(fail, Ordering::Relaxed);
    }
}

impl Backend for SimBackend {
    type Error = SimError;

    fn subscribe(&self) -> mpsc::Receiver<BackendEvent> {
        match lock(&self.inner.events).take() {
            Some(rx) => rx,
            None => {
                // Already subscribed (or no script running): closed channel.
                let (_tx, rx) = mpsc::channel(1);
                rx
            },
        }
    }

    async fn list_chats(&self) -> Result<Vec<Chat>, SimError> {
        Ok(self.inner.chats.clone())
    }

    async fn recent_messages(
        &self,
        chat: ChatId,
        limit: usize,
    ) -> Result<Vec<RemoteMessage>, SimError> {
        if lock(&self.inner.fail_history).contains(&chat) {
            return Err(SimError::Injected("history fetch"));
        }
        if !self.inner.chats.iter().any(|c| c.id == chat) {
            return Err(SimError::UnknownChat(chat));
        }

        let histories = lock(&self.inner.histories);
        let messages = histories.get(&chat).map_or(&[][..], Vec::as_slice);
        // Newest-bounded window, oldest first.
        Ok(messages[messages.len().saturating_sub(limit)..].to_vec())
    }

    async fn send_text(&self, chat: ChatId, body: String) -> Result<(), SimError> {
        if self.inner.fail_sends.load(Ordering::Relaxed) {
            return Err(SimError::Injected("send"));
        }
        if !self.inner.chats.iter().any(|c| c.id == chat) {
            return Err(SimError::UnknownChat(chat));
        }

        let message =
            RemoteMessage { chat: chat.clone(), sender: None, body, from_me: true };
        lock(&self.inner.histories).entry(chat).or_default().push(message);
        Ok(())
    }
}

/// Lock a mutex, recovering the guard if a test thread panicked with it held.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

fn seed_chats() -> Vec<Chat> {
    vec![
        Chat::new(ChatId::from("15550100@sim"), Some("Ada Lovelace".into()), "+1 555 0100"),
        Chat::new(ChatId::from("15550101@sim"), Some("Grace Hopper".into()), "+1 555 0101"),
        Chat::new(ChatId::from("15550102@sim"), None, "+1 555 0102"),
    ]
}

fn seed_histories() -> HashMap<ChatId, Vec<RemoteMessage>> {
    let mut histories = HashMap::new();

    // Enough backlog in the first chat to exercise the fetch window bound.
    let ada = ChatId::from("15550100@sim");
    let mut backlog = Vec::new();
    for n in 1..=25 {
        backlog.push(RemoteMessage {
            chat: ada.clone(),
            sender: Some("Ada Lovelace".into()),
            body: format!("backlog message {n}"),
            from_me: n % 3 == 0,
        });
    }
    histories.insert(ada, backlog);

    let grace = ChatId::from("15550101@sim");
    histories.insert(grace.clone(), vec![
        RemoteMessage {
            chat: grace.clone(),
            sender: Some("Grace Hopper".into()),
            body: "a ship in port is safe :anchor:".into(),
            from_me: false,
        },
        RemoteMessage {
            chat: grace,
            sender: None,
            body: "but that is not what ships are built for".into(),
            from_me: true,
        },
    ]);

    histories
}

#[cfg(test)]
mod tests {
    use parley_app::HISTORY_WINDOW;

    use super::*;

    #[tokio::test]
    async fn script_emits_challenge_then_ready() {
        let backend = SimBackend::spawn(Duration::from_secs(60));
        let mut events = backend.subscribe();

        let first = events.recv().await.expect("challenge event");
        assert!(matches!(first, BackendEvent::AuthChallenge { .. }));

        let second = events.recv().await.expect("ready event");
        assert_eq!(second, BackendEvent::Ready);
    }

    #[tokio::test]
    async fn second_subscriber_gets_closed_channel() {
        let backend = SimBackend::spawn(Duration::from_secs(60));
        let _events = backend.subscribe();

        let mut second = backend.subscribe();
        assert!(second.recv().await.is_none());
    }

    #[tokio::test]
    async fn recent_messages_bounded_and_oldest_first() {
        let backend = SimBackend::with_directory(seed_chats(), seed_histories());
        let ada = ChatId::from("15550100@sim");

        let window = backend.recent_messages(ada, HISTORY_WINDOW).await.expect("window");

        assert_eq!(window.len(), HISTORY_WINDOW);
        // 25 seeded; the 5 oldest fall outside the window.
        assert_eq!(window[0].body, "backlog message 6");
        assert_eq!(window[HISTORY_WINDOW - 1].body, "backlog message 25");
    }

    #[tokio::test]
    async fn send_appends_to_history() {
        let backend = SimBackend::with_directory(seed_chats(), seed_histories());
        let grace = ChatId::from("15550101@sim");

        backend.send_text(grace.clone(), "aye".into()).await.expect("send");

        let window = backend.recent_messages(grace, HISTORY_WINDOW).await.expect("window");
        let last = window.last().expect("nonempty");
        assert_eq!(last.body, "aye");
        assert!(last.from_me);
    }

    #[tokio::test]
    async fn injected_failures_surface_as_errors() {
        let backend = SimBackend::with_directory(seed_chats(), seed_histories());
        let ada = ChatId::from("15550100@sim");

        backend.fail_history_for(ada.clone());
        assert_eq!(
            backend.recent_messages(ada.clone(), 5).await,
            Err(SimError::Injected("history fetch"))
        );

        backend.fail_sends(true);
        assert_eq!(backend.send_text(ada, "x".into()).await, Err(SimError::Injected("send")));
    }

    #[tokio::test]
    async fn unknown_chat_is_rejected() {
        let backend = SimBackend::with_directory(seed_chats(), seed_histories());
        let ghost = ChatId::from("ghost@sim");

        assert!(matches!(
            backend.recent_messages(ghost.clone(), 5).await,
            Err(SimError::UnknownChat(_))
        ));
        assert!(matches!(
            backend.send_text(ghost, "x".into()).await,
            Err(SimError::UnknownChat(_))
        ));
    }
}
