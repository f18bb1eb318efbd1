//! Scenario tests for the session state machine.
//!
//! # Oracle pattern
//!
//! Each test walks a realistic event sequence and ends with oracle checks on
//! the visible state: the active chat, the transcript lines, and the actions
//! handed to the runtime.

use parley_app::{
    Chat, ChatId, RemoteMessage, Session, SessionAction, SessionEvent, SessionPhase,
};

fn chat(id: &str, name: &str) -> Chat {
    Chat::new(ChatId::from(id), Some(name.to_string()), "+15550100")
}

fn incoming(chat: &str, sender: &str, body: &str) -> RemoteMessage {
    RemoteMessage {
        chat: ChatId::from(chat),
        sender: Some(sender.to_string()),
        body: body.to_string(),
        from_me: false,
    }
}

/// Drive a session to ready with the given directory.
fn ready_session(chats: Vec<Chat>) -> Session {
    let mut session = Session::new();
    let actions = session.handle(SessionEvent::Ready);
    assert!(actions.contains(&SessionAction::RefreshDirectory));
    let _ = session.handle(SessionEvent::DirectoryLoaded { chats });
    session
}

/// Extract the chats of all `FetchHistory` actions.
fn fetches(actions: &[SessionAction]) -> Vec<ChatId> {
    actions
        .iter()
        .filter_map(|action| match action {
            SessionAction::FetchHistory { chat } => Some(chat.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn startup_selects_first_chat_and_loads_its_window() {
    let mut session = Session::new();
    let _ = session.handle(SessionEvent::AuthChallenge { code: "scan-me".into() });
    assert_eq!(session.phase(), SessionPhase::Authenticating);

    let _ = session.handle(SessionEvent::Ready);
    let actions = session
        .handle(SessionEvent::DirectoryLoaded { chats: vec![chat("a", "Ada"), chat("b", "Bea")] });

    // Oracle: A is active and its fetch was issued.
    assert_eq!(session.active_chat(), Some(&ChatId::from("a")));
    assert_eq!(fetches(&actions), [ChatId::from("a")]);

    // Window arrives oldest-first and lands in order.
    let _ = session.handle(SessionEvent::HistoryLoaded {
        chat: ChatId::from("a"),
        messages: vec![
            incoming("a", "Ada", "first"),
            incoming("a", "Ada", "second"),
            RemoteMessage {
                chat: ChatId::from("a"),
                sender: None,
                body: "mine".into(),
                from_me: true,
            },
        ],
    });
    assert_eq!(session.transcript().lines(), ["Ada: first", "Ada: second", "You: mine"]);
}

#[test]
fn late_completion_of_superseded_fetch_is_discarded() {
    let mut session = ready_session(vec![chat("a", "Ada"), chat("b", "Bea")]);

    // User selects B while A's fetch is still pending.
    let actions = session.select_chat(1);
    assert_eq!(fetches(&actions), [ChatId::from("b")]);

    // B's fetch completes first.
    let _ = session.handle(SessionEvent::HistoryLoaded {
        chat: ChatId::from("b"),
        messages: vec![incoming("b", "Bea", "hello from b")],
    });

    // A's fetch completes late; it must not overwrite B's transcript.
    let actions = session.handle(SessionEvent::HistoryLoaded {
        chat: ChatId::from("a"),
        messages: vec![incoming("a", "Ada", "stale a history")],
    });
    assert!(actions.is_empty(), "late result should not even trigger a redraw");
    assert_eq!(session.transcript().lines(), ["Bea: hello from b"]);
    assert_eq!(session.active_chat(), Some(&ChatId::from("b")));
}

#[test]
fn late_completion_arriving_before_new_fetch_is_also_discarded() {
    let mut session = ready_session(vec![chat("a", "Ada"), chat("b", "Bea")]);
    let _ = session.select_chat(1);

    // A's stale completion arrives before B's window does.
    let _ = session.handle(SessionEvent::HistoryLoaded {
        chat: ChatId::from("a"),
        messages: vec![incoming("a", "Ada", "stale")],
    });
    assert!(session.transcript().is_empty());

    let _ = session.handle(SessionEvent::HistoryLoaded {
        chat: ChatId::from("b"),
        messages: vec![incoming("b", "Bea", "fresh")],
    });
    assert_eq!(session.transcript().lines(), ["Bea: fresh"]);
}

#[test]
fn incoming_message_mutates_transcript_iff_chat_is_active() {
    let mut session =
        ready_session(vec![chat("b", "Bea"), chat("c", "Cy")]);
    let _ = session.handle(SessionEvent::HistoryLoaded {
        chat: ChatId::from("b"),
        messages: vec![],
    });

    // Message for inactive C: transcript unchanged.
    let actions = session.handle(SessionEvent::MessageReceived(incoming("c", "Cy", "psst")));
    assert!(actions.is_empty());
    assert!(session.transcript().is_empty());

    // Message for active B: appended.
    let _ = session.handle(SessionEvent::MessageReceived(incoming("b", "Bea", "hi :wave:")));
    assert_eq!(session.transcript().lines(), ["Bea: hi \u{1f44b}"]);

    // Selecting C afterwards re-fetches; the new message shows up as part of
    // the freshly fetched window.
    let actions = session.select_chat(1);
    assert_eq!(fetches(&actions), [ChatId::from("c")]);
    let _ = session.handle(SessionEvent::HistoryLoaded {
        chat: ChatId::from("c"),
        messages: vec![incoming("c", "Cy", "psst")],
    });
    assert_eq!(session.transcript().lines(), ["Cy: psst"]);
}

#[test]
fn refresh_with_unchanged_set_preserves_selection_and_skips_refetch() {
    let chats = vec![chat("a", "Ada"), chat("b", "Bea")];
    let mut session = ready_session(chats.clone());
    let _ = session.select_chat(1);
    let _ = session.handle(SessionEvent::HistoryLoaded {
        chat: ChatId::from("b"),
        messages: vec![incoming("b", "Bea", "kept")],
    });

    let actions = session.handle(SessionEvent::DirectoryLoaded { chats });

    // Oracle: selection survives by identity, transcript untouched, no fetch.
    assert_eq!(session.active_chat(), Some(&ChatId::from("b")));
    assert_eq!(session.transcript().lines(), ["Bea: kept"]);
    assert!(fetches(&actions).is_empty());
}

#[test]
fn refresh_dropping_active_identity_falls_back_to_first() {
    let mut session = ready_session(vec![chat("a", "Ada"), chat("b", "Bea")]);
    let _ = session.select_chat(1);

    let actions =
        session.handle(SessionEvent::DirectoryLoaded { chats: vec![chat("a", "Ada")] });

    assert_eq!(session.active_chat(), Some(&ChatId::from("a")));
    assert_eq!(fetches(&actions), [ChatId::from("a")]);
}

#[test]
fn refresh_to_empty_clears_selection() {
    let mut session = ready_session(vec![chat("a", "Ada")]);

    let _ = session.handle(SessionEvent::DirectoryLoaded { chats: vec![] });

    assert_eq!(session.active_chat(), None);
    assert!(session.transcript().is_empty());
}

#[test]
fn send_echoes_self_line_with_emoji_expanded() {
    let mut session = ready_session(vec![chat("b", "Bea")]);
    let _ = session.handle(SessionEvent::HistoryLoaded {
        chat: ChatId::from("b"),
        messages: vec![],
    });

    let actions = session.send("hi :smile:");
    let Some(SessionAction::Send { chat, body }) = actions.first() else {
        unreachable!("send should dispatch to the backend: {actions:?}");
    };
    assert_eq!(chat, &ChatId::from("b"));
    assert_eq!(body, "hi \u{1f604}");

    // Backend confirms; optimistic echo appears without waiting for the
    // message to come back as an incoming event.
    let _ = session
        .handle(SessionEvent::SendCompleted { chat: chat.clone(), body: body.clone() });
    assert_eq!(session.transcript().lines(), ["You: hi \u{1f604}"]);
}

#[test]
fn send_failure_surfaces_line_and_restores_input() {
    let mut session = ready_session(vec![chat("b", "Bea")]);
    let _ = session.handle(SessionEvent::HistoryLoaded {
        chat: ChatId::from("b"),
        messages: vec![],
    });

    let actions = session.handle(SessionEvent::SendFailed {
        chat: ChatId::from("b"),
        body: "hi".into(),
        reason: "backend offline".into(),
    });

    assert_eq!(session.transcript().lines(), ["[!] send failed: backend offline"]);
    assert!(
        actions.contains(&SessionAction::RestoreInput { text: "hi".into() }),
        "typed text should be recoverable: {actions:?}"
    );
}

#[test]
fn send_failure_for_superseded_chat_becomes_a_notice() {
    let mut session = ready_session(vec![chat("a", "Ada"), chat("b", "Bea")]);
    let _ = session.select_chat(1);
    let _ = session.handle(SessionEvent::HistoryLoaded {
        chat: ChatId::from("b"),
        messages: vec![incoming("b", "Bea", "current")],
    });

    let actions = session.handle(SessionEvent::SendFailed {
        chat: ChatId::from("a"),
        body: "old draft".into(),
        reason: "timeout".into(),
    });

    // B's transcript is untouched and the draft does not clobber the input.
    assert_eq!(session.transcript().lines(), ["Bea: current"]);
    assert!(!actions.iter().any(|a| matches!(a, SessionAction::RestoreInput { .. })));
    assert!(session.status_message().is_some_and(|s| s.contains("timeout")));
}

#[test]
fn fetch_failure_replaces_transcript_with_single_diagnostic_line() {
    let mut session = ready_session(vec![chat("d", "Dee")]);
    let _ = session.handle(SessionEvent::HistoryLoaded {
        chat: ChatId::from("d"),
        messages: vec![incoming("d", "Dee", "one"), incoming("d", "Dee", "two")],
    });

    let _ = session.handle(SessionEvent::HistoryFailed {
        chat: ChatId::from("d"),
        reason: "connection reset".into(),
    });

    assert_eq!(session.transcript().lines().len(), 1, "exactly one diagnostic line");
    assert!(session.transcript().lines()[0].contains("failed to load messages"));
}

#[test]
fn directory_failure_keeps_snapshot_and_sets_notice() {
    let mut session = ready_session(vec![chat("a", "Ada")]);

    let _ = session.handle(SessionEvent::DirectoryFailed { reason: "sync error".into() });

    assert_eq!(session.directory().len(), 1, "previous snapshot stays in place");
    assert_eq!(session.active_chat(), Some(&ChatId::from("a")));
    assert!(session.status_message().is_some_and(|s| s.contains("sync error")));
}
