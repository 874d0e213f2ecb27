mod common;

use common::{foam_wash, gel_wash, FakeBackend};
use routine_builder::conversation::{
    CHAT_FAILURE, EMPTY_SELECTION_NOTICE, ROUTINE_FAILURE, ROUTINE_REQUEST, THINKING_PLACEHOLDER,
};
use routine_builder::{
    routine_prompt, ChatPanel, ChatView, ConversationManager, EntryKind, PanelLine, RequestId,
    Product, RequestState, Role, SendOutcome, Turn, CHAT_MAX_TOKENS, ROUTINE_MAX_TOKENS,
    SYSTEM_PROMPT,
};

#[test]
fn test_history_starts_with_single_system_turn() {
    let manager = ConversationManager::new(FakeBackend::replying("hi"), SYSTEM_PROMPT);
    assert_eq!(manager.history().turns(), &[Turn::system(SYSTEM_PROMPT)]);
    assert_eq!(manager.state(), RequestState::Idle);
}

#[tokio::test]
async fn test_blank_message_is_ignored() {
    let backend = FakeBackend::replying("unused");
    let mut manager = ConversationManager::new(backend.clone(), SYSTEM_PROMPT);
    let mut panel = ChatPanel::new();

    assert_eq!(manager.send_user_message("", &mut panel).await, SendOutcome::Ignored);
    assert_eq!(manager.send_user_message("   \n\t", &mut panel).await, SendOutcome::Ignored);

    assert_eq!(backend.call_count(), 0);
    assert_eq!(manager.history().len(), 1);
    assert!(panel.lines().is_empty());
}

#[tokio::test]
async fn test_message_is_trimmed_and_sent_with_full_history() {
    let backend = FakeBackend::replying("Hello! How can I help?");
    let mut manager = ConversationManager::new(backend.clone(), SYSTEM_PROMPT);
    let mut panel = ChatPanel::new();

    let outcome = manager.send_user_message("  hi  ", &mut panel).await;
    assert_eq!(outcome, SendOutcome::Replied("Hello! How can I help?".to_string()));

    let calls = backend.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].max_tokens, CHAT_MAX_TOKENS);
    assert_eq!(
        calls[0].messages,
        vec![Turn::system(SYSTEM_PROMPT), Turn::user("hi")]
    );

    assert_eq!(
        manager.history().turns(),
        &[
            Turn::system(SYSTEM_PROMPT),
            Turn::user("hi"),
            Turn::assistant("Hello! How can I help?"),
        ]
    );
    assert_eq!(manager.state(), RequestState::Idle);

    let entries: Vec<_> = panel.entries().cloned().collect();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].kind, EntryKind::User);
    assert_eq!(entries[0].text, "hi");
    assert_eq!(entries[1].kind, EntryKind::Assistant);
    assert_eq!(panel.placeholder_count(), 0);
}

#[tokio::test]
async fn test_second_message_carries_previous_turns() {
    let backend = FakeBackend::replying("ok");
    let mut manager = ConversationManager::new(backend.clone(), SYSTEM_PROMPT);
    let mut panel = ChatPanel::new();

    manager.send_user_message("first", &mut panel).await;
    manager.send_user_message("second", &mut panel).await;

    let calls = backend.calls();
    assert_eq!(calls[1].messages.len(), 4);
    assert_eq!(calls[1].messages[2], Turn::assistant("ok"));
    assert_eq!(calls[1].messages[3], Turn::user("second"));
}

#[tokio::test]
async fn test_failed_request_keeps_user_turn_and_shows_one_error() {
    let backend = FakeBackend::failing(500);
    let mut manager = ConversationManager::new(backend.clone(), SYSTEM_PROMPT);
    let mut panel = ChatPanel::new();

    let before = manager.history().len();
    let outcome = manager.send_user_message("hello", &mut panel).await;

    assert!(matches!(outcome, SendOutcome::Failed(ref msg) if msg.contains("500")));
    assert_eq!(backend.call_count(), 1);
    assert_eq!(manager.history().len(), before + 1);
    assert_eq!(manager.history().last(), Some(&Turn::user("hello")));
    assert_eq!(manager.state(), RequestState::Idle);

    let errors: Vec<_> = panel
        .entries()
        .filter(|e| e.kind == EntryKind::Error)
        .collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind.role(), Role::Assistant);
    assert_eq!(errors[0].text, CHAT_FAILURE);
    assert_eq!(panel.placeholder_count(), 0);
}

#[tokio::test]
async fn test_routine_with_empty_selection_makes_no_call() {
    let backend = FakeBackend::replying("unused");
    let mut manager = ConversationManager::new(backend.clone(), SYSTEM_PROMPT);
    let mut panel = ChatPanel::new();

    let outcome = manager.request_routine(&[], &mut panel).await;

    assert_eq!(outcome, SendOutcome::Notice);
    assert_eq!(backend.call_count(), 0);
    assert_eq!(manager.history().len(), 1);

    let entries: Vec<_> = panel.entries().collect();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].kind, EntryKind::Notice);
    assert_eq!(entries[0].text, EMPTY_SELECTION_NOTICE);
}

#[tokio::test]
async fn test_routine_sends_enumeration_but_shows_short_request() {
    let backend = FakeBackend::replying("Morning: cleanse...");
    let mut manager = ConversationManager::new(backend.clone(), SYSTEM_PROMPT);
    let mut panel = ChatPanel::new();

    let selection = vec![foam_wash(), gel_wash()];
    let outcome = manager.request_routine(&selection, &mut panel).await;
    assert_eq!(outcome, SendOutcome::Replied("Morning: cleanse...".to_string()));

    let calls = backend.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].max_tokens, ROUTINE_MAX_TOKENS);
    assert!(ROUTINE_MAX_TOKENS > CHAT_MAX_TOKENS);

    let sent = &calls[0].messages[1].content;
    assert_eq!(sent, &routine_prompt(&selection));
    assert_eq!(
        sent.as_str(),
        "User selected products:\n\n\
         - Foam Wash (X) - Cleanser: A gentle foaming cleanser.\n\
         - Gel Wash (Y) - Cleanser: No description\n\n\
         Please create a skincare/beauty routine using my selected products."
    );

    let entries: Vec<_> = panel.entries().cloned().collect();
    assert_eq!(entries[0].kind, EntryKind::User);
    assert_eq!(entries[0].text, ROUTINE_REQUEST);
    assert_eq!(entries[1].kind, EntryKind::Routine);
    assert_eq!(entries[1].kind.label(), "Your Personalized Routine:");
    assert!(panel.entries().all(|e| !e.text.contains("Foam Wash (X)")));

    assert_eq!(manager.history().len(), 3);
    assert_eq!(manager.history().turns()[2], Turn::assistant("Morning: cleanse..."));
}

#[tokio::test]
async fn test_routine_failure_uses_routine_error_text() {
    let backend = FakeBackend::failing(401);
    let mut manager = ConversationManager::new(backend, SYSTEM_PROMPT);
    let mut panel = ChatPanel::new();

    manager.request_routine(&[foam_wash()], &mut panel).await;

    let last = panel.entries().last().unwrap();
    assert_eq!(last.kind, EntryKind::Error);
    assert_eq!(last.text, ROUTINE_FAILURE);
    assert_eq!(manager.history().len(), 2);
}

#[test]
fn test_placeholders_are_removed_by_their_own_id() {
    let mut panel = ChatPanel::new();
    let first = RequestId::new();
    let second = RequestId::new();

    panel.show_placeholder(first, THINKING_PLACEHOLDER);
    panel.show_placeholder(second, THINKING_PLACEHOLDER);
    panel.clear_placeholder(second);

    assert_eq!(panel.placeholder_count(), 1);
    assert!(matches!(
        &panel.lines()[0],
        PanelLine::Placeholder { id, .. } if *id == first
    ));

    panel.clear_placeholder(first);
    assert_eq!(panel.placeholder_count(), 0);
}

#[tokio::test]
async fn test_cancelled_request_returns_to_idle_and_clears_placeholder() {
    let backend = FakeBackend::hanging_then_replying("Back again.");
    let mut manager = ConversationManager::new(backend.clone(), SYSTEM_PROMPT);
    let mut panel = ChatPanel::new();

    let cancelled = tokio::time::timeout(
        std::time::Duration::from_millis(20),
        manager.send_user_message("hi", &mut panel),
    )
    .await;
    assert!(cancelled.is_err());

    assert_eq!(manager.state(), RequestState::Idle);
    assert_eq!(panel.placeholder_count(), 0);

    let outcome = manager.send_user_message("still there?", &mut panel).await;
    assert_eq!(outcome, SendOutcome::Replied("Back again.".to_string()));
    assert_eq!(manager.state(), RequestState::Idle);
    assert_eq!(panel.placeholder_count(), 0);
    assert_eq!(backend.call_count(), 2);

    // The abandoned user turn stays, like any failed turn.
    let roles: Vec<Role> = manager.history().turns().iter().map(|t| t.role).collect();
    assert_eq!(
        roles,
        vec![Role::System, Role::User, Role::User, Role::Assistant]
    );
}

#[test]
fn test_routine_prompt_keeps_description_as_published() {
    let selection = vec![
        Product::new("Foam Wash", "X", "Cleanser").with_description("  Gentle.\n"),
        Product::new("Gel Wash", "Y", "Cleanser").with_description("   "),
    ];

    assert_eq!(
        routine_prompt(&selection),
        "User selected products:\n\n\
         - Foam Wash (X) - Cleanser:   Gentle.\n\n\
         - Gel Wash (Y) - Cleanser: No description\n\n\
         Please create a skincare/beauty routine using my selected products."
    );
}
