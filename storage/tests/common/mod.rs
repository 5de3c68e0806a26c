//! Behavior every backend must share. Each `*_store_test.rs` file runs these against its backend.

#![allow(dead_code)]

use storage::{
    MessageTurn, SettingsUpdate, StorageError, Store, TurnRole, DEFAULT_GPT_MODEL, DEFAULT_PROMPT,
};

/// Unknown chat → `None`; first append creates it.
pub async fn conversation_created_on_first_append(store: &dyn Store, chat_id: i64) {
    assert!(store.get_conversation(chat_id).await.unwrap().is_none());

    store
        .append_turns(
            chat_id,
            &[MessageTurn::user("hello"), MessageTurn::assistant("Oink! Hi.")],
        )
        .await
        .expect("append failed");

    let conv = store.get_conversation(chat_id).await.unwrap().expect("conversation missing");
    assert_eq!(conv.chat_id, chat_id);
    assert_eq!(conv.messages.len(), 2);
    assert_eq!(conv.messages[0].role, TurnRole::User);
    assert_eq!(conv.messages[0].text, "hello");
    assert_eq!(conv.messages[1].role, TurnRole::Assistant);
    assert_eq!(conv.context_start, 0);
}

/// Later appends extend the sequence in arrival order; earlier turns are untouched.
pub async fn turns_are_append_only_and_ordered(store: &dyn Store, chat_id: i64) {
    for i in 0..3 {
        store
            .append_turns(
                chat_id,
                &[
                    MessageTurn::user(format!("question {}", i)),
                    MessageTurn::assistant(format!("answer {}", i)),
                ],
            )
            .await
            .unwrap();
    }

    let conv = store.get_conversation(chat_id).await.unwrap().unwrap();
    let texts: Vec<&str> = conv.messages.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(
        texts,
        vec!["question 0", "answer 0", "question 1", "answer 1", "question 2", "answer 2"]
    );
    assert!(conv
        .messages
        .windows(2)
        .all(|w| w[0].timestamp <= w[1].timestamp));
}

/// Reset hides earlier turns from the active context but keeps them stored.
pub async fn reset_moves_marker_without_deleting(store: &dyn Store, chat_id: i64) {
    store
        .append_turns(chat_id, &[MessageTurn::user("old"), MessageTurn::assistant("old reply")])
        .await
        .unwrap();
    store.reset_context(chat_id).await.unwrap();

    let conv = store.get_conversation(chat_id).await.unwrap().unwrap();
    assert_eq!(conv.messages.len(), 2);
    assert_eq!(conv.context_start, 2);
    assert!(conv.active_turns().is_empty());

    store
        .append_turns(chat_id, &[MessageTurn::user("new"), MessageTurn::assistant("new reply")])
        .await
        .unwrap();
    let conv = store.get_conversation(chat_id).await.unwrap().unwrap();
    assert_eq!(conv.messages.len(), 4);
    assert_eq!(conv.messages[0].text, "old");
    let active: Vec<&str> = conv.active_turns().iter().map(|t| t.text.as_str()).collect();
    assert_eq!(active, vec!["new", "new reply"]);
}

/// Resetting a chat with no history creates an empty conversation.
pub async fn reset_on_unknown_chat(store: &dyn Store, chat_id: i64) {
    store.reset_context(chat_id).await.unwrap();
    let conv = store.get_conversation(chat_id).await.unwrap().unwrap();
    assert!(conv.messages.is_empty());
    assert_eq!(conv.context_start, 0);
}

/// Chats do not see each other's turns.
pub async fn conversations_are_isolated(store: &dyn Store, chat_a: i64, chat_b: i64) {
    store.append_turns(chat_a, &[MessageTurn::user("for a")]).await.unwrap();
    store.append_turns(chat_b, &[MessageTurn::user("for b")]).await.unwrap();

    let a = store.get_conversation(chat_a).await.unwrap().unwrap();
    let b = store.get_conversation(chat_b).await.unwrap().unwrap();
    assert_eq!(a.messages.len(), 1);
    assert_eq!(a.messages[0].text, "for a");
    assert_eq!(b.messages[0].text, "for b");
}

/// Reset writes defaults; updates apply only the given fields; out-of-range temperature is rejected.
pub async fn settings_lifecycle(store: &dyn Store, user_id: &str) {
    assert!(store.get_settings(user_id).await.unwrap().is_none());

    let defaults = store.reset_settings(user_id).await.unwrap();
    assert_eq!(defaults.gpt_model, DEFAULT_GPT_MODEL);
    assert_eq!(defaults.prompt, DEFAULT_PROMPT);
    assert_eq!(defaults.token, "");

    let updated = store
        .update_settings(user_id, &SettingsUpdate::token("sk-test-1234567890"))
        .await
        .unwrap();
    assert_eq!(updated.token, "sk-test-1234567890");
    assert_eq!(updated.gpt_model, DEFAULT_GPT_MODEL);

    store
        .update_settings(user_id, &SettingsUpdate::temperature(1.2))
        .await
        .unwrap();
    let err = store
        .update_settings(user_id, &SettingsUpdate::temperature(3.0))
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::InvalidValue(_)));

    let stored = store.get_settings(user_id).await.unwrap().unwrap();
    assert_eq!(stored.temperature, 1.2);
    assert_eq!(stored.token, "sk-test-1234567890");

    let reset = store.reset_settings(user_id).await.unwrap();
    assert_eq!(reset.token, "");
    let stored = store.get_settings(user_id).await.unwrap().unwrap();
    assert_eq!(stored.temperature, 0.0);

    assert!(store.delete_settings(user_id).await.unwrap());
    assert!(!store.delete_settings(user_id).await.unwrap());
    assert!(store.get_settings(user_id).await.unwrap().is_none());
}

/// Updating a user with no stored settings starts from defaults.
pub async fn update_without_settings_uses_defaults(store: &dyn Store, user_id: &str) {
    let settings = store
        .update_settings(user_id, &SettingsUpdate::gpt_model("gpt-4o"))
        .await
        .unwrap();
    assert_eq!(settings.gpt_model, "gpt-4o");
    assert_eq!(settings.prompt, DEFAULT_PROMPT);
    assert_eq!(settings.temperature, 0.0);

    let stored = store.get_settings(user_id).await.unwrap().unwrap();
    assert_eq!(stored, settings);
}
