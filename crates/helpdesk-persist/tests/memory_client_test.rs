use helpdesk_persist::{InMemoryPersistenceClient, PersistError, PersistenceClient, Sender};
use uuid::Uuid;

#[tokio::test]
async fn test_create_conversation_has_unique_ids() {
    let store = InMemoryPersistenceClient::new();
    let a = store.create_conversation().await.unwrap();
    let b = store.create_conversation().await.unwrap();

    assert_ne!(a.id, b.id);
    assert_eq!(store.conversation_count().await, 2);
}

#[tokio::test]
async fn test_append_then_list_preserves_order_and_sender() {
    let store = InMemoryPersistenceClient::new();
    let conversation = store.create_conversation().await.unwrap();

    store.append_message(conversation.id, Sender::User, "A").await.unwrap();
    store.append_message(conversation.id, Sender::Ai, "B").await.unwrap();

    let messages = store.list_messages(conversation.id, None).await.unwrap();
    let pairs: Vec<(Sender, &str)> = messages.iter().map(|m| (m.sender, m.text.as_str())).collect();
    assert_eq!(pairs, vec![(Sender::User, "A"), (Sender::Ai, "B")]);
}

#[tokio::test]
async fn test_list_with_limit_returns_most_recent_ascending() {
    let store = InMemoryPersistenceClient::new();
    let conversation = store.create_conversation().await.unwrap();

    for i in 0..15 {
        let sender = if i % 2 == 0 { Sender::User } else { Sender::Ai };
        store
            .append_message(conversation.id, sender, &format!("m{i}"))
            .await
            .unwrap();
    }

    let recent = store.list_messages(conversation.id, Some(10)).await.unwrap();
    let texts: Vec<&str> = recent.iter().map(|m| m.text.as_str()).collect();
    let expected: Vec<String> = (5..15).map(|i| format!("m{i}")).collect();
    assert_eq!(texts, expected.iter().map(String::as_str).collect::<Vec<_>>());

    let all = store.list_messages(conversation.id, None).await.unwrap();
    assert_eq!(all.len(), 15);
    assert!(all.windows(2).all(|w| w[0].created_at <= w[1].created_at));
}

#[tokio::test]
async fn test_limit_larger_than_history_returns_everything() {
    let store = InMemoryPersistenceClient::new();
    let conversation = store.create_conversation().await.unwrap();
    store.append_message(conversation.id, Sender::User, "only").await.unwrap();

    let messages = store.list_messages(conversation.id, Some(10)).await.unwrap();
    assert_eq!(messages.len(), 1);
}

#[tokio::test]
async fn test_zero_limit_returns_nothing() {
    let store = InMemoryPersistenceClient::new();
    let conversation = store.create_conversation().await.unwrap();
    store.append_message(conversation.id, Sender::User, "x").await.unwrap();

    assert!(store.list_messages(conversation.id, Some(0)).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_append_to_unknown_conversation_fails() {
    let store = InMemoryPersistenceClient::new();
    let missing = Uuid::new_v4();

    let err = store
        .append_message(missing, Sender::User, "hello")
        .await
        .unwrap_err();

    assert!(matches!(err, PersistError::ConversationNotFound(id) if id == missing));
    assert_eq!(store.message_count().await, 0);
}

#[tokio::test]
async fn test_list_unknown_conversation_is_empty() {
    let store = InMemoryPersistenceClient::new();
    let messages = store.list_messages(Uuid::new_v4(), None).await.unwrap();
    assert!(messages.is_empty());
}

#[tokio::test]
async fn test_delete_cascades_to_messages() {
    let store = InMemoryPersistenceClient::new();
    let doomed = store.create_conversation().await.unwrap();
    let kept = store.create_conversation().await.unwrap();

    store.append_message(doomed.id, Sender::User, "A").await.unwrap();
    store.append_message(doomed.id, Sender::Ai, "B").await.unwrap();
    store.append_message(kept.id, Sender::User, "C").await.unwrap();

    store.delete_conversation(doomed.id).await.unwrap();

    assert!(store.list_messages(doomed.id, None).await.unwrap().is_empty());
    assert_eq!(store.list_messages(kept.id, None).await.unwrap().len(), 1);
    assert_eq!(store.conversation_count().await, 1);
    assert_eq!(store.message_count().await, 1);

    // deleted conversations no longer accept messages
    assert!(store.append_message(doomed.id, Sender::User, "late").await.is_err());
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let store = InMemoryPersistenceClient::new();
    let conversation = store.create_conversation().await.unwrap();

    store.delete_conversation(conversation.id).await.unwrap();
    store.delete_conversation(conversation.id).await.unwrap();
    store.delete_conversation(Uuid::new_v4()).await.unwrap();
}
