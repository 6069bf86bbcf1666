use std::collections::HashSet;

use super::generate_conversation_id;
use super::Conversation;
use super::ID_LENGTH;

#[test]
fn it_generates_lowercase_alphanumeric_ids() {
    let id = generate_conversation_id();
    assert_eq!(id.len(), ID_LENGTH);
    assert!(id.len() >= 20);
    assert!(id
        .chars()
        .all(|c| return c.is_ascii_lowercase() || c.is_ascii_digit()));
}

#[test]
fn it_does_not_collide_over_many_trials() {
    let mut seen = HashSet::new();
    for _ in 0..10_000 {
        assert!(seen.insert(generate_conversation_id()));
    }
}

#[test]
fn it_starts_conversations_empty() {
    let conversation = Conversation::new();
    assert!(conversation.messages.is_empty());
    assert!(!conversation.id.is_empty());
}

#[test]
fn it_keeps_server_assigned_ids() {
    let conversation = Conversation::from_history("abc123", vec![]);
    assert_eq!(conversation.id, "abc123");
}
