#[cfg(test)]
#[path = "conversation_test.rs"]
mod tests;

use rand::Rng;

use super::Message;

const ID_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const ID_LENGTH: usize = 26;

/// Sidebar entry for a conversation the server knows about. Order is whatever
/// the server returned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConversationSummary {
    pub id: String,
    pub title: String,
}

/// The conversation currently on screen. New conversations get a
/// client-generated id and stay unknown to the server until the first message
/// is sent.
pub struct Conversation {
    pub id: String,
    pub messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Conversation {
        return Conversation {
            id: generate_conversation_id(),
            messages: vec![],
        };
    }

    pub fn from_history(id: &str, messages: Vec<Message>) -> Conversation {
        return Conversation {
            id: id.to_string(),
            messages,
        };
    }
}

pub fn generate_conversation_id() -> String {
    let mut rng = rand::thread_rng();
    return (0..ID_LENGTH)
        .map(|_| {
            let idx = rng.gen_range(0..ID_CHARSET.len());
            return ID_CHARSET[idx] as char;
        })
        .collect();
}
