use serde_derive::Deserialize;
use serde_derive::Serialize;

use crate::configuration::Config;
use crate::configuration::ConfigKey;

/// Who authored a transcript message. Matches the `role` tag the server uses
/// in chat history payloads.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl ToString for Role {
    fn to_string(&self) -> String {
        match self {
            Role::User => {
                let username = Config::get(ConfigKey::Username);
                if username.is_empty() {
                    return "You".to_string();
                }
                return username;
            }
            Role::Assistant => return "Assistant".to_string(),
        }
    }
}
