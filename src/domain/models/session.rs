use serde_derive::Deserialize;
use serde_derive::Serialize;

/// Credentials for the active login. The token is opaque to the client and is
/// only ever forwarded as a bearer header.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user_email: String,
}

impl Session {
    pub fn new(token: &str, user_email: &str) -> Session {
        return Session {
            token: token.to_string(),
            user_email: user_email.to_string(),
        };
    }
}
